mod cep;
mod client;

pub use cep::CepResponse;
pub use client::{Client, ClientInput};
