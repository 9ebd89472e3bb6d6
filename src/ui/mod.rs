//! Terminal registry UI: the client table and the create/edit form.

pub mod app;
pub mod client_form;
pub mod clients;
pub mod components;

pub use app::{run_app, App};
