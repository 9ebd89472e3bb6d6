//! Client registry: a REST service over Postgres plus a terminal UI, with
//! address autofill from Brazilian postal codes (CEP).

pub mod api;
pub mod cep;
pub mod config;
pub mod db;
pub mod models;
pub mod service;
pub mod store;
pub mod ui;
pub mod validation;
