//! Checks the service applies before anything is written.
//!
//! Unlike the form, the service reports only the first failing rule, in the
//! order required fields, email, CEP.

use thiserror::Error;

use super::rules::{is_blank, is_valid_cep, is_valid_email};
use super::Field;
use crate::models::ClientInput;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingRequired(Vec<Field>),

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid CEP. Use the format XXXXX-XXX")]
    InvalidCep,
}

pub fn check(input: &ClientInput) -> Result<(), ValidationError> {
    let missing: Vec<Field> = Field::REQUIRED
        .iter()
        .copied()
        .filter(|field| is_blank(field.value(input)))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired(missing));
    }

    if !is_valid_email(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }

    if !is_valid_cep(&input.cep) {
        return Err(ValidationError::InvalidCep);
    }

    Ok(())
}
