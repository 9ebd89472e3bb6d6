//! Checks run by the registry form before anything is sent to the server.
//!
//! Nothing here guarantees integrity. The duplicate-email check only sees
//! the list the UI fetched last, so the server still decides.

use super::rules::{is_blank, is_valid_cep_loose, is_valid_email};
use super::{Field, FieldErrors};
use crate::models::{Client, ClientInput};

pub const REQUIRED: &str = "Required field";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const DUPLICATE_EMAIL: &str = "This email is already registered";
pub const INVALID_CEP: &str = "CEP must use the format XXXXX-XXX";

pub fn validate_required(record: &ClientInput) -> FieldErrors {
    Field::REQUIRED
        .iter()
        .filter(|field| is_blank(field.value(record)))
        .map(|field| (*field, REQUIRED.to_string()))
        .collect()
}

/// Fails when another known client already uses the email, ignoring case.
/// `editing` is the id of the record being edited, if any.
pub fn validate_email_uniqueness(
    record: &ClientInput,
    editing: Option<i32>,
    known: &[Client],
) -> Result<(), String> {
    let email = record.email.to_lowercase();
    let taken = known
        .iter()
        .any(|client| client.email.to_lowercase() == email && Some(client.id) != editing);

    if taken {
        Err(DUPLICATE_EMAIL.to_string())
    } else {
        Ok(())
    }
}

/// Validate a single field the way the form does while the user types.
pub fn validate_field(
    field: Field,
    record: &ClientInput,
    editing: Option<i32>,
    known: &[Client],
) -> Option<String> {
    let value = field.value(record);
    if field.is_required() && is_blank(value) {
        return Some(REQUIRED.to_string());
    }

    match field {
        Field::Email if !value.is_empty() => {
            if !is_valid_email(value) {
                return Some(INVALID_EMAIL.to_string());
            }
            validate_email_uniqueness(record, editing, known).err()
        }
        Field::Cep if !value.is_empty() && !is_valid_cep_loose(value) => {
            Some(INVALID_CEP.to_string())
        }
        _ => None,
    }
}

/// Every required field in one pass. Submission is blocked unless the
/// result is empty.
pub fn validate_form(record: &ClientInput, editing: Option<i32>, known: &[Client]) -> FieldErrors {
    Field::REQUIRED
        .iter()
        .filter_map(|field| {
            validate_field(*field, record, editing, known).map(|message| (*field, message))
        })
        .collect()
}
