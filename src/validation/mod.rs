//! Field validation for client records.
//!
//! Two layers share the same rules. [`advisory`] runs in the registry UI
//! and collects every problem at once so the form can mark each field.
//! [`authoritative`] runs in the service, stops at the first failure and is
//! the only layer whose verdict is enforced.

pub mod advisory;
pub mod authoritative;
pub mod mask;
mod rules;

use std::collections::BTreeMap;
use std::fmt;

pub use advisory::{validate_email_uniqueness, validate_form, validate_required};
pub use rules::{is_valid_cep, is_valid_cep_loose, is_valid_email};

use crate::models::ClientInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Cnpj,
    Cep,
    Street,
    Neighborhood,
    City,
    State,
    Complement,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Cnpj,
        Field::Cep,
        Field::Street,
        Field::Neighborhood,
        Field::City,
        Field::State,
        Field::Complement,
    ];

    pub const REQUIRED: [Field; 7] = [
        Field::Name,
        Field::Email,
        Field::Cep,
        Field::Street,
        Field::Neighborhood,
        Field::City,
        Field::State,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Cnpj => "CNPJ",
            Field::Cep => "CEP",
            Field::Street => "Street",
            Field::Neighborhood => "Neighborhood",
            Field::City => "City",
            Field::State => "State",
            Field::Complement => "Complement",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    pub fn value(self, record: &ClientInput) -> &str {
        match self {
            Field::Name => &record.name,
            Field::Email => &record.email,
            Field::Phone => &record.phone,
            Field::Cnpj => &record.cnpj,
            Field::Cep => &record.cep,
            Field::Street => &record.street,
            Field::Neighborhood => &record.neighborhood,
            Field::City => &record.city,
            Field::State => &record.state,
            Field::Complement => &record.complement,
        }
    }

    pub fn value_mut(self, record: &mut ClientInput) -> &mut String {
        match self {
            Field::Name => &mut record.name,
            Field::Email => &mut record.email,
            Field::Phone => &mut record.phone,
            Field::Cnpj => &mut record.cnpj,
            Field::Cep => &mut record.cep,
            Field::Street => &mut record.street,
            Field::Neighborhood => &mut record.neighborhood,
            Field::City => &mut record.city,
            Field::State => &mut record.state,
            Field::Complement => &mut record.complement,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message per invalid field. A missing key means the field is valid.
pub type FieldErrors = BTreeMap<Field, String>;
