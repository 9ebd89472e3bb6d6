use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static CEP_STRICT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{3}$").expect("cep pattern"));
static CEP_LOOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("cep pattern"));

/// `local@domain.tld` with no whitespace. Deliverability is not checked.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// `DDDDD-DDD`, hyphen mandatory. This is the format accepted for storage.
pub fn is_valid_cep(value: &str) -> bool {
    CEP_STRICT.is_match(value)
}

/// Like [`is_valid_cep`] but the hyphen is optional.
pub fn is_valid_cep_loose(value: &str) -> bool {
    CEP_LOOSE.is_match(value)
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
