//! Presentation transforms for phone, CNPJ and CEP values.
//!
//! The `mask_*` functions run on every keystroke in the form; the
//! `format_*` functions render stored values in the client table. None of
//! them validate anything.

pub const EMPTY_CELL: &str = "—";

fn digits(value: &str, limit: usize) -> String {
    value.chars().filter(char::is_ascii_digit).take(limit).collect()
}

/// `(DD) DDDD-DDDD` while typing, `(DD) DDDDD-DDDD` once the eleventh
/// digit arrives.
pub fn mask_phone(value: &str) -> String {
    let digits = digits(value, 11);
    if digits.len() <= 2 {
        return digits;
    }

    let (area, local) = digits.split_at(2);
    let split = if digits.len() == 11 { 5 } else { 4 };
    let masked = if local.len() > split {
        let (prefix, suffix) = local.split_at(split);
        format!("({area}) {prefix}-{suffix}")
    } else {
        format!("({area}) {local}")
    };

    masked.chars().take(15).collect()
}

/// Progressively builds `DD.DDD.DDD/DDDD-DD`.
pub fn mask_cnpj(value: &str) -> String {
    let mut masked = String::with_capacity(18);
    for (i, digit) in digits(value, 14).chars().enumerate() {
        match i {
            2 | 5 => masked.push('.'),
            8 => masked.push('/'),
            12 => masked.push('-'),
            _ => {}
        }
        masked.push(digit);
    }
    masked.chars().take(18).collect()
}

pub fn format_phone(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return EMPTY_CELL.to_string();
    };
    let digits = digits(raw, usize::MAX);
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => raw.to_string(),
    }
}

pub fn format_cnpj(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return EMPTY_CELL.to_string();
    };
    let digits = digits(raw, usize::MAX);
    if digits.len() == 14 {
        format!(
            "{}.{}.{}/{}-{}",
            &digits[..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..]
        )
    } else {
        raw.to_string()
    }
}

pub fn format_cep(value: Option<&str>) -> String {
    let Some(raw) = value.filter(|v| !v.is_empty()) else {
        return EMPTY_CELL.to_string();
    };
    let digits = digits(raw, usize::MAX);
    if digits.len() == 8 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        raw.to_string()
    }
}
