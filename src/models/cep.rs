use serde::{Deserialize, Deserializer, Serialize};

use super::ClientInput;

// The directory has sent the flag both as `true` and as `"true"`.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => Some(value),
        Some(Flag::Text(text)) => Some(text.eq_ignore_ascii_case("true")),
        None => None,
    })
}

/// Address record returned by the postal-code directory.
///
/// Field names follow the directory's wire format; `erro` is only present
/// (and `true`) when the code is not assigned.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CepResponse {
    #[serde(rename = "cep", default)]
    pub postal_code: String,
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "complemento", default)]
    pub complement: String,
    #[serde(rename = "bairro", default)]
    pub neighborhood: String,
    #[serde(rename = "localidade", default)]
    pub city: String,
    #[serde(rename = "uf", default)]
    pub state_code: String,
    #[serde(default)]
    pub ibge: String,
    #[serde(default)]
    pub gia: String,
    #[serde(default)]
    pub ddd: String,
    #[serde(default)]
    pub siafi: String,
    #[serde(
        rename = "erro",
        default,
        deserialize_with = "flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub not_found: Option<bool>,
}

impl CepResponse {
    pub fn found(&self) -> bool {
        !self.not_found.unwrap_or(false)
    }

    /// Copy the address into a draft. A complement the user already typed
    /// is kept.
    pub fn merge_into(&self, draft: &mut ClientInput) {
        draft.street = self.street.clone();
        draft.neighborhood = self.neighborhood.clone();
        draft.city = self.city.clone();
        draft.state = self.state_code.clone();
        if draft.complement.is_empty() {
            draft.complement = self.complement.clone();
        }
    }
}
