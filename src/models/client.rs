use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cnpj: Option<String>,
    pub cep: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub complement: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client fields a caller may set. Used as the body of create and update
/// requests and as the draft edited by the registry form.
///
/// Missing and `null` JSON fields deserialize as empty strings so that
/// they are reported by validation rather than rejected by the decoder. A
/// [`Client`] body as returned by the API therefore decodes unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClientInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub cnpj: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub cep: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub street: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub neighborhood: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub complement: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClientInput {
    /// Value of an optional column: blank means absent.
    pub fn optional(value: &str) -> Option<String> {
        if value.trim().is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

impl From<&Client> for ClientInput {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone().unwrap_or_default(),
            cnpj: client.cnpj.clone().unwrap_or_default(),
            cep: client.cep.clone(),
            street: client.street.clone(),
            neighborhood: client.neighborhood.clone(),
            city: client.city.clone(),
            state: client.state.clone(),
            complement: client.complement.clone().unwrap_or_default(),
        }
    }
}
