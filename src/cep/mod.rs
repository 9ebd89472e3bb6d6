//! Postal-code lookup against the ViaCEP directory.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CepResponse;
use crate::validation::is_valid_cep_loose;

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid CEP. Use the format XXXXX-XXX")]
    InvalidCep,

    /// The directory answered, but the code is not assigned.
    #[error("CEP not found")]
    NotFound,

    #[error("CEP lookup failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<CepResponse, LookupError>;
}

pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, cep: &str) -> String {
        format!("{}/{}/json/", self.base_url, cep.replace('-', ""))
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<CepResponse, LookupError> {
        let cep = cep.trim();
        if !is_valid_cep_loose(cep) {
            return Err(LookupError::InvalidCep);
        }

        let url = self.url(cep);
        tracing::debug!(%url, "looking up CEP");

        let response = self.http.get(&url).send().await?.error_for_status()?;
        let address: CepResponse = response.json().await?;

        if !address.found() {
            tracing::debug!(cep, "CEP not assigned");
            return Err(LookupError::NotFound);
        }

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::{json, Value};

    // Stands in for the directory: one assigned code, everything else
    // flagged as not found, and `00000000` failing outright.
    async fn directory(Path(cep): Path<String>) -> Result<Json<Value>, axum::http::StatusCode> {
        match cep.as_str() {
            "01001000" => Ok(Json(json!({
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "complemento": "lado ímpar",
                "bairro": "Sé",
                "localidade": "São Paulo",
                "uf": "SP",
                "ibge": "3550308",
                "gia": "1004",
                "ddd": "11",
                "siafi": "7107"
            }))),
            "00000000" => Err(axum::http::StatusCode::BAD_GATEWAY),
            _ => Ok(Json(json!({ "erro": true }))),
        }
    }

    async fn spawn_directory() -> String {
        let app = Router::new().route("/ws/{cep}/json/", get(directory));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/ws")
    }

    #[test]
    fn test_url_strips_hyphen() {
        let client = ViaCepClient::new("https://viacep.com.br/ws/");
        assert_eq!(
            client.url("01001-000"),
            "https://viacep.com.br/ws/01001000/json/"
        );
    }

    #[tokio::test]
    async fn test_lookup_with_and_without_hyphen() {
        let client = ViaCepClient::new(spawn_directory().await);

        let address = client.lookup("01001-000").await.unwrap();
        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.state_code, "SP");
        assert_eq!(address.ddd, "11");

        let address = client.lookup("01001000").await.unwrap();
        assert_eq!(address.city, "São Paulo");
    }

    #[tokio::test]
    async fn test_unassigned_code_is_not_found() {
        let client = ViaCepClient::new(spawn_directory().await);
        assert!(matches!(
            client.lookup("99999-999").await,
            Err(LookupError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_failures_are_distinct_from_not_found() {
        let client = ViaCepClient::new(spawn_directory().await);
        assert!(matches!(
            client.lookup("00000-000").await,
            Err(LookupError::Transport(_))
        ));

        let unreachable = ViaCepClient::new("http://127.0.0.1:9");
        assert!(matches!(
            unreachable.lookup("01001-000").await,
            Err(LookupError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_code_skips_the_network() {
        let unreachable = ViaCepClient::new("http://127.0.0.1:9");
        assert!(matches!(
            unreachable.lookup("0100-100").await,
            Err(LookupError::InvalidCep)
        ));
    }
}
