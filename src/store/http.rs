use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;

use super::{RegistryApi, StoreError};
use crate::models::{Client, ClientInput};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// [`RegistryApi`] over HTTP, e.g. `http://localhost:3333/api`.
pub struct HttpRegistryApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegistryApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Non-success statuses carry `{error}`; fall back to the status text.
    async fn checked(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string(),
        };
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn message(response: Response) -> Result<String, StoreError> {
        let body: MessageBody = Self::checked(response).await?.json().await?;
        Ok(body.message)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryApi {
    async fn list(&self) -> Result<Vec<Client>, StoreError> {
        let response = self.http.get(self.url("/clients")).send().await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn get(&self, id: i32) -> Result<Client, StoreError> {
        let response = self
            .http
            .get(self.url(&format!("/clients/{id}")))
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn create(&self, input: &ClientInput) -> Result<String, StoreError> {
        let response = self
            .http
            .post(self.url("/clients"))
            .json(input)
            .send()
            .await?;
        Self::message(response).await
    }

    async fn update(&self, id: i32, input: &ClientInput) -> Result<String, StoreError> {
        let response = self
            .http
            .put(self.url(&format!("/clients/{id}")))
            .json(input)
            .send()
            .await?;
        Self::message(response).await
    }

    async fn delete(&self, id: i32) -> Result<String, StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("/clients/{id}")))
            .send()
            .await?;
        Self::message(response).await
    }
}
