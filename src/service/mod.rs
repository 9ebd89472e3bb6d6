//! The client registry's request/response contract.
//!
//! Every write goes through [`authoritative::check`] first, then through
//! the existence and uniqueness checks, in that order. The first failure is
//! reported on its own.

use std::sync::Arc;

use thiserror::Error;

use crate::db::{ClientRepository, RepositoryError};
use crate::models::{Client, ClientInput};
use crate::validation::authoritative::{self, ValidationError};

pub const NOT_FOUND: &str = "Client not found";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const EMAIL_TAKEN_BY_OTHER: &str = "Email already registered for another client";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Transport(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(NOT_FOUND.to_string()),
            RepositoryError::Conflict(_) => Self::Conflict(EMAIL_TAKEN.to_string()),
            RepositoryError::Database(err) => Self::Transport(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct ClientService {
    repo: Arc<dyn ClientRepository>,
}

impl ClientService {
    pub fn new(repo: Arc<dyn ClientRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Client>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: i32) -> Result<Client, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, input: &ClientInput) -> Result<Client, ServiceError> {
        authoritative::check(input)?;

        // The unique index enforces this as well.
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let client = self.repo.insert(input).await?;
        tracing::info!(client_id = client.id, "client created");
        Ok(client)
    }

    pub async fn update(&self, id: i32, input: &ClientInput) -> Result<Client, ServiceError> {
        authoritative::check(input)?;

        // Existence is reported before any conflict.
        self.get(id).await?;

        if let Some(owner) = self.repo.find_by_email(&input.email).await? {
            if owner.id != id {
                return Err(ServiceError::Conflict(EMAIL_TAKEN_BY_OTHER.to_string()));
            }
        }

        let client = self.repo.update(id, input).await.map_err(|err| match err {
            RepositoryError::Conflict(_) => {
                ServiceError::Conflict(EMAIL_TAKEN_BY_OTHER.to_string())
            }
            other => other.into(),
        })?;
        tracing::info!(client_id = id, "client updated");
        Ok(client)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        tracing::info!(client_id = id, "client removed");
        Ok(())
    }
}
