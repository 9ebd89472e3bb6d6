//! Client-side state for the registry UI.
//!
//! [`ClientStore`] caches the whole client list. Every successful mutation
//! re-fetches the full list instead of patching the cache, which is fine
//! at this data scale and is the ceiling if it ever stops being.

mod http;
mod search;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Client, ClientInput};

pub use http::HttpRegistryApi;
pub use search::{client_matches, filter_clients};

pub const LOAD_FAILED: &str = "Failed to load clients";
pub const LOAD_ONE_FAILED: &str = "Failed to load client";
pub const CREATE_FAILED: &str = "Failed to create client";
pub const UPDATE_FAILED: &str = "Failed to update client";
pub const DELETE_FAILED: &str = "Failed to delete client";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The API answered with an error status and message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }

    /// Message to show the user: the server's own words when it gave any.
    fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Transport(_) => fallback.to_string(),
        }
    }
}

/// The registry API as seen from the UI.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Client>, StoreError>;
    async fn get(&self, id: i32) -> Result<Client, StoreError>;
    async fn create(&self, input: &ClientInput) -> Result<String, StoreError>;
    async fn update(&self, id: i32, input: &ClientInput) -> Result<String, StoreError>;
    async fn delete(&self, id: i32) -> Result<String, StoreError>;
}

pub struct ClientStore<A> {
    api: A,
    clients: Vec<Client>,
    loading: bool,
    error: Option<String>,
}

impl<A: RegistryApi> ClientStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            clients: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Flag a fetch as under way, so a frame drawn before it starts shows
    /// the loading state. [`fetch_clients`](Self::fetch_clients) clears it.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub async fn fetch_clients(&mut self) {
        self.loading = true;
        self.error = None;

        match self.api.list().await {
            Ok(clients) => self.clients = clients,
            Err(err) => {
                tracing::error!(error = %err, "failed to load clients");
                self.error = Some(LOAD_FAILED.to_string());
            }
        }

        self.loading = false;
    }

    /// Fetch one client straight from the API, bypassing the cache.
    pub async fn get_client(&mut self, id: i32) -> Result<Client, StoreError> {
        self.error = None;
        self.api.get(id).await.map_err(|err| {
            self.error = Some(err.user_message(LOAD_ONE_FAILED));
            err
        })
    }

    pub async fn add_client(&mut self, input: &ClientInput) -> Result<(), StoreError> {
        self.error = None;
        let result = self.api.create(input).await;
        self.after_mutation(result, CREATE_FAILED).await
    }

    pub async fn update_client(&mut self, id: i32, input: &ClientInput) -> Result<(), StoreError> {
        self.error = None;
        let result = self.api.update(id, input).await;
        self.after_mutation(result, UPDATE_FAILED).await
    }

    pub async fn delete_client(&mut self, id: i32) -> Result<(), StoreError> {
        self.error = None;
        let result = self.api.delete(id).await;
        self.after_mutation(result, DELETE_FAILED).await
    }

    async fn after_mutation(
        &mut self,
        result: Result<String, StoreError>,
        fallback: &str,
    ) -> Result<(), StoreError> {
        match result {
            Ok(message) => {
                tracing::info!(%message, "mutation accepted");
                self.fetch_clients().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "mutation rejected");
                self.error = Some(err.user_message(fallback));
                Err(err)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{input, FakeApi};
    use super::*;

    #[tokio::test]
    async fn test_every_mutation_refetches_the_list() {
        let mut store = ClientStore::new(FakeApi::default());
        store.fetch_clients().await;
        assert!(store.clients().is_empty());

        store.add_client(&input("Acme", "a@acme.com")).await.unwrap();
        assert_eq!(store.clients().len(), 1);

        let id = store.clients()[0].id;
        store
            .update_client(id, &input("Acme Ltda", "a@acme.com"))
            .await
            .unwrap();
        assert_eq!(store.clients()[0].name, "Acme Ltda");

        store.delete_client(id).await.unwrap();
        assert!(store.clients().is_empty());

        assert_eq!(*store.api.list_calls.lock().unwrap(), 4);
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_rejection_records_server_message_and_skips_refetch() {
        let mut store = ClientStore::new(FakeApi::default());
        store.add_client(&input("Acme", "a@acme.com")).await.unwrap();

        let err = store
            .add_client(&input("Other", "a@acme.com"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Rejected {
                status: 409,
                message: "Email already registered".to_string()
            }
        );
        assert_eq!(store.error(), Some("Email already registered"));
        assert_eq!(*store.api.list_calls.lock().unwrap(), 1);

        let err = store.delete_client(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transport_failures_use_default_messages() {
        let mut store = ClientStore::new(FakeApi {
            offline: true,
            ..Default::default()
        });

        store.fetch_clients().await;
        assert_eq!(store.error(), Some(LOAD_FAILED));

        let err = store.add_client(&input("Acme", "a@acme.com")).await;
        assert!(matches!(err, Err(StoreError::Transport(_))));
        assert_eq!(store.error(), Some(CREATE_FAILED));

        store.clear_error();
        assert_eq!(store.error(), None);
    }
}
