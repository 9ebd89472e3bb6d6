use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ClientRepository, RepositoryError};
use crate::models::{Client, ClientInput};

#[derive(Default)]
struct Rows {
    last_id: i32,
    clients: Vec<Client>,
}

impl Rows {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        let email = email.to_lowercase();
        self.clients
            .iter()
            .any(|c| c.email.to_lowercase() == email && Some(c.id) != except)
    }
}

/// Keeps clients in memory. Every write holds the lock for its whole
/// check-then-modify sequence, which gives the same guarantees as the
/// unique index in Postgres.
#[derive(Default)]
pub struct MemoryRepository {
    rows: RwLock<Rows>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let rows = self.rows.read().await;
        let mut clients = rows.clients.clone();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(clients)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Client>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, RepositoryError> {
        let email = email.to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows
            .clients
            .iter()
            .find(|c| c.email.to_lowercase() == email)
            .cloned())
    }

    async fn insert(&self, input: &ClientInput) -> Result<Client, RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.email_taken(&input.email, None) {
            return Err(RepositoryError::Conflict(input.email.clone()));
        }

        rows.last_id += 1;
        let now = Utc::now();
        let client = Client {
            id: rows.last_id,
            name: input.name.clone(),
            email: input.email.clone(),
            phone: ClientInput::optional(&input.phone),
            cnpj: ClientInput::optional(&input.cnpj),
            cep: input.cep.clone(),
            street: input.street.clone(),
            neighborhood: input.neighborhood.clone(),
            city: input.city.clone(),
            state: input.state.clone(),
            complement: ClientInput::optional(&input.complement),
            created_at: now,
            updated_at: now,
        };
        rows.clients.push(client.clone());

        Ok(client)
    }

    async fn update(&self, id: i32, input: &ClientInput) -> Result<Client, RepositoryError> {
        let mut rows = self.rows.write().await;
        if !rows.clients.iter().any(|c| c.id == id) {
            return Err(RepositoryError::NotFound);
        }
        if rows.email_taken(&input.email, Some(id)) {
            return Err(RepositoryError::Conflict(input.email.clone()));
        }

        let client = rows
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;

        client.name = input.name.clone();
        client.email = input.email.clone();
        client.phone = ClientInput::optional(&input.phone);
        client.cnpj = ClientInput::optional(&input.cnpj);
        client.cep = input.cep.clone();
        client.street = input.street.clone();
        client.neighborhood = input.neighborhood.clone();
        client.city = input.city.clone();
        client.state = input.state.clone();
        client.complement = ClientInput::optional(&input.complement);
        client.updated_at = Utc::now().max(client.created_at);

        Ok(client.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.clients.len();
        rows.clients.retain(|c| c.id != id);

        if rows.clients.len() == before {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
