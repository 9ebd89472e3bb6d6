//! Client persistence.
//!
//! [`ClientRepository`] is the storage boundary used by the service.
//! [`Database`] keeps rows in Postgres; [`MemoryRepository`] keeps them in
//! process for development runs and tests.

mod memory;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{Client, ClientInput};

pub use memory::MemoryRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No row with the requested id.
    #[error("not found")]
    NotFound,

    /// Another row already uses this email.
    #[error("email already registered: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// All clients, newest first.
    async fn list(&self) -> Result<Vec<Client>, RepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Client>, RepositoryError>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, RepositoryError>;

    /// Insert a row. Fails with `Conflict` if the email is taken, even when a
    /// concurrent insert won the race after the caller's own check.
    async fn insert(&self, input: &ClientInput) -> Result<Client, RepositoryError>;

    /// Replace every caller-settable column and bump `updated_at`.
    async fn update(&self, id: i32, input: &ClientInput) -> Result<Client, RepositoryError>;

    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

const COLUMNS: &str = "id, name, email, phone, cnpj, cep, street, neighborhood, city, state, \
                       complement, created_at, updated_at";

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        Ok(())
    }
}

// Unique index violations become conflicts; everything else is a storage
// failure.
fn write_error(err: sqlx::Error, email: &str) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::Conflict(email.to_string())
        }
        _ => RepositoryError::Database(err),
    }
}

#[async_trait]
impl ClientRepository for Database {
    async fn list(&self) -> Result<Vec<Client>, RepositoryError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {COLUMNS} FROM clients ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(clients)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Client>, RepositoryError> {
        let client =
            sqlx::query_as::<_, Client>(&format!("SELECT {COLUMNS} FROM clients WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.get_pool())
                .await?;

        Ok(client)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, RepositoryError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {COLUMNS} FROM clients WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(client)
    }

    async fn insert(&self, input: &ClientInput) -> Result<Client, RepositoryError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO clients
                (name, email, phone, cnpj, cep, street, neighborhood, city, state, complement)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(ClientInput::optional(&input.phone))
        .bind(ClientInput::optional(&input.cnpj))
        .bind(&input.cep)
        .bind(&input.street)
        .bind(&input.neighborhood)
        .bind(&input.city)
        .bind(&input.state)
        .bind(ClientInput::optional(&input.complement))
        .fetch_one(self.get_pool())
        .await
        .map_err(|err| write_error(err, &input.email))?;

        Ok(client)
    }

    async fn update(&self, id: i32, input: &ClientInput) -> Result<Client, RepositoryError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients
            SET name = $1, email = $2, phone = $3, cnpj = $4, cep = $5, street = $6,
                neighborhood = $7, city = $8, state = $9, complement = $10,
                updated_at = GREATEST(NOW(), created_at)
            WHERE id = $11
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.email)
        .bind(ClientInput::optional(&input.phone))
        .bind(ClientInput::optional(&input.cnpj))
        .bind(&input.cep)
        .bind(&input.street)
        .bind(&input.neighborhood)
        .bind(&input.city)
        .bind(&input.state)
        .bind(ClientInput::optional(&input.complement))
        .bind(id)
        .fetch_optional(self.get_pool())
        .await
        .map_err(|err| write_error(err, &input.email))?;

        client.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Connect to Postgres and bring the schema up to date
pub async fn init(database_url: &str) -> Result<Database> {
    let db = Database::new(database_url).await?;
    db.migrate().await?;

    Ok(db)
}
