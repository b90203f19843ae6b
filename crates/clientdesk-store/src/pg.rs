//! Postgres implementation of the record store.
//!
//! Writes go through [`PgTx`], a wrapper around an `sqlx` transaction, so
//! the primary write and the audit append share one atomic unit. The
//! underlying transaction rolls back on drop unless committed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clientdesk_core::{Actor, AuditEntry, ClientId, ClientPatch, ClientRecord, UserId};
use clientdesk_core::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::StoreError;
use crate::{RecordStore, RecordTx};

const CLIENT_COLUMNS: &str =
    "id, owner_id, first_name, last_name, email, age, linkedin_url, created_at, updated_at";

/// Row mapping for the `clients` table.
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    owner_id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    age: i32,
    linkedin_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for ClientRecord {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            age: row.age,
            linkedin_url: row.linkedin_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed record store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to Postgres and run pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;
        tracing::info!(max_connections = config.max_connections, "connected to postgres");
        Ok(Self { pool })
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn RecordTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn get(&self, id: ClientId) -> Result<Option<ClientRecord>, StoreError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1");
        let row = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ClientRecord::from))
    }

    async fn list_owned_by(&self, owner: UserId) -> Result<Vec<ClientRecord>, StoreError> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE owner_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ClientRecord::from).collect())
    }

    async fn email_taken(
        &self,
        email: &str,
        exclude: Option<ClientId>,
    ) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM clients WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn actor_by_token(&self, token: &str) -> Result<Option<Actor>, StoreError> {
        let row = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, email FROM users WHERE api_token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(id, email)| Actor { id, email }))
    }
}

/// A transaction handle over Postgres.
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl RecordTx for PgTx {
    async fn insert_client(&mut self, client: &ClientRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO clients (id, owner_id, first_name, last_name, email, age, linkedin_url, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(client.id)
        .bind(client.owner_id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(client.age)
        .bind(&client.linkedin_url)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_email_unique(e, &client.email))?;
        Ok(())
    }

    async fn update_client(
        &mut self,
        id: ClientId,
        patch: &ClientPatch,
    ) -> Result<ClientRecord, StoreError> {
        // Lock the row so concurrent updates to the same record serialize
        // on the store's transaction isolation.
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, ClientRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        let mut record = ClientRecord::from(row);
        patch.apply_to(&mut record);
        record.updated_at = Utc::now();

        sqlx::query(
            "UPDATE clients SET first_name = $2, last_name = $3, email = $4, age = $5, \
             linkedin_url = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(record.id)
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(&record.email)
        .bind(record.age)
        .bind(&record.linkedin_url)
        .bind(record.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_email_unique(e, &record.email))?;

        Ok(record)
    }

    async fn delete_client(&mut self, id: ClientId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn append_log(&mut self, entry: &AuditEntry) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO user_logs (action, user_id, date_created) VALUES ($1, $2, $3)")
            .bind(entry.action.as_str())
            .bind(entry.user_id)
            .bind(entry.date_created)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

fn map_email_unique(err: sqlx::Error, email: &str) -> StoreError {
    if let Some(db_err) = err.as_database_error()
        && db_err.is_unique_violation()
    {
        return StoreError::DuplicateEmail {
            email: email.to_string(),
        };
    }
    StoreError::Database(err)
}
