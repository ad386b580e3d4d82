//! # Client Repository
//!
//! Owner-scoped client CRUD and the per-status counts behind the
//! status summary.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use confeitaria_core::{Client, ClientStatus, NewClient};

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists the user's clients by name.
    pub async fn list(&self, user_id: i64) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, user_id, name, email, status FROM clients \
             WHERE user_id = ?1 ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id, count = clients.len(), "Listed clients");
        Ok(clients)
    }

    /// Gets one of the user's clients.
    pub async fn get(&self, user_id: i64, id: i64) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, user_id, name, email, status FROM clients \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Checks ownership through an open transaction.
    ///
    /// The order workflow calls this on its own connection so the check and
    /// the order insert see the same snapshot.
    pub async fn is_owned_by(conn: &mut SqliteConnection, user_id: i64, id: i64) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM clients WHERE id = ?1 AND user_id = ?2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(found.is_some())
    }

    /// Inserts a client for the user.
    pub async fn insert(&self, user_id: i64, client: &NewClient) -> DbResult<Client> {
        debug!(user_id, name = %client.name, "Inserting client");

        let result = sqlx::query(
            "INSERT INTO clients (user_id, name, email, status) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(user_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(client.status)
        .execute(&self.pool)
        .await?;

        Ok(Client {
            id: result.last_insert_rowid(),
            user_id,
            name: client.name.clone(),
            email: client.email.clone(),
            status: client.status,
        })
    }

    /// Replaces a client's fields.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such client for this user
    pub async fn update(&self, user_id: i64, id: i64, client: &NewClient) -> DbResult<Client> {
        debug!(user_id, id, "Updating client");

        let result = sqlx::query(
            "UPDATE clients SET name = ?3, email = ?4, status = ?5 \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(client.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(Client {
            id,
            user_id,
            name: client.name.clone(),
            email: client.email.clone(),
            status: client.status,
        })
    }

    /// Deletes a client.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such client for this user
    /// * `Err(DbError::ForeignKeyViolation)` - Client still has orders or feedbacks
    pub async fn delete(&self, user_id: i64, id: i64) -> DbResult<()> {
        debug!(user_id, id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", id));
        }

        Ok(())
    }

    /// Number of the user's clients per status. Absent statuses are omitted.
    pub async fn status_counts(&self, user_id: i64) -> DbResult<Vec<(ClientStatus, i64)>> {
        let counts = sqlx::query_as::<_, (ClientStatus, i64)>(
            "SELECT status, COUNT(*) FROM clients WHERE user_id = ?1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
