//! # User Repository
//!
//! Accounts. The password hash is written once at signup and only read
//! back for login.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use confeitaria_core::{User, DEFAULT_PLAN};

const USER_COLUMNS: &str = "id, name, email, password_hash, plan, created_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an account on the default plan.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn create(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        debug!(email = %email, "Creating user");

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, plan, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(DEFAULT_PLAN)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: email.to_string(),
            },
            other => other,
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            plan: DEFAULT_PLAN.to_string(),
            created_at: now,
        })
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by login email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Changes the plan of an account.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - User doesn't exist
    pub async fn update_plan(&self, id: i64, plan: &str) -> DbResult<()> {
        debug!(user_id = id, plan = %plan, "Updating plan");

        let result = sqlx::query("UPDATE users SET plan = ?2 WHERE id = ?1")
            .bind(id)
            .bind(plan)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support;
    use crate::DbError;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let db = test_support::database().await;

        let user = db.users().create("Ana", "ana@example.com", "hash").await.unwrap();
        assert_eq!(user.plan, "Free");

        let by_email = db.users().get_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password_hash, "hash");

        assert!(db.users().get_by_id(user.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_support::database().await;

        db.users().create("Ana", "ana@example.com", "hash").await.unwrap();
        let err = db
            .users()
            .create("Other Ana", "ana@example.com", "hash")
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "ana@example.com"));
        let kept = db.users().get_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(kept.name, "Ana");
    }

    #[tokio::test]
    async fn test_update_plan() {
        let db = test_support::database().await;
        let user = test_support::user(&db, "ana@example.com").await;

        db.users().update_plan(user.id, "Pro").await.unwrap();
        let user = db.users().get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.plan, "Pro");

        assert!(matches!(
            db.users().update_plan(999, "Pro").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
