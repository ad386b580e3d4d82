//! # Feedback Repository
//!
//! Feedbacks hang off clients, so ownership is checked by joining
//! `clients.user_id`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use confeitaria_core::{Feedback, FeedbackView, NewFeedback};

const VIEW_SELECT: &str = "SELECT f.id, f.client_id, c.name AS client_name, f.rating, f.comment, \
     f.photo, f.created_at \
     FROM feedbacks f JOIN clients c ON c.id = f.client_id";

/// Repository for feedback database operations.
#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    pool: SqlitePool,
}

impl FeedbackRepository {
    /// Creates a new FeedbackRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FeedbackRepository { pool }
    }

    /// Records a feedback for one of the user's clients.
    ///
    /// The insert selects from `clients` with the owner predicate, so a
    /// foreign client id writes nothing.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Client missing or owned by another user
    pub async fn insert(&self, user_id: i64, feedback: &NewFeedback) -> DbResult<Feedback> {
        debug!(user_id, client_id = feedback.client_id, rating = feedback.rating, "Inserting feedback");

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO feedbacks (client_id, rating, comment, photo, created_at) \
             SELECT id, ?3, ?4, ?5, ?6 FROM clients WHERE id = ?1 AND user_id = ?2",
        )
        .bind(feedback.client_id)
        .bind(user_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(&feedback.photo)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Client", feedback.client_id));
        }

        Ok(Feedback {
            id: result.last_insert_rowid(),
            client_id: feedback.client_id,
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            photo: feedback.photo.clone(),
            created_at: now,
        })
    }

    /// All feedbacks across the user's clients, newest first.
    pub async fn list(&self, user_id: i64) -> DbResult<Vec<FeedbackView>> {
        let feedbacks = sqlx::query_as::<_, FeedbackView>(&format!(
            "{VIEW_SELECT} WHERE c.user_id = ?1 ORDER BY f.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(feedbacks)
    }

    /// Feedbacks of one client, newest first. Empty for a foreign client.
    pub async fn list_for_client(&self, user_id: i64, client_id: i64) -> DbResult<Vec<FeedbackView>> {
        let feedbacks = sqlx::query_as::<_, FeedbackView>(&format!(
            "{VIEW_SELECT} WHERE c.user_id = ?1 AND f.client_id = ?2 ORDER BY f.id DESC"
        ))
        .bind(user_id)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(feedbacks)
    }
}
