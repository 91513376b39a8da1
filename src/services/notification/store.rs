//! Read-only record-store gateway used by the notification pipeline.
//!
//! The pipeline only ever reads; writes stay in `EnquiryService` and
//! `UsersService`. Going through a trait keeps the orchestrator testable
//! with in-memory fakes instead of a live pool.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Enquiry, User};

/// Read access to enquiry and user records
#[async_trait]
pub trait EnquiryStore: Send + Sync {
    /// Fetch an enquiry by id. `None` when the row does not exist.
    async fn get_enquiry(&self, id: Uuid) -> AppResult<Option<Enquiry>>;

    /// Fetch a user by id. `None` when the row does not exist.
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Fetch only a user's email address. Used as the last-resort
    /// recipient lookup for the email channel.
    async fn get_user_email(&self, id: Uuid) -> AppResult<Option<String>>;
}

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnquiryStore for PgStore {
    async fn get_enquiry(&self, id: Uuid) -> AppResult<Option<Enquiry>> {
        let enquiry = sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, first_name, last_name, email, phone, service_type,
                   budget_range, additional_info, state, user_id, created_at
            FROM enquiries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enquiry)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, phone, password_hash,
                   is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_email(&self, id: Uuid) -> AppResult<Option<String>> {
        let email: Option<(String,)> =
            sqlx::query_as("SELECT email FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(email.map(|(e,)| e))
    }
}
