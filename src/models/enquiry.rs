use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A lead enquiry submitted through the public intake form.
///
/// Contact fields may be written directly on the enquiry row (anonymous
/// submissions) or resolved through `user_id` (submissions from known
/// users); some rows carry both.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enquiry {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_type: String,
    pub budget_range: String,
    pub additional_info: Option<String>,
    pub state: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating an enquiry via the intake endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnquiry {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_type: String,
    pub budget_range: String,
    pub additional_info: Option<String>,
    pub state: Option<String>,
    pub user_id: Option<Uuid>,
}
