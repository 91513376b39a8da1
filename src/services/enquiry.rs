use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateEnquiry, Enquiry};

pub struct EnquiryService;

impl EnquiryService {
    /// Lists all enquiries, newest first
    pub async fn list(pool: &PgPool) -> AppResult<Vec<Enquiry>> {
        let enquiries = sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, first_name, last_name, email, phone, service_type,
                   budget_range, additional_info, state, user_id, created_at
            FROM enquiries
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(enquiries)
    }

    /// Gets an enquiry by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> AppResult<Enquiry> {
        sqlx::query_as::<_, Enquiry>(
            r#"
            SELECT id, first_name, last_name, email, phone, service_type,
                   budget_range, additional_info, state, user_id, created_at
            FROM enquiries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Enquiry {} not found", id)))
    }

    /// Creates a new enquiry. Notification dispatch belongs to the
    /// caller; this only writes the row.
    pub async fn create(pool: &PgPool, input: CreateEnquiry) -> AppResult<Enquiry> {
        if input.service_type.trim().is_empty() {
            return Err(AppError::Validation("service_type is required".to_string()));
        }
        if input.budget_range.trim().is_empty() {
            return Err(AppError::Validation("budget_range is required".to_string()));
        }

        let enquiry = sqlx::query_as::<_, Enquiry>(
            r#"
            INSERT INTO enquiries (first_name, last_name, email, phone, service_type,
                                   budget_range, additional_info, state, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, first_name, last_name, email, phone, service_type,
                      budget_range, additional_info, state, user_id, created_at
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.service_type)
        .bind(&input.budget_range)
        .bind(&input.additional_info)
        .bind(&input.state)
        .bind(input.user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return AppError::Validation("user_id references no known user".to_string());
                }
            }
            AppError::Database(e)
        })?;

        log::info!("Created enquiry {}", enquiry.id);
        Ok(enquiry)
    }
}
