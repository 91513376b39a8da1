use log::{info, warn};
use sqlx::PgPool;
use std::env;

use crate::error::AppResult;
use crate::models::CreateUserRequest;
use crate::services::UsersService;

/// Bootstrap the initial admin account from the CREATE_ADMIN env var.
/// Format: "email:password". Only creates the account when no admin
/// exists yet.
pub async fn create_admin_if_needed(pool: &PgPool) -> AppResult<()> {
    let create_admin = match env::var("CREATE_ADMIN") {
        Ok(val) if !val.is_empty() => val,
        _ => {
            info!("CREATE_ADMIN not set, skipping admin creation");
            return Ok(());
        }
    };

    let admin_count = UsersService::admin_count(pool).await?;
    if admin_count > 0 {
        warn!("CREATE_ADMIN set but an admin already exists. Skipping admin creation.");
        return Ok(());
    }

    // Parse email:password
    let parts: Vec<&str> = create_admin.splitn(2, ':').collect();
    if parts.len() != 2 {
        return Err(crate::error::AppError::Validation(
            "CREATE_ADMIN must be in format 'email:password'".to_string(),
        ));
    }

    let email = parts[0].trim();
    let password = parts[1];

    if password.is_empty() {
        return Err(crate::error::AppError::Validation(
            "Password is required".to_string(),
        ));
    }

    let req = CreateUserRequest {
        first_name: "Site".to_string(),
        last_name: "Admin".to_string(),
        email: email.to_string(),
        phone: None,
        password: Some(password.to_string()),
        is_admin: true,
    };

    UsersService::create_user(pool, &req).await?;
    info!("Admin account created: {}", email);

    Ok(())
}
