use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AuthenticatedAdmin;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateUserRequest, UpdateUserRequest};
use crate::routes::auth::is_valid_email;
use crate::services::UsersService;

/// GET /api/users - List users (admin)
pub async fn list_users(
    pool: web::Data<DbPool>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    let users = UsersService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id} - Get a user by ID (admin)
pub async fn get_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = UsersService::get_by_id(pool.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/users - Create a user (admin)
pub async fn create_user(
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserRequest>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    if !is_valid_email(&body.email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    let user = UsersService::create_user(pool.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(user))
}

/// PATCH /api/users/{id} - Update a user's contact details (admin)
pub async fn update_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    if let Some(email) = &body.email {
        if !is_valid_email(email) {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
    }

    let user = UsersService::update(pool.get_ref(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/users/{id} - Delete a user (admin)
pub async fn delete_user(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    UsersService::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::patch().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
