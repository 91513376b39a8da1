use std::sync::Arc;

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AuthenticatedAdmin;
use crate::config::{Config, DispatchMode};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::CreateEnquiry;
use crate::services::{EnquiryService, Notifier};

/// GET /api/enquiries - List enquiries (admin)
pub async fn list_enquiries(
    pool: web::Data<DbPool>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    let enquiries = EnquiryService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(enquiries))
}

/// GET /api/enquiries/{id} - Get an enquiry by ID (admin)
pub async fn get_enquiry(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    let enquiry = EnquiryService::get_by_id(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(enquiry))
}

/// POST /api/enquiries - Create a new enquiry (public intake form)
///
/// Notification dispatch runs per `NOTIFY_DISPATCH`: spawned on a
/// detached task (default) or awaited inline. Either way the response is
/// the created enquiry; notification outcomes never change it.
pub async fn create_enquiry(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    notifier: web::Data<Arc<Notifier>>,
    body: web::Json<CreateEnquiry>,
) -> AppResult<HttpResponse> {
    let enquiry = EnquiryService::create(pool.get_ref(), body.into_inner()).await?;

    let enquiry_id = enquiry.id;
    match config.notify.dispatch {
        DispatchMode::Spawn => {
            let notifier = notifier.get_ref().clone();
            tokio::spawn(async move {
                notifier.notify_new_enquiry(enquiry_id).await;
            });
        }
        DispatchMode::Await => {
            notifier.notify_new_enquiry(enquiry_id).await;
        }
    }

    Ok(HttpResponse::Created().json(enquiry))
}

/// POST /api/enquiries/{id}/notify - Re-run notifications (admin)
///
/// Manual re-trigger for enquiries whose notifications failed; returns
/// the per-channel report.
pub async fn renotify_enquiry(
    notifier: web::Data<Arc<Notifier>>,
    path: web::Path<Uuid>,
    _admin: AuthenticatedAdmin,
) -> AppResult<HttpResponse> {
    let report = notifier.notify_new_enquiry(path.into_inner()).await;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure enquiry routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/enquiries")
            .route("", web::get().to(list_enquiries))
            .route("", web::post().to(create_enquiry))
            .route("/{id}", web::get().to(get_enquiry))
            .route("/{id}/notify", web::post().to(renotify_enquiry)),
    );
}
