//! HTTP handler functions for the dashboard API.

use actix_web::{HttpResponse, web};
use police_postcode_dashboard::build_dashboard;
use police_postcode_server_models::{ApiError, ApiHealth};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dashboard/{postcode}`
///
/// 404 when the postcode does not resolve or has no recorded crimes, 502
/// when an upstream service fails.
pub async fn dashboard(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let postcode = path.into_inner();

    match build_dashboard(state.resolver.as_ref(), state.source.as_ref(), &postcode).await {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard),
        Err(e) if e.is_not_found() => HttpResponse::NotFound().json(ApiError::new(e.to_string())),
        Err(e) => {
            log::error!("Failed to build dashboard for {postcode:?}: {e}");
            HttpResponse::BadGateway().json(ApiError::new(e.to_string()))
        }
    }
}
