use actix_web::{web, HttpResponse};
use tracing::debug;

use crate::state::AppState;
use crate::types::{ErrorResponse, HealthResponse};

/// GET /health, independent of provider state
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check");

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: state.config.generation.model_name.clone(),
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Not found"))
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse::new("Method not allowed"))
}
