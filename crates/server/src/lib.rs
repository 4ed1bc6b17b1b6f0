//! Summariser HTTP Server
//!
//! actix-web REST API in front of the admission pipeline

pub mod error;
pub mod pipeline;
pub mod rate_limit;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use summariser_common::{AppConfig, Result};
use summariser_llm::LlmClient;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use rate_limit::{RateLimitWindow, RateLimiter};
pub use sanitize::{sanitize, SanitizedText};
pub use state::AppState;
pub use types::{ErrorResponse, HealthResponse, SummarizeRequest};

/// App data, body limit and routes for one worker
pub fn app_config(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let body_limit = state.config.max_body_bytes;

        cfg.app_data(state)
            .app_data(web::PayloadConfig::new(body_limit));
        routes::configure(cfg);
    }
}

/// CORS policy for the configured origins ("*" allows any)
pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Bind and run the HTTP server until shutdown
pub async fn start_server(config: AppConfig, client: Arc<dyn LlmClient>) -> Result<()> {
    let bind_address = config.server_bind_address();
    let workers = config.workers;
    let state = web::Data::new(AppState::new(config, client));

    info!(
        "Starting server on {} (model: {}, rate limit: {} calls / {:?})",
        bind_address,
        state.config.generation.model_name,
        state.limiter.max_calls(),
        state.limiter.period()
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(cors(&state.config.cors_allowed_origins))
            .wrap(TracingLogger::default())
            .configure(app_config(state.clone()))
            .default_service(web::to(routes::not_found))
    });

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server.bind(&bind_address)?.run().await?;

    info!("Server stopped");
    Ok(())
}
