mod summarize;
mod system;

use actix_web::web;

pub use summarize::{keypoints, summarize};
pub use system::{health, method_not_allowed, not_found};

/// Register every API resource
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/summarize")
            .route(web::post().to(summarize))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/keypoints")
            .route(web::post().to(keypoints))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/health")
            .route(web::get().to(health))
            .default_service(web::to(method_not_allowed)),
    );
}
