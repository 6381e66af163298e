// Route exports
pub mod auth;
pub mod error;
pub mod users;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::HealthResponse;
use crate::services::{DiscoveryService, ProfileStore, TokenService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub tokens: Arc<TokenService>,
    pub discovery: DiscoveryService,
    pub bcrypt_cost: u32,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/health", web::get().to(health_check))
        .configure(auth::configure)
        .configure(users::configure);
}

async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Welcome to tag!" }))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
