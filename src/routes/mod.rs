use actix_web::{web, HttpResponse, Responder};
use log::warn;

use crate::{
    errors::AppError,
    types::{AppState, HealthStatus, ResponsePayload, StoreHealth},
};

mod link;

const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Shown in `/health` instead of backend error text
const STORE_UNREACHABLE: &str = "store unreachable";

// Handler function for the root route "/"
async fn index(data: web::Data<AppState>) -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: format!("{} v{}", data.name, data.version),
    };

    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let uptime = data.start_time.elapsed().as_secs();
    let backend = data.store.backend_name().to_string();

    let store = match data.store.ping().await {
        Ok(()) => StoreHealth {
            backend,
            reachable: true,
            message: None,
        },
        Err(e) => {
            warn!("Health check: {} store unreachable: {}", backend, e);
            StoreHealth {
                backend,
                reachable: false,
                message: Some(STORE_UNREACHABLE.to_string()),
            }
        }
    };

    let status = HealthStatus {
        status: if store.reachable { "OK" } else { "DEGRADED" }.to_string(),
        version: data.version.clone(),
        uptime_seconds: uptime,
        store,
    };

    HttpResponse::Ok().json(status)
}

/// Turns unreadable JSON bodies into 400 `{ "error" }` responses
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            AppError::Validation(format!("Invalid request body: {}", err)).into()
        })
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));
    link::configure_routes(cfg);
}
