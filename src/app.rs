use std::{sync::Arc, time::Instant};

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use env_logger::Env;
use log::{debug, info, warn};

use crate::{
    config::{Config, Environment, StoreBackend},
    db::Database,
    errors::AppError,
    middleware::RequestLogger,
    routes,
    services::Services,
    stores::{LinkStore, MemoryLinkStore, PgLinkStore, RedisLinkStore, TimedLinkStore},
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

/// Chosen backend plus the pool to close on shutdown, if any
struct StoreHandle {
    store: Arc<dyn LinkStore>,
    database: Option<Database>,
}

async fn open_store(config: &Config) -> AppResult<StoreHandle> {
    let (backend, database): (Arc<dyn LinkStore>, Option<Database>) = match config.store.backend {
        StoreBackend::Memory => (Arc::new(MemoryLinkStore::new()), None),
        StoreBackend::Postgres => {
            let db = Database::connect(&config.db)
                .await
                .map_err(|e| AppError::Startup(e.to_string()))?;
            (Arc::new(PgLinkStore::new(&db)), Some(db))
        }
        StoreBackend::Redis => {
            let store = RedisLinkStore::connect(&config.redis)
                .await
                .map_err(|e| AppError::Startup(e.to_string()))?;
            (Arc::new(store), None)
        }
    };

    info!(
        "Using {} link store with {}ms operation timeout",
        backend.backend_name(),
        config.store.timeout_ms
    );
    if let Some(message) = volatile_store_warning(config.store.backend, config.app.environment) {
        warn!("{}", message);
    }

    Ok(StoreHandle {
        store: Arc::new(TimedLinkStore::new(backend, config.store.timeout())),
        database,
    })
}

fn volatile_store_warning(backend: StoreBackend, environment: Environment) -> Option<&'static str> {
    match (backend, environment) {
        (StoreBackend::Memory, Environment::Production) => {
            Some("In-memory link store selected in production; links are lost on restart")
        }
        _ => None,
    }
}

fn cors(config: &Config) -> Cors {
    let origins = &config.server.cors_allowed_origins;

    if origins.is_empty() {
        if config.app.environment == Environment::Production {
            // Same-origin only
            return Cors::default();
        }
        return Cors::permissive();
    }

    origins.iter().fold(
        Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

pub async fn server() -> AppResult<()> {
    // Logger needs the config, so `.env` problems are reported once it is up
    let dotenv_result = dotenv();
    let config = Config::load()?;

    setup_logging(&config)?;

    match dotenv_result {
        Ok(path) => debug!(".env file loaded from {}", path.display()),
        Err(e) => warn!("Could not load .env file: {}", e),
    }
    info!("Configuration loaded successfully");

    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    match &config.shortener.public_host {
        Some(host) => info!("Short URLs use host '{}'", host),
        None => info!("Short URLs use the request host"),
    }
    if config.shortener.id_seed.is_some() {
        warn!("SHORT_ID_SEED is set; random short ids are reproducible");
    }

    let StoreHandle { store, database } = open_store(&config).await?;

    // One set of services for all workers so the id generator is shared
    let services = Services::new(store.clone(), &config);

    let enable_debug_logging = config.app.environment != Environment::Production;

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}o"
    } else {
        "%a \"%r\" %s %b %T"
    };

    let app_config = config.clone();

    HttpServer::new(move || {
        let state = AppState {
            start_time,
            name: app_config.app.name.clone(),
            version: app_config.app.version.clone(),
            store: store.clone(),
        };
        let services = services.clone();

        App::new()
            .app_data(web::Data::new(state))
            .app_data(routes::json_config())
            .wrap(Logger::new(log_format))
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(cors(&app_config))
            .configure(move |cfg| services.register(cfg))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    if let Some(db) = database {
        db.shutdown().await;
    }

    info!("{} stopped", config.app.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_in_production_is_flagged() {
        assert!(volatile_store_warning(StoreBackend::Memory, Environment::Production).is_some());
    }

    #[test]
    fn durable_or_non_production_stores_are_quiet() {
        assert!(volatile_store_warning(StoreBackend::Memory, Environment::Development).is_none());
        assert!(volatile_store_warning(StoreBackend::Memory, Environment::Testing).is_none());
        assert!(volatile_store_warning(StoreBackend::Postgres, Environment::Production).is_none());
        assert!(volatile_store_warning(StoreBackend::Redis, Environment::Production).is_none());
    }
}
