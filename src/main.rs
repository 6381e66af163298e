use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tag_match::config::{LoggingSettings, Settings, StorageBackend};
use tag_match::routes::error::{handle_form_payload_error, handle_json_payload_error};
use tag_match::routes::{self, AppState};
use tag_match::services::{DiscoveryService, MemoryStore, PostgresStore, ProfileStore, TokenService};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    init_logging(&settings.logging);

    info!("Starting Tag matching service...");

    if settings.auth.secret_key == "change-me" {
        warn!("Using the placeholder secret key; set SECRET_KEY before deploying");
    }

    let store: Arc<dyn ProfileStore> = match settings.storage.backend {
        StorageBackend::Postgres => {
            let postgres = PostgresStore::from_settings(&settings.database).await.map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::other(e.to_string())
            })?;
            info!("PostgreSQL store initialized");
            Arc::new(postgres)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let tokens = TokenService::from_settings(&settings.auth).map_err(|e| {
        error!("Failed to initialize token service: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let discovery = DiscoveryService::from_settings(&settings.discovery);

    info!("Discovery initialized with settings: {:?}", settings.discovery);

    let app_state = AppState {
        store,
        tokens: Arc::new(tokens),
        discovery,
        bcrypt_cost: settings.auth.bcrypt_cost,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::FormConfig::default().error_handler(handle_form_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
