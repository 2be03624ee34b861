use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use study_buddy::config::{LoggingSettings, Settings};
use study_buddy::core::Matcher;
use study_buddy::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use study_buddy::routes::{self, AppState};
use study_buddy::services::{PostgresStore, Store, TokenVerifier};

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, e);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging);

    info!("Starting Study Buddy service...");

    if settings.auth.jwt_secret.is_empty() {
        return Err(startup_error("Configuration error", "auth.jwt_secret must be set"));
    }

    let postgres = PostgresStore::from_settings(&settings.database)
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?;

    info!(
        "PostgreSQL store initialized (max: {} connections)",
        settings.database.max_connections
    );

    let store: Arc<dyn Store> = Arc::new(postgres);

    let matcher = Matcher::new(settings.matching.max_results);

    info!("Matcher initialized (max results: {:?})", matcher.max_results());

    let app_state = AppState::new(store, matcher);
    let verifier = web::Data::new(TokenVerifier::new(
        &settings.auth.jwt_secret,
        settings.auth.leeway_secs,
    ));

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
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
