use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::ServerConfig;
use crate::db::{self, SqlExecutor};
use crate::schema_catalog::SchemaCatalog;

pub mod audit;
pub mod handlers;
pub mod models;

use handlers::{
    build_query_handler, connected_tables_handler, database_info_handler, get_schema_handler,
    health_check, query_handler, reload_schema_handler, test_connection_handler,
};

/// Largest accepted request body (mirrors the JSON body limit of the API).
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    /// None when the backend was unreachable at startup; the server still
    /// serves the schema and query-builder endpoints (schema-only mode).
    pub executor: Option<Arc<dyn SqlExecutor>>,
    pub catalog: Arc<RwLock<SchemaCatalog>>,
    pub audit: audit::AuditLog,
    pub config: ServerConfig,
}

pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/query", post(query_handler))
        .route("/query/test", get(test_connection_handler))
        .route("/query/info", get(database_info_handler))
        .route("/query/build", post(build_query_handler))
        .route("/schema", get(get_schema_handler))
        .route("/schema/reload", post(reload_schema_handler))
        .route("/schema/connected/{table}", get(connected_tables_handler))
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(app_state)
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}:{}, backend={}, schema={}",
        config.http_host,
        config.http_port,
        config.database.kind.as_str(),
        config.schema_path
    );

    // Schema load failure is fatal: no partial catalog is ever published.
    let catalog = match SchemaCatalog::from_file(&config.schema_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to load schema from {}: {}", config.schema_path, e);
            log::error!("Server cannot start without a schema document.");
            std::process::exit(1);
        }
    };

    let executor = match db::connect(&config.database).await {
        Ok(executor) => {
            if executor.test_connection().await {
                log::info!("Connected to {} backend", config.database.kind.as_str());
            } else {
                log::warn!(
                    "{} backend is not responding; query endpoints will report errors",
                    config.database.kind.as_str()
                );
            }
            Some(executor)
        }
        Err(e) => {
            log::warn!(
                "Could not connect to {} backend: {}. Running in schema-only mode.",
                config.database.kind.as_str(),
                e
            );
            None
        }
    };

    let app_state = Arc::new(AppState {
        executor,
        catalog: Arc::new(RwLock::new(catalog)),
        audit: audit::AuditLog::new(&config.audit_log_path),
        config: config.clone(),
    });

    let app = build_router(app_state);

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    log::info!("Starting HTTP server on {}", http_bind_address);

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(http_listener, app).await {
        log::error!("HTTP server error: {}", e);
    }
}
