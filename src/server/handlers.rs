use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::db::QueryOutcome;
use crate::relationship_graph::{connected_tables, find_optimal_join_paths, OPTIMAL_SEARCH_DEPTH};
use crate::schema_catalog::{errors::SchemaError, SchemaCatalog};
use crate::sql_generator;

use super::audit;
use super::models::{
    BuildQueryRequest, BuildQueryResponse, DatabaseInfo, ErrorResponse, QueryRequest,
    QueryResponse, ReloadResponse,
};
use super::AppState;

/// Longest accepted statement, in characters.
const MAX_QUERY_LENGTH: usize = 10_000;

/// Result sets larger than this are truncated in the response.
const MAX_RESPONSE_ROWS: usize = 1_000;

/// Simple health check endpoint
pub async fn health_check(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "relquery",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "database": app_state.config.database.kind.as_str(),
    }))
}

fn validate_query(query: &str) -> Result<(), String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err("query must be a non-empty string".to_string());
    }
    if trimmed.len() > MAX_QUERY_LENGTH {
        return Err(format!(
            "query too long (maximum {} characters)",
            MAX_QUERY_LENGTH
        ));
    }
    Ok(())
}

/// Execute a raw SQL statement against the configured backend.
pub async fn query_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<QueryRequest>,
) -> Response {
    if let Err(message) = validate_query(&payload.query) {
        app_state
            .audit
            .record_validation_failure(&payload.query, &message);
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::message(message))).into_response();
    }

    let Some(executor) = app_state.executor.as_ref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::message("no database connection available")),
        )
            .into_response();
    };

    log::info!(
        "Executing query on {}: {}",
        executor.kind().as_str(),
        payload.query.chars().take(100).collect::<String>()
    );

    match executor.execute(&payload.query).await {
        QueryOutcome::Success {
            data,
            row_count,
            fields,
        } => {
            if audit::is_dml(&payload.query) {
                app_state.audit.record_statement(&payload.query, "success", None);
            }

            let limited = data.len() > MAX_RESPONSE_ROWS;
            let data = if limited {
                data.into_iter().take(MAX_RESPONSE_ROWS).collect()
            } else {
                data
            };

            Json(QueryResponse {
                success: true,
                query: payload.query,
                database: DatabaseInfo::from(&app_state.config.database),
                row_count,
                data,
                fields,
                limited,
                executed_at: Utc::now().to_rfc3339(),
            })
            .into_response()
        }
        QueryOutcome::Failure { error, code } => {
            if audit::is_dml(&payload.query) {
                app_state
                    .audit
                    .record_statement(&payload.query, "error", Some(&error));
            }
            app_state.audit.record_query_error(&payload.query, &error);

            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::execution(
                    error,
                    code,
                    payload.query,
                    DatabaseInfo::from(&app_state.config.database),
                )),
            )
                .into_response()
        }
    }
}

/// Run `SELECT 1` against the backend to verify connectivity.
pub async fn test_connection_handler(State(app_state): State<Arc<AppState>>) -> Response {
    let info = DatabaseInfo::from(&app_state.config.database);

    let ok = match app_state.executor.as_ref() {
        Some(executor) => executor.test_connection().await,
        None => false,
    };

    if ok {
        Json(serde_json::json!({
            "success": true,
            "message": format!("{} connection is working", info.kind),
            "database": info,
            "timestamp": Utc::now().to_rfc3339(),
        }))
        .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": format!("{} connection failed", info.kind),
                "database": info,
            })),
        )
            .into_response()
    }
}

/// Describe the configured backend (without credentials).
pub async fn database_info_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let info = DatabaseInfo::from(&app_state.config.database);
    Json(serde_json::json!({
        "success": true,
        "database": info,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Return the loaded schema document.
pub async fn get_schema_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = app_state.catalog.read().await;
    Json(catalog.schema().clone())
}

/// Re-read the schema file and rebuild the relationship graph. The previous
/// catalog stays in place when the reload fails.
pub async fn reload_schema_handler(State(app_state): State<Arc<AppState>>) -> Response {
    match SchemaCatalog::from_file(&app_state.config.schema_path) {
        Ok(catalog) => {
            let response = ReloadResponse {
                success: true,
                tables: catalog.graph().table_count(),
                relationships: catalog.graph().edge_count(),
            };
            *app_state.catalog.write().await = catalog;
            Json(response).into_response()
        }
        Err(e) => {
            log::error!("Schema reload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::message(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Tables reachable from the given table, with the connecting paths.
pub async fn connected_tables_handler(
    State(app_state): State<Arc<AppState>>,
    Path(table): Path<String>,
) -> Response {
    let catalog = app_state.catalog.read().await;

    if !catalog.schema().contains_key(&table) {
        let error = SchemaError::UnknownTable { table };
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::message(error.to_string())),
        )
            .into_response();
    }

    let connected = connected_tables(
        catalog.graph(),
        catalog.schema(),
        &table,
        OPTIMAL_SEARCH_DEPTH,
    );
    Json(connected).into_response()
}

/// Synthesize SQL from a posted selection state; never executes it.
pub async fn build_query_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<BuildQueryRequest>,
) -> impl IntoResponse {
    let catalog = app_state.catalog.read().await;
    let mut selection = payload.selection;

    if payload.auto_detect {
        let detected = find_optimal_join_paths(catalog.graph(), &selection.tables);
        log::debug!(
            "Auto-detected {} join path(s) for {:?}",
            detected.len(),
            selection.tables
        );
        selection.set_join_paths(detected);
    }

    let sql = sql_generator::generate(catalog.graph(), &selection);

    Json(BuildQueryResponse {
        sql,
        join_paths: selection.join_paths,
        auto_detected: payload.auto_detect,
    })
}
