//! Query execution gateway: runs opaque SQL against the configured backend.
//!
//! The query builder core never inspects backend error codes; it only
//! distinguishes success from failure and renders `data`/`row_count`. Both
//! outcomes are ordinary values, matching the envelope the HTTP layer exposes.

pub mod mysql;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{DatabaseConfig, DatabaseKind};

/// Column metadata reported alongside result rows.
#[derive(Debug, Clone, Serialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// One result row: column name to JSON value, in result-set order.
pub type RowMap = serde_json::Map<String, Value>;

/// Outcome of executing one SQL statement.
#[derive(Debug)]
pub enum QueryOutcome {
    Success {
        data: Vec<RowMap>,
        row_count: usize,
        fields: Vec<FieldInfo>,
    },
    /// Surfaced verbatim to the caller; no retry, no partial-result salvage.
    Failure {
        error: String,
        code: Option<String>,
    },
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success { .. })
    }
}

/// Connection or pool setup failures. Per-statement failures are not errors
/// at this level; they come back as [`QueryOutcome::Failure`].
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("PostgreSQL connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MySQL connection failed: {0}")]
    Mysql(#[from] mysql_async::Error),
}

/// Backend-agnostic SQL executor.
///
/// No statement timeout is enforced here; a long-running query holds its
/// request until the transport gives up. Known limitation.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> QueryOutcome;

    fn kind(&self) -> DatabaseKind;

    /// Round-trip check used by `/query/test` and at startup.
    async fn test_connection(&self) -> bool {
        self.execute("SELECT 1").await.is_success()
    }
}

/// Connect to the backend named by the configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn SqlExecutor>, GatewayError> {
    match config.kind {
        DatabaseKind::Mysql => Ok(Arc::new(mysql::MysqlExecutor::new(config))),
        DatabaseKind::Postgres => Ok(Arc::new(
            postgres::PostgresExecutor::connect(config).await?,
        )),
    }
}
