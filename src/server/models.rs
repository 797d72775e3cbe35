use serde::{Deserialize, Serialize};

use crate::config::DatabaseConfig;
use crate::db::{FieldInfo, RowMap};
use crate::relationship_graph::JoinPath;
use crate::sql_generator::SelectionState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Backend description returned by `/query/info` and error envelopes.
/// Credentials are deliberately not echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
}

impl From<&DatabaseConfig> for DatabaseInfo {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            kind: config.kind.as_str(),
            host: config.host.clone(),
            port: config.port,
            database: config.database.clone(),
            user: config.user.clone(),
        }
    }
}

/// Successful execution envelope for `POST /query`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    pub query: String,
    pub database: DatabaseInfo,
    pub row_count: usize,
    pub data: Vec<RowMap>,
    pub fields: Vec<FieldInfo>,
    /// True when the result set was truncated to the response row cap
    pub limited: bool,
    pub executed_at: String,
}

/// Failure envelope; fields beyond `error` appear when they apply.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseInfo>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: None,
            query: None,
            database: None,
        }
    }

    pub fn execution(
        error: String,
        code: Option<String>,
        query: String,
        database: DatabaseInfo,
    ) -> Self {
        Self {
            success: false,
            error,
            code,
            query: Some(query),
            database: Some(database),
        }
    }
}

/// `POST /query/build`: a selection state, optionally auto-detecting join
/// paths before synthesis. Never executes the generated statement.
#[derive(Debug, Deserialize)]
pub struct BuildQueryRequest {
    #[serde(flatten)]
    pub selection: SelectionState,

    #[serde(default)]
    pub auto_detect: bool,
}

#[derive(Debug, Serialize)]
pub struct BuildQueryResponse {
    pub sql: String,
    /// The join paths the statement was synthesized from (detected or posted)
    pub join_paths: Vec<JoinPath>,
    pub auto_detected: bool,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub success: bool,
    pub tables: usize,
    pub relationships: usize,
}
