//! JSON-lines audit trail for data-modifying statements.
//!
//! Kept separate from the process log so operators can tail modifications
//! independently. Write failures are logged and swallowed; auditing must
//! never take a query down with it.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

lazy_static! {
    /// Leading statement keyword plus the table it targets.
    static ref STATEMENT_RE: Regex =
        Regex::new(r"(?i)^(insert|update|delete|select)\s+(?:into\s+|from\s+)?([^\s;]+)")
            .expect("statement regex");
    static ref DML_RE: Regex = Regex::new(r"(?i)^\s*(insert|update|delete)").expect("dml regex");
}

/// Whether the statement modifies data (and therefore must be audited).
pub fn is_dml(sql: &str) -> bool {
    DML_RE.is_match(sql)
}

/// Best-effort extraction of `(operation, table)` from a statement.
/// Unrecognized statements report `("QUERY", "")`, matching the audit trail's
/// catch-all convention.
pub fn statement_target(sql: &str) -> (String, String) {
    match STATEMENT_RE.captures(sql.trim()) {
        Some(captures) => (
            captures[1].to_ascii_uppercase(),
            captures[2].to_string(),
        ),
        None => ("QUERY".to_string(), String::new()),
    }
}

#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    sql: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<&'a str>,
    timestamp: String,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::error!("could not create audit log directory: {}", e);
                }
            }
        }
        Self { path }
    }

    /// Audit a DML statement outcome.
    pub fn record_statement(&self, sql: &str, status: &str, error_details: Option<&str>) {
        let (operation, table) = statement_target(sql);
        self.append(&AuditEntry {
            kind: "audit",
            operation: Some(operation),
            table: Some(table),
            sql,
            status,
            error_details,
            timestamp: Utc::now().to_rfc3339(),
        });
    }

    /// Record a request rejected before execution.
    pub fn record_validation_failure(&self, sql: &str, message: &str) {
        self.append(&AuditEntry {
            kind: "validation",
            operation: None,
            table: None,
            sql,
            status: "error",
            error_details: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        });
    }

    /// Record an execution failure reported by the gateway.
    pub fn record_query_error(&self, sql: &str, error: &str) {
        self.append(&AuditEntry {
            kind: "query_error",
            operation: None,
            table: None,
            sql,
            status: "error",
            error_details: Some(error),
            timestamp: Utc::now().to_rfc3339(),
        });
    }

    fn append(&self, entry: &AuditEntry<'_>) {
        let line = match serde_json::to_string(entry) {
            Ok(line) => line,
            Err(e) => {
                log::error!("could not serialize audit entry: {}", e);
                return;
            }
        };

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", line));

        if let Err(e) = result {
            log::error!("could not write audit log {}: {}", self.path.display(), e);
        }
    }
}
