use thiserror::Error;

/// Errors raised while loading the schema document.
///
/// Graph lookups for unknown tables are not errors anywhere in this crate;
/// they resolve to an empty adjacency set. Only fetch/parse failures are
/// propagated, and in that case no partial catalog is ever published.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no table named `{table}` in the loaded schema")]
    UnknownTable { table: String },
}
