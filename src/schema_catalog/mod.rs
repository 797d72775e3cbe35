//! Schema catalog: the loaded schema document plus its relationship graph.
//!
//! The graph is rebuilt from scratch on every (re)load; there is no
//! incremental mutation. A load failure leaves the previous catalog in place.

pub mod errors;
pub mod schema_types;

use std::path::Path;

use crate::relationship_graph::RelationshipGraph;
use errors::SchemaError;
use schema_types::Schema;

#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    schema: Schema,
    graph: RelationshipGraph,
}

impl SchemaCatalog {
    /// Build a catalog from an already parsed schema document.
    pub fn from_schema(schema: Schema) -> Self {
        let graph = RelationshipGraph::build(&schema);
        log::debug!(
            "Relationship graph built: {} tables, {} edges",
            graph.table_count(),
            graph.edge_count()
        );
        Self { schema, graph }
    }

    /// Load a catalog from a JSON schema file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let schema: Schema = serde_json::from_str(&content)?;
        log::info!(
            "Schema loaded from {}: {} tables",
            path.display(),
            schema.len()
        );
        Ok(Self::from_schema(schema))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }
}
