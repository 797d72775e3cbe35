use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::schema_catalog::schema_types::Schema;

/// Direction of a relationship edge relative to the table it is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// This table has a foreign key pointing outward
    FkOut,
    /// Another table points into this one
    FkIn,
}

/// One relationship edge: the neighbor table and the field pair joining them.
///
/// Edges compare by value so that set membership and join deduplication are
/// well-defined regardless of where an edge instance came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelEdge {
    /// Neighbor table this edge leads to
    pub table: String,

    #[serde(rename = "type")]
    pub kind: EdgeKind,

    /// Field on the side the edge is stored under
    pub from_field: String,

    /// Field on the neighbor side
    pub to_field: String,
}

/// Adjacency sets keyed by table name.
///
/// Iteration order is insertion order (schema document order), which keeps
/// path discovery deterministic for a given build.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    adjacency: IndexMap<String, IndexSet<RelEdge>>,
}

impl RelationshipGraph {
    /// Build the graph in a single pass over every table's foreign-key fields.
    ///
    /// A dangling foreign key (target table absent from the schema) still gets
    /// its entry here; lookups for tables nobody references resolve to an
    /// empty adjacency set instead of an error.
    pub fn build(schema: &Schema) -> Self {
        let mut adjacency: IndexMap<String, IndexSet<RelEdge>> = IndexMap::new();

        for (table, def) in schema {
            adjacency.entry(table.clone()).or_default();

            for field in &def.fields {
                let Some(fk) = &field.fk else { continue };

                adjacency.entry(table.clone()).or_default().insert(RelEdge {
                    table: fk.table.clone(),
                    kind: EdgeKind::FkOut,
                    from_field: field.name.clone(),
                    to_field: fk.field.clone(),
                });

                adjacency
                    .entry(fk.table.clone())
                    .or_default()
                    .insert(RelEdge {
                        table: table.clone(),
                        kind: EdgeKind::FkIn,
                        from_field: fk.field.clone(),
                        to_field: field.name.clone(),
                    });
            }
        }

        Self { adjacency }
    }

    /// Edges stored under `table`; empty for unknown tables.
    pub fn neighbors(&self, table: &str) -> impl Iterator<Item = &RelEdge> + '_ {
        self.adjacency.get(table).into_iter().flatten()
    }

    pub fn contains(&self, table: &str) -> bool {
        self.adjacency.contains_key(table)
    }

    pub fn table_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum()
    }

    /// Whether `table` has an edge (in either direction) leading to `other`.
    pub fn are_related(&self, table: &str, other: &str) -> bool {
        self.neighbors(table).any(|edge| edge.table == other)
    }
}
