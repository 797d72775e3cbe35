//! Relationship graph: a bidirectional view of the schema's foreign keys.
//!
//! Every declared foreign key contributes two edges: an `fk_out` edge stored
//! under the referencing table and a matching `fk_in` edge stored under the
//! referenced table with the fields swapped. The graph is symmetric by
//! construction.

pub mod graph;
pub mod path_finder;

#[cfg(test)]
mod graph_tests;
#[cfg(test)]
mod path_finder_tests;

pub use graph::{EdgeKind, RelEdge, RelationshipGraph};
pub use path_finder::{
    connected_tables, find_all_paths, find_optimal_join_paths, find_path_through_intermediate,
    JoinPath, MAX_PATH_DEPTH, OPTIMAL_SEARCH_DEPTH,
};
