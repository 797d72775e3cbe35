//! Join path discovery over the relationship graph.
//!
//! All searches are breadth-first and depth-bounded. Paths are transient
//! values computed per request; nothing here mutates the graph.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use super::graph::{RelEdge, RelationshipGraph};
use crate::schema_catalog::schema_types::Schema;

/// Ordered sequence of edges connecting a start table to an end table.
pub type JoinPath = Vec<RelEdge>;

/// Depth bound for general path enumeration.
pub const MAX_PATH_DEPTH: usize = 3;

/// Depth bound for the auto-detection passes.
pub const OPTIMAL_SEARCH_DEPTH: usize = 2;

/// Enumerate all simple paths from `start` to `end` up to `max_depth` edges.
///
/// Returns `[[]]` when `start == end`. Cycle avoidance is path-local: a table
/// excluded from one path may still appear in another returned path. The
/// search never terminates early, so the result is the complete set of paths
/// within the bound.
pub fn find_all_paths(
    graph: &RelationshipGraph,
    start: &str,
    end: &str,
    max_depth: usize,
) -> Vec<JoinPath> {
    if start == end {
        return vec![JoinPath::new()];
    }

    let mut paths = Vec::new();
    let mut queue: VecDeque<(String, JoinPath)> = VecDeque::new();
    queue.push_back((start.to_string(), JoinPath::new()));

    while let Some((current, path)) = queue.pop_front() {
        if path.len() >= max_depth {
            continue;
        }

        for edge in graph.neighbors(&current) {
            if edge.table == end {
                let mut found = path.clone();
                found.push(edge.clone());
                paths.push(found);
            } else if !path.iter().any(|step| step.table == edge.table) {
                let mut next = path.clone();
                next.push(edge.clone());
                queue.push_back((edge.table.clone(), next));
            }
        }
    }

    paths
}

/// Tables reachable from `table`, with every connecting path up to `max_depth`.
///
/// Used for interactive "connected tables" discovery, not for join synthesis.
pub fn connected_tables(
    graph: &RelationshipGraph,
    schema: &Schema,
    table: &str,
    max_depth: usize,
) -> IndexMap<String, Vec<JoinPath>> {
    let mut connected = IndexMap::new();

    for other in schema.keys() {
        if other != table {
            let paths = find_all_paths(graph, table, other, max_depth);
            if !paths.is_empty() {
                connected.insert(other.clone(), paths);
            }
        }
    }

    connected
}

/// Find a path set connecting as many of the selected `tables` as possible.
///
/// A single BFS frontier is seeded from `tables[0]` and bounded to
/// [`OPTIMAL_SEARCH_DEPTH`]; the first path that reaches a selected table wins
/// and is not replaced by later discoveries. Tables the primary pass leaves
/// unreachable get a secondary [`find_path_through_intermediate`] attempt that
/// may bridge through tables outside the selection. Anything still unconnected
/// is silently left out; the synthesizer degrades gracefully in that case.
pub fn find_optimal_join_paths(graph: &RelationshipGraph, tables: &[String]) -> Vec<JoinPath> {
    if tables.len() < 2 {
        return Vec::new();
    }

    let start = &tables[0];
    let mut paths: Vec<JoinPath> = Vec::new();
    let mut visited: IndexSet<String> = IndexSet::new();
    visited.insert(start.clone());

    let mut queue: VecDeque<(String, JoinPath, usize)> = VecDeque::new();
    queue.push_back((start.clone(), JoinPath::new(), 0));

    while let Some((current, path, depth)) = queue.pop_front() {
        if depth > OPTIMAL_SEARCH_DEPTH {
            continue;
        }

        for edge in graph.neighbors(&current) {
            if tables.contains(&edge.table) && !visited.contains(&edge.table) {
                let mut new_path = path.clone();
                new_path.push(edge.clone());
                paths.push(new_path.clone());
                visited.insert(edge.table.clone());
                queue.push_back((edge.table.clone(), new_path, depth + 1));
            }
        }
    }

    // Tables made reachable by the recorded paths, seeded with the start table.
    let mut connected: IndexSet<String> = IndexSet::new();
    connected.insert(start.clone());
    for path in &paths {
        for edge in path {
            connected.insert(edge.table.clone());
        }
    }

    // Secondary pass: bridge leftover tables through arbitrary intermediates.
    if let Some(anchor) = connected.first().cloned() {
        for table in tables.iter().filter(|t| !connected.contains(*t)) {
            let bridged =
                find_path_through_intermediate(graph, &anchor, table, OPTIMAL_SEARCH_DEPTH);
            paths.extend(bridged);
        }
    }

    paths
}

/// BFS from `start` to `end` allowing any intermediate table.
///
/// Unlike [`find_all_paths`], the visited set is global to the search, so at
/// most one path per intermediate table is explored.
pub fn find_path_through_intermediate(
    graph: &RelationshipGraph,
    start: &str,
    end: &str,
    max_depth: usize,
) -> Vec<JoinPath> {
    let mut paths = Vec::new();
    let mut visited: IndexSet<String> = IndexSet::new();
    let mut queue: VecDeque<(String, JoinPath, usize)> = VecDeque::new();
    queue.push_back((start.to_string(), JoinPath::new(), 0));

    while let Some((current, path, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for edge in graph.neighbors(&current) {
            if edge.table == end {
                let mut found = path.clone();
                found.push(edge.clone());
                paths.push(found);
            } else if !visited.contains(&edge.table) {
                visited.insert(edge.table.clone());
                let mut next = path.clone();
                next.push(edge.clone());
                queue.push_back((edge.table.clone(), next, depth + 1));
            }
        }
    }

    paths
}
