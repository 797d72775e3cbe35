use indexmap::{IndexMap, IndexSet};

use super::selection::SelectionState;
use crate::relationship_graph::{EdgeKind, RelEdge, RelationshipGraph};

/// Sentinel returned when no table is selected. Consumers detect the comment
/// marker; absence of a clause is never used as a signal.
pub const NO_TABLE_SENTINEL: &str = "-- Select at least one table";

/// Sentinel returned when no column is selected.
pub const NO_COLUMN_SENTINEL: &str = "-- Select at least one column";

/// Advisory embedded when multiple tables are selected without join paths.
/// The statement stays executable; only the first table is scanned.
pub const NO_RELATIONSHIP_WARNING: &str =
    "-- WARNING: multiple tables selected but no relationships defined\n\
     -- Use auto-detect to discover relationships";

/// Fixed row cap appended to every statement, guarding against accidental
/// cross products from malformed join sets.
pub const ROW_CAP: usize = 100;

/// Synthesize a SELECT statement from the selection state.
///
/// Column identifiers whose bare name occurs more than once across the
/// selected tables are aliased `table_column`; unique names render bare.
/// Join clauses are emitted once per distinct `(table, from_field, to_field)`
/// triple, skipping edges whose target is already joined.
pub fn generate(graph: &RelationshipGraph, selection: &SelectionState) -> String {
    if selection.tables.is_empty() {
        return NO_TABLE_SENTINEL.to_string();
    }
    if selection.columns.is_empty() {
        return NO_COLUMN_SENTINEL.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("SELECT\n  {}", select_list(selection).join(",\n  ")));

    let first_table = selection.tables[0].as_str();
    lines.push(format!("FROM {first_table}"));

    if selection.tables.len() > 1 {
        if selection.join_paths.is_empty() {
            lines.push(NO_RELATIONSHIP_WARNING.to_string());
        } else {
            lines.extend(join_clauses(graph, selection, first_table));
        }
    }

    lines.push(format!("LIMIT {ROW_CAP};"));
    lines.join("\n")
}

/// Render the column list with `table_column` aliases for duplicate names.
fn select_list(selection: &SelectionState) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for column in &selection.columns {
        *counts.entry(bare_name(column)).or_insert(0) += 1;
    }

    selection
        .columns
        .iter()
        .map(|column| match column.split_once('.') {
            Some((table, bare)) if counts.get(bare).copied().unwrap_or(0) > 1 => {
                format!("{column} AS {table}_{bare}")
            }
            _ => column.clone(),
        })
        .collect()
}

fn bare_name(column: &str) -> &str {
    column
        .split_once('.')
        .map(|(_, bare)| bare)
        .unwrap_or(column)
}

/// Emit JOIN clauses by walking every edge of every chosen path in order.
fn join_clauses(
    graph: &RelationshipGraph,
    selection: &SelectionState,
    first_table: &str,
) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut joined: IndexSet<&str> = IndexSet::new();
    joined.insert(first_table);
    let mut processed: IndexSet<(&str, &str, &str)> = IndexSet::new();

    for path in &selection.join_paths {
        for edge in path {
            let key = (
                edge.table.as_str(),
                edge.from_field.as_str(),
                edge.to_field.as_str(),
            );
            if processed.contains(&key) || joined.contains(edge.table.as_str()) {
                continue;
            }

            // Best-effort source resolution; with multiple candidate source
            // tables the first match in joined order wins, which can pick a
            // semantically wrong (but syntactically valid) join. Documented
            // limitation inherited from the interactive builder.
            let source = resolve_source_table(graph, &joined, edge).unwrap_or(first_table);

            let predicate = match edge.kind {
                EdgeKind::FkOut => format!(
                    "{source}.{} = {}.{}",
                    edge.from_field, edge.table, edge.to_field
                ),
                EdgeKind::FkIn => format!(
                    "{}.{} = {source}.{}",
                    edge.table, edge.to_field, edge.from_field
                ),
            };
            clauses.push(format!("JOIN {} ON {}", edge.table, predicate));

            joined.insert(edge.table.as_str());
            processed.insert(key);
        }
    }

    clauses
}

/// Scan already-joined tables for one with a relationship edge to/from the
/// current edge's table.
fn resolve_source_table<'a>(
    graph: &RelationshipGraph,
    joined: &IndexSet<&'a str>,
    edge: &RelEdge,
) -> Option<&'a str> {
    for &candidate in joined {
        let related = match edge.kind {
            EdgeKind::FkOut => graph.are_related(candidate, &edge.table),
            EdgeKind::FkIn => graph.are_related(&edge.table, candidate),
        };
        if related {
            return Some(candidate);
        }
    }
    None
}
