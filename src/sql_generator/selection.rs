use serde::{Deserialize, Serialize};

use crate::relationship_graph::JoinPath;

/// Everything the synthesizer needs: selected tables, selected
/// `table.column` identifiers, and the chosen join paths.
///
/// This is an explicit value passed to and returned from each operation, so
/// concurrent sessions never share mutable state. It is only changed through
/// the mutators below, mirroring the discrete user actions of the query
/// builder UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub tables: Vec<String>,

    /// Selected columns as `table.column` identifiers
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub join_paths: Vec<JoinPath>,
}

impl SelectionState {
    /// Add a table; membership is unique, repeated adds are no-ops.
    pub fn add_table(&mut self, table: impl Into<String>) {
        let table = table.into();
        if !self.tables.contains(&table) {
            self.tables.push(table);
        }
    }

    /// Remove a table along with its columns and any join path touching it.
    pub fn remove_table(&mut self, table: &str) {
        self.tables.retain(|t| t != table);
        let prefix = format!("{table}.");
        self.columns.retain(|c| !c.starts_with(&prefix));
        self.join_paths
            .retain(|path| !path.iter().any(|edge| edge.table == table));
    }

    /// Toggle a `table.column` identifier in or out of the selection.
    pub fn toggle_column(&mut self, column: impl Into<String>) {
        let column = column.into();
        if let Some(pos) = self.columns.iter().position(|c| *c == column) {
            self.columns.remove(pos);
        } else {
            self.columns.push(column);
        }
    }

    /// Replace the chosen join paths (e.g. after auto-detection).
    pub fn set_join_paths(&mut self, paths: Vec<JoinPath>) {
        self.join_paths = paths;
    }

    /// Remove one join path by position; out-of-range indices are ignored.
    pub fn remove_join_path(&mut self, index: usize) {
        if index < self.join_paths.len() {
            self.join_paths.remove(index);
        }
    }

    pub fn clear_join_paths(&mut self) {
        self.join_paths.clear();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
