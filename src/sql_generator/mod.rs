//! SQL synthesis from a selection state.
//!
//! Synthesis is a pure function of the current selection plus the relationship
//! graph; it is recomputed on every preview request and never cached. Degraded
//! inputs (no tables, no columns, no join paths) produce sentinel or advisory
//! comment strings, never errors.

pub mod join_synthesizer;
pub mod selection;


pub use join_synthesizer::{
    generate, NO_COLUMN_SENTINEL, NO_RELATIONSHIP_WARNING, NO_TABLE_SENTINEL, ROW_CAP,
};
pub use selection::SelectionState;
