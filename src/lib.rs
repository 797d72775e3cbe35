//! Relquery - schema-driven SQL query builder and execution service
//!
//! This crate provides interactive query building over MySQL and PostgreSQL through:
//! - A schema catalog loaded from a JSON schema document
//! - A bidirectional relationship graph derived from foreign keys
//! - Join path discovery between arbitrary sets of tables
//! - SQL SELECT synthesis with deduplicated column aliasing
//! - A generic SQL execution endpoint with audit logging

pub mod config;
pub mod db;
pub mod relationship_graph;
pub mod schema_catalog;
pub mod server;
pub mod sql_generator;
