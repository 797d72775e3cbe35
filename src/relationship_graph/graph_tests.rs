use super::graph::{EdgeKind, RelationshipGraph};
use crate::schema_catalog::schema_types::Schema;

fn schema(raw: &str) -> Schema {
    serde_json::from_str(raw).unwrap()
}

fn orders_customers() -> Schema {
    schema(
        r#"{
            "customers": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "name", "type": "text" }
            ] },
            "orders": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "customer_id", "type": "int",
                  "fk": { "table": "customers", "field": "id" } },
                { "name": "total", "type": "float" }
            ] }
        }"#,
    )
}

#[test]
fn builds_both_edge_directions() {
    let graph = RelationshipGraph::build(&orders_customers());

    let out: Vec<_> = graph.neighbors("orders").collect();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].table, "customers");
    assert_eq!(out[0].kind, EdgeKind::FkOut);
    assert_eq!(out[0].from_field, "customer_id");
    assert_eq!(out[0].to_field, "id");

    let inv: Vec<_> = graph.neighbors("customers").collect();
    assert_eq!(inv.len(), 1);
    assert_eq!(inv[0].table, "orders");
    assert_eq!(inv[0].kind, EdgeKind::FkIn);
    assert_eq!(inv[0].from_field, "id");
    assert_eq!(inv[0].to_field, "customer_id");
}

#[test]
fn every_fk_out_edge_has_a_matching_fk_in_edge() {
    let schema = schema(
        r#"{
            "users": { "fields": [ { "name": "id", "type": "int", "pk": true } ] },
            "posts": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "author_id", "type": "int",
                  "fk": { "table": "users", "field": "id" } }
            ] },
            "comments": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "post_id", "type": "int",
                  "fk": { "table": "posts", "field": "id" } },
                { "name": "user_id", "type": "int",
                  "fk": { "table": "users", "field": "id" } }
            ] }
        }"#,
    );
    let graph = RelationshipGraph::build(&schema);

    for table in schema.keys() {
        for edge in graph.neighbors(table) {
            if edge.kind == EdgeKind::FkOut {
                let mirrored = graph.neighbors(&edge.table).any(|inv| {
                    inv.kind == EdgeKind::FkIn
                        && inv.table == *table
                        && inv.from_field == edge.to_field
                        && inv.to_field == edge.from_field
                });
                assert!(mirrored, "no fk_in mirror for {table} -> {}", edge.table);
            }
        }
    }
}

#[test]
fn tables_without_foreign_keys_still_get_an_entry() {
    let schema = schema(r#"{ "standalone": { "fields": [ { "name": "id", "type": "int" } ] } }"#);
    let graph = RelationshipGraph::build(&schema);

    assert!(graph.contains("standalone"));
    assert_eq!(graph.neighbors("standalone").count(), 0);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn dangling_foreign_key_is_tolerated() {
    // "ghost" is referenced but never declared; callers must see an adjacency
    // set under it and nothing must fail at build time.
    let schema = schema(
        r#"{ "orders": { "fields": [
            { "name": "ghost_id", "type": "int",
              "fk": { "table": "ghost", "field": "id" } }
        ] } }"#,
    );
    let graph = RelationshipGraph::build(&schema);

    assert!(graph.contains("ghost"));
    assert!(graph.are_related("ghost", "orders"));
    assert_eq!(graph.neighbors("never_mentioned").count(), 0);
}

#[test]
fn lookup_miss_is_an_empty_adjacency() {
    let graph = RelationshipGraph::build(&orders_customers());
    assert_eq!(graph.neighbors("unknown").count(), 0);
    assert!(!graph.contains("unknown"));
}
