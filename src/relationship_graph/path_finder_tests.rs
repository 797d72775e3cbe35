use super::graph::{EdgeKind, RelationshipGraph};
use super::path_finder::*;
use crate::schema_catalog::schema_types::Schema;

fn schema(raw: &str) -> Schema {
    serde_json::from_str(raw).unwrap()
}

/// customers <- orders -> products, plus an isolated audit_log table.
fn shop_schema() -> Schema {
    schema(
        r#"{
            "customers": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "name", "type": "text" }
            ] },
            "products": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "label", "type": "text" }
            ] },
            "orders": { "fields": [
                { "name": "id", "type": "int", "pk": true },
                { "name": "customer_id", "type": "int",
                  "fk": { "table": "customers", "field": "id" } },
                { "name": "product_id", "type": "int",
                  "fk": { "table": "products", "field": "id" } }
            ] },
            "audit_log": { "fields": [
                { "name": "id", "type": "int", "pk": true }
            ] }
        }"#,
    )
}

fn owned(tables: &[&str]) -> Vec<String> {
    tables.iter().map(|t| t.to_string()).collect()
}

#[test]
fn identity_path_is_a_single_empty_path() {
    let graph = RelationshipGraph::build(&shop_schema());
    assert_eq!(
        find_all_paths(&graph, "orders", "orders", MAX_PATH_DEPTH),
        vec![Vec::new()]
    );
}

#[test]
fn finds_direct_and_indirect_paths() {
    let graph = RelationshipGraph::build(&shop_schema());

    let direct = find_all_paths(&graph, "orders", "customers", MAX_PATH_DEPTH);
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].len(), 1);
    assert_eq!(direct[0][0].table, "customers");

    // customers -> orders (fk_in), orders -> products (fk_out)
    let indirect = find_all_paths(&graph, "customers", "products", MAX_PATH_DEPTH);
    assert_eq!(indirect.len(), 1);
    assert_eq!(indirect[0].len(), 2);
    assert_eq!(indirect[0][0].table, "orders");
    assert_eq!(indirect[0][1].table, "products");
}

#[test]
fn parallel_routes_are_all_enumerated() {
    // customers and products are linked through two distinct junction tables.
    // Cycle avoidance is per path, not global, so both routes must come back
    // and the shared endpoint appears in each of them.
    let graph = RelationshipGraph::build(&schema(
        r#"{
            "customers": { "fields": [ { "name": "id", "type": "int", "pk": true } ] },
            "products": { "fields": [ { "name": "id", "type": "int", "pk": true } ] },
            "orders": { "fields": [
                { "name": "customer_id", "type": "int",
                  "fk": { "table": "customers", "field": "id" } },
                { "name": "product_id", "type": "int",
                  "fk": { "table": "products", "field": "id" } }
            ] },
            "reviews": { "fields": [
                { "name": "customer_id", "type": "int",
                  "fk": { "table": "customers", "field": "id" } },
                { "name": "product_id", "type": "int",
                  "fk": { "table": "products", "field": "id" } }
            ] }
        }"#,
    ));

    let paths = find_all_paths(&graph, "customers", "products", MAX_PATH_DEPTH);
    assert_eq!(paths.len(), 2);

    let intermediates: Vec<&str> = paths.iter().map(|p| p[0].table.as_str()).collect();
    assert!(intermediates.contains(&"orders"));
    assert!(intermediates.contains(&"reviews"));
    for path in &paths {
        assert_eq!(path.len(), 2);
        assert_eq!(path[1].table, "products");
    }
}

#[test]
fn depth_bound_is_respected() {
    let graph = RelationshipGraph::build(&shop_schema());

    // customers -> products needs two edges; a bound of 1 must find nothing.
    assert!(find_all_paths(&graph, "customers", "products", 1).is_empty());

    for max_depth in 1..=MAX_PATH_DEPTH {
        for path in find_all_paths(&graph, "customers", "products", max_depth) {
            assert!(path.len() <= max_depth);
        }
    }
}

#[test]
fn no_path_is_an_empty_list_not_an_error() {
    let graph = RelationshipGraph::build(&shop_schema());
    assert!(find_all_paths(&graph, "orders", "audit_log", MAX_PATH_DEPTH).is_empty());
    assert!(find_all_paths(&graph, "orders", "not_in_schema", MAX_PATH_DEPTH).is_empty());
}

#[test]
fn connected_tables_lists_reachable_neighbors_only() {
    let schema = shop_schema();
    let graph = RelationshipGraph::build(&schema);

    let connected = connected_tables(&graph, &schema, "orders", OPTIMAL_SEARCH_DEPTH);
    assert!(connected.contains_key("customers"));
    assert!(connected.contains_key("products"));
    assert!(!connected.contains_key("audit_log"));
    assert!(!connected.contains_key("orders"));
}

#[test]
fn optimal_paths_for_the_two_table_scenario() {
    let graph = RelationshipGraph::build(&shop_schema());

    let paths = find_optimal_join_paths(&graph, &owned(&["orders", "customers"]));
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 1);

    let edge = &paths[0][0];
    assert_eq!(edge.table, "customers");
    assert_eq!(edge.kind, EdgeKind::FkOut);
    assert_eq!(edge.from_field, "customer_id");
    assert_eq!(edge.to_field, "id");
}

#[test]
fn optimal_paths_need_at_least_two_tables() {
    let graph = RelationshipGraph::build(&shop_schema());
    assert!(find_optimal_join_paths(&graph, &owned(&["orders"])).is_empty());
    assert!(find_optimal_join_paths(&graph, &[]).is_empty());
}

#[test]
fn unselected_intermediate_bridges_the_gap() {
    // customers and products are only connected through orders, which is not
    // part of the selection. The primary pass cannot reach products (it only
    // walks through selected tables), so the fallback must bridge via orders.
    let graph = RelationshipGraph::build(&shop_schema());

    let paths = find_optimal_join_paths(&graph, &owned(&["customers", "products"]));
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].len(), 2);
    assert_eq!(paths[0][0].table, "orders");
    assert_eq!(paths[0][1].table, "products");
}

#[test]
fn unconnectable_tables_are_silently_dropped() {
    let graph = RelationshipGraph::build(&shop_schema());
    assert!(find_optimal_join_paths(&graph, &owned(&["orders", "audit_log"])).is_empty());
}

#[test]
fn intermediate_search_respects_its_depth_bound() {
    let graph = RelationshipGraph::build(&shop_schema());

    // customers -> products is two hops; a bound of 1 allows no intermediate.
    assert!(find_path_through_intermediate(&graph, "customers", "products", 1).is_empty());
    let paths = find_path_through_intermediate(&graph, "customers", "products", 2);
    assert_eq!(paths.len(), 1);
}
