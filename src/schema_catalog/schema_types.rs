use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The schema document: table name to table descriptor, in document order.
pub type Schema = IndexMap<String, TableDef>;

/// A table descriptor: an ordered sequence of field descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub fields: Vec<FieldDef>,
}

/// A single column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Primary-key flag
    #[serde(default)]
    pub pk: bool,

    /// Single-column foreign-key reference, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk: Option<ForeignKey>,
}

/// The closed set of column types the query builder understands.
///
/// Keeping this a tagged enum (rather than a free-form string) lets every
/// consumer match exhaustively; an unknown type in the schema document is a
/// parse error, not a silent text fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[serde(alias = "int")]
    Integer,
    Float,
    Date,
    Boolean,
    #[serde(alias = "string")]
    Text,
}

/// A foreign-key reference to a primary-key field in another table.
///
/// The target table is expected to exist in the schema document, but this is
/// an external data contract and is not enforced at load time: a dangling
/// reference simply produces a graph edge to a table with no adjacency set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub field: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schema_document() {
        let raw = r#"{
            "customers": {
                "fields": [
                    { "name": "id", "type": "int", "pk": true },
                    { "name": "name", "type": "text" }
                ]
            },
            "orders": {
                "fields": [
                    { "name": "id", "type": "integer", "pk": true },
                    { "name": "customer_id", "type": "int",
                      "fk": { "table": "customers", "field": "id" } },
                    { "name": "total", "type": "float" }
                ]
            }
        }"#;

        let schema: Schema = serde_json::from_str(raw).unwrap();
        assert_eq!(schema.len(), 2);
        // document order is preserved
        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            vec!["customers", "orders"]
        );

        let orders = &schema["orders"];
        let customer_id = &orders.fields[1];
        assert_eq!(customer_id.name, "customer_id");
        assert_eq!(customer_id.field_type, FieldType::Integer);
        assert_eq!(
            customer_id.fk,
            Some(ForeignKey {
                table: "customers".to_string(),
                field: "id".to_string(),
            })
        );
        assert!(orders.fields[0].pk);
        assert!(orders.fields[2].fk.is_none());
    }

    #[test]
    fn unknown_field_type_is_a_parse_error() {
        let raw = r#"{ "t": { "fields": [ { "name": "x", "type": "uuid" } ] } }"#;
        assert!(serde_json::from_str::<Schema>(raw).is_err());
    }
}
