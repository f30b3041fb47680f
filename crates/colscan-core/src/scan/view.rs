//! Regrouping of flat results into a schema -> table -> column tree

use std::collections::BTreeMap;

use crate::models::{ColumnResult, ColumnView, ScanResultView, SchemaView, TableView};

/// Schema name shown for results stored without one
pub const UNKNOWN_SCHEMA: &str = "unknown";

/// Group results by schema and table, sorted by name at every level
///
/// Input order does not matter; classification completion order under
/// concurrency is not stable, so everything is re-sorted here.
pub fn group_results(results: &[ColumnResult]) -> ScanResultView {
    let mut tree: BTreeMap<&str, BTreeMap<&str, Vec<ColumnView>>> = BTreeMap::new();

    for result in results {
        let schema = match result.schema_name.trim() {
            "" => UNKNOWN_SCHEMA,
            name => name,
        };
        tree.entry(schema)
            .or_default()
            .entry(result.table_name.as_str())
            .or_default()
            .push(ColumnView {
                column_name: result.column_name.clone(),
                info_type: result.info_type.clone(),
            });
    }

    let database = tree
        .into_iter()
        .map(|(schema_name, tables)| SchemaView {
            schema_name: schema_name.to_string(),
            schema_tables: tables
                .into_iter()
                .map(|(table_name, mut columns)| {
                    columns.sort_by(|a, b| a.column_name.cmp(&b.column_name));
                    TableView {
                        table_name: table_name.to_string(),
                        columns,
                    }
                })
                .collect(),
        })
        .collect();

    ScanResultView { database }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(schema: &str, table: &str, column: &str, info_type: &str) -> ColumnResult {
        ColumnResult::new(1, schema, table, column, info_type)
    }

    #[test]
    fn test_groups_tables_under_schema() {
        let view = group_results(&[result("s1", "t1", "c1", "A"), result("s1", "t2", "c2", "B")]);

        assert_eq!(view.database.len(), 1);
        let s1 = view.schema("s1").unwrap();
        assert_eq!(s1.schema_tables.len(), 2);
        assert_eq!(
            s1.table("t1").unwrap().columns,
            vec![ColumnView {
                column_name: "c1".to_string(),
                info_type: "A".to_string()
            }]
        );
        assert_eq!(s1.table("t2").unwrap().columns[0].info_type, "B");
    }

    #[test]
    fn test_output_is_sorted_regardless_of_input_order() {
        let view = group_results(&[
            result("b", "t", "z", "N/A"),
            result("a", "t", "y", "SSN"),
            result("a", "t", "x", "N/A"),
        ]);
        let schemas: Vec<_> = view.database.iter().map(|s| s.schema_name.as_str()).collect();
        assert_eq!(schemas, vec!["a", "b"]);

        let columns: Vec<_> = view.database[0].schema_tables[0]
            .columns
            .iter()
            .map(|c| c.column_name.as_str())
            .collect();
        assert_eq!(columns, vec!["x", "y"]);
    }

    #[test]
    fn test_missing_schema_is_grouped_as_unknown() {
        let view = group_results(&[result("", "legacy", "ssn", "SSN")]);
        assert!(view.schema(UNKNOWN_SCHEMA).is_some());
    }

    #[test]
    fn test_empty_results_give_empty_view() {
        let view = group_results(&[]);
        assert!(view.is_empty());
        assert_eq!(view.column_count(), 0);
    }
}
