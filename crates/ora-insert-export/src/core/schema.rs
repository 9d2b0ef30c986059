//! Table and column metadata types.

use crate::error::{ExportError, Result};

/// One exportable table, as declared in configuration and resolved against
/// the session's default schema.
///
/// Constructed once per table at the start of its export and immutable
/// thereafter. `schema` and `name` are upper-cased: the catalog is
/// case-sensitive internally but conventionally stores unqualified
/// identifiers upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// The table reference exactly as configured (`NAME` or `SCHEMA.NAME`).
    /// INSERT and SELECT statements reference the table in this form.
    pub qualified_name: String,

    /// Resolved owning schema, upper-cased.
    pub schema: String,

    /// Resolved table name, upper-cased.
    pub name: String,

    /// Optional WHERE fragment, appended to the SELECT verbatim.
    pub where_clause: Option<String>,

    /// Optional ORDER BY fragment, appended to the SELECT verbatim.
    pub order_by_clause: Option<String>,
}

impl TableSpec {
    /// Resolve a configured table reference against the default schema.
    ///
    /// Two segments are an explicit `(schema, table)` pair; one segment
    /// falls back to the default schema. More than one `.` separator is
    /// rejected with [`ExportError::InvalidIdentifier`].
    pub fn resolve(
        qualified_name: &str,
        default_schema: &str,
        where_clause: Option<String>,
        order_by_clause: Option<String>,
    ) -> Result<Self> {
        let segments: Vec<&str> = qualified_name.split('.').collect();
        let (schema, name) = match segments.as_slice() {
            [name] => (default_schema.to_uppercase(), name.to_uppercase()),
            [schema, name] => (schema.to_uppercase(), name.to_uppercase()),
            _ => {
                return Err(ExportError::InvalidIdentifier {
                    identifier: qualified_name.to_string(),
                })
            }
        };

        Ok(Self {
            qualified_name: qualified_name.to_string(),
            schema,
            name,
            where_clause,
            order_by_clause,
        })
    }

    /// Get the fully qualified resolved name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Column metadata, in catalog ordinal order.
///
/// The resolved column list is fixed once per table and reused unmodified
/// for every row: the SELECT list and the INSERT column list must use
/// identical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Declared type as reported by the catalog (e.g. "NUMBER", "VARCHAR2",
    /// "DATE", "TIMESTAMP(6)").
    pub declared_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// Per-table outcome of an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Resolved `SCHEMA.NAME` of the exported table.
    pub table_name: String,

    /// Number of INSERT statements written.
    pub rows_exported: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unqualified_uses_default_schema() {
        let spec = TableSpec::resolve("orders", "hr", None, None).unwrap();
        assert_eq!(spec.schema, "HR");
        assert_eq!(spec.name, "ORDERS");
        assert_eq!(spec.qualified_name, "orders");
        assert_eq!(spec.full_name(), "HR.ORDERS");
    }

    #[test]
    fn test_resolve_qualified_overrides_default_schema() {
        let spec = TableSpec::resolve("SCHEMA2.PRODUCTS", "HR", None, None).unwrap();
        assert_eq!(spec.schema, "SCHEMA2");
        assert_eq!(spec.name, "PRODUCTS");
    }

    #[test]
    fn test_resolve_rejects_two_separators() {
        let err = TableSpec::resolve("A.B.C", "HR", None, None).unwrap_err();
        match err {
            ExportError::InvalidIdentifier { identifier } => assert_eq!(identifier, "A.B.C"),
            other => panic!("expected InvalidIdentifier, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_keeps_filter_fragments() {
        let spec = TableSpec::resolve(
            "ORDERS",
            "HR",
            Some("STATUS = 'OPEN'".to_string()),
            Some("ID".to_string()),
        )
        .unwrap();
        assert_eq!(spec.where_clause.as_deref(), Some("STATUS = 'OPEN'"));
        assert_eq!(spec.order_by_clause.as_deref(), Some("ID"));
    }
}
