//! Per-table export: SELECT construction, forward-only row streaming, and
//! INSERT statement emission.

use std::io::Write;

use tracing::debug;

use crate::core::identifier::{quote_ident, render_table_ref};
use crate::core::{Row, TableSpec};
use crate::encode::encode_literal;
use crate::error::{ExportError, Result};
use crate::source::SourceConnection;

/// Marker comment written at checkpoint boundaries. Operators uncomment
/// these (or replace them with real COMMITs) when replaying the script; the
/// exporter itself never commits the destination.
pub const CHECKPOINT_MARKER: &str = "-- COMMIT;";

/// Exports a single table as INSERT statements into a byte sink.
pub struct TableExporter<'a> {
    conn: &'a dyn SourceConnection,
    quote_identifiers: bool,
    checkpoint_rows: u64,
}

impl<'a> TableExporter<'a> {
    pub fn new(conn: &'a dyn SourceConnection, quote_identifiers: bool, checkpoint_rows: u64) -> Self {
        Self {
            conn,
            quote_identifiers,
            checkpoint_rows,
        }
    }

    /// Resolve the table's columns, in catalog ordinal order.
    ///
    /// Zero columns is a hard failure here: a legitimately empty table still
    /// has columns, so an empty result means the name or visibility is wrong.
    pub async fn resolve_columns(
        &self,
        spec: &TableSpec,
    ) -> Result<Vec<crate::core::ColumnDescriptor>> {
        let columns = self.conn.columns(&spec.schema, &spec.name).await?;
        if columns.is_empty() {
            return Err(ExportError::NoColumnsFound {
                table: spec.full_name(),
            });
        }
        Ok(columns)
    }

    /// Export one table, writing INSERT statements and checkpoint markers to
    /// `sink`. Returns the number of rows written.
    ///
    /// The resolved column order is fixed once and reused for the SELECT
    /// list, the INSERT column list and every row's literal list, so values
    /// can never misalign with columns.
    pub async fn export(&self, spec: &TableSpec, sink: &mut (dyn Write + Send)) -> Result<u64> {
        let columns = self.resolve_columns(spec).await?;

        let col_list = columns
            .iter()
            .map(|c| quote_ident(&c.name, self.quote_identifiers))
            .collect::<Vec<_>>()
            .join(", ");
        let table_ref = render_table_ref(&spec.qualified_name, self.quote_identifiers);

        let select = self.build_select(spec, &col_list, &table_ref);
        debug!("Export query for {}: {}", spec.full_name(), select);

        let insert_prefix = format!("INSERT INTO {} ({}) VALUES (", table_ref, col_list);
        let declared_types: Vec<String> =
            columns.iter().map(|c| c.declared_type.clone()).collect();

        let checkpoint_rows = self.checkpoint_rows;
        let mut rows: u64 = 0;
        {
            let mut on_row = |row: Row| -> Result<()> {
                let literals = row
                    .iter()
                    .zip(columns.iter())
                    .map(|(value, col)| encode_literal(value, &col.declared_type))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(sink, "{}{});", insert_prefix, literals)?;

                rows += 1;
                if checkpoint_rows > 0 && rows % checkpoint_rows == 0 {
                    writeln!(sink, "{}", CHECKPOINT_MARKER)?;
                }
                Ok(())
            };
            self.conn
                .stream_rows(&select, &declared_types, &mut on_row)
                .await?;
        }

        // Final marker after the last row, regardless of interval.
        writeln!(sink, "{}", CHECKPOINT_MARKER)?;

        Ok(rows)
    }

    fn build_select(&self, spec: &TableSpec, col_list: &str, table_ref: &str) -> String {
        let mut select = format!("SELECT {} FROM {}", col_list, table_ref);
        // WHERE and ORDER BY fragments are operator-supplied SQL, appended
        // verbatim; validity is the configuration author's responsibility.
        if let Some(where_clause) = &spec.where_clause {
            select.push_str(" WHERE ");
            select.push_str(where_clause);
        }
        if let Some(order_by) = &spec.order_by_clause {
            select.push_str(" ORDER BY ");
            select.push_str(order_by);
        }
        select
    }
}
