//! ODBC-based Oracle source.
//!
//! Uses the platform ODBC driver manager with an Oracle driver (Instant
//! Client ODBC or the full client). Values are fetched as text buffers and
//! converted by declared column type; this keeps the wire handling uniform
//! across driver versions and matches how the generated literals are
//! rendered.

use odbc_api::{buffers::TextRowSet, ConnectionOptions, Cursor, IntoParameter, ResultSetMetadata};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::core::ColumnDescriptor;
use crate::error::{ExportError, Result};
use crate::source::{convert_text_value, RowSink, SourceConnection};

/// Rows fetched per buffer round-trip when streaming table data.
const FETCH_BATCH_ROWS: usize = 5000;

/// Upper bound on a single text value in bytes; larger values are truncated
/// by the driver buffer.
const MAX_VALUE_BYTES: usize = 65536;

/// Oracle source over ODBC.
///
/// One connection, opened at construction and reused sequentially for every
/// metadata and row query; the mutex serializes access because ODBC handles
/// are not thread-safe.
pub struct OdbcSource {
    conn: Mutex<odbc_api::Connection<'static>>,
}

impl OdbcSource {
    /// Open the single source connection described by `config`.
    pub fn connect(config: &SourceConfig) -> Result<Self> {
        let env = odbc_api::environment().map_err(|e| {
            ExportError::source(format!(
                "Failed to initialize ODBC environment: {}. \
                 Make sure an ODBC driver manager and the Oracle ODBC driver are installed.",
                e
            ))
        })?;

        let connection_string = config.connection_string();
        debug!(
            "ODBC connection string (credentials hidden): Driver={{{}}};DBQ=//{}:{}/{};...",
            config.driver, config.host, config.port, config.service
        );

        let conn = env
            .connect_with_connection_string(&connection_string, ConnectionOptions::default())
            .map_err(|e| {
                ExportError::source(format!(
                    "Failed to connect to Oracle via ODBC: {}. \
                     Check host, port, service name and credentials.",
                    e
                ))
            })?;

        info!(
            "Connected to Oracle via ODBC: {}:{}/{}",
            config.host, config.port, config.service
        );

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a query and collect every value as optional text.
    fn fetch_text(
        conn: &odbc_api::Connection<'static>,
        sql: &str,
        params: impl odbc_api::ParameterCollectionRef,
    ) -> Result<Vec<Vec<Option<String>>>> {
        let mut rows = Vec::new();

        if let Some(mut cursor) = conn
            .execute(sql, params)
            .map_err(|e| ExportError::source(format!("ODBC query failed: {} - SQL: {}", e, sql)))?
        {
            let num_cols = cursor
                .num_result_cols()
                .map_err(|e| ExportError::source(format!("Failed to get column count: {}", e)))?
                as usize;

            let mut buffers =
                TextRowSet::for_cursor(1000, &mut cursor, Some(4096)).map_err(|e| {
                    ExportError::source(format!("Failed to create row buffer: {}", e))
                })?;

            let mut row_cursor = cursor
                .bind_buffer(&mut buffers)
                .map_err(|e| ExportError::source(format!("Failed to bind buffer: {}", e)))?;

            while let Some(batch) = row_cursor
                .fetch()
                .map_err(|e| ExportError::source(format!("Failed to fetch rows: {}", e)))?
            {
                for row_idx in 0..batch.num_rows() {
                    let row = (0..num_cols)
                        .map(|col_idx| {
                            batch
                                .at(col_idx, row_idx)
                                .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                        })
                        .collect();
                    rows.push(row);
                }
            }
        }

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl SourceConnection for OdbcSource {
    async fn current_schema(&self) -> Result<String> {
        let conn = self.conn.lock().await;
        let rows = Self::fetch_text(
            &conn,
            "SELECT SYS_CONTEXT('USERENV','CURRENT_SCHEMA') FROM DUAL",
            (),
        )?;

        rows.first()
            .and_then(|r| r.first())
            .and_then(|v| v.clone())
            .ok_or_else(|| ExportError::source("Could not resolve the session's current schema"))
    }

    async fn columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let conn = self.conn.lock().await;

        let sql = "SELECT COLUMN_NAME, DATA_TYPE \
                   FROM ALL_TAB_COLUMNS \
                   WHERE OWNER = ? AND TABLE_NAME = ? \
                   ORDER BY COLUMN_ID";

        let rows = Self::fetch_text(
            &conn,
            sql,
            (&schema.into_parameter(), &table.into_parameter()),
        )?;

        let columns: Vec<ColumnDescriptor> = rows
            .into_iter()
            .map(|row| {
                ColumnDescriptor::new(
                    row.first().and_then(|v| v.clone()).unwrap_or_default(),
                    row.get(1).and_then(|v| v.clone()).unwrap_or_default(),
                )
            })
            .collect();

        debug!("Resolved {} columns for {}.{}", columns.len(), schema, table);
        Ok(columns)
    }

    async fn stream_rows(
        &self,
        sql: &str,
        declared_types: &[String],
        on_row: RowSink<'_>,
    ) -> Result<()> {
        let conn = self.conn.lock().await;

        if let Some(mut cursor) = conn
            .execute(sql, ())
            .map_err(|e| ExportError::source(format!("ODBC query failed: {} - SQL: {}", e, sql)))?
        {
            let num_cols = cursor
                .num_result_cols()
                .map_err(|e| ExportError::source(format!("Failed to get column count: {}", e)))?
                as usize;

            let mut buffers =
                TextRowSet::for_cursor(FETCH_BATCH_ROWS, &mut cursor, Some(MAX_VALUE_BYTES))
                    .map_err(|e| {
                        ExportError::source(format!("Failed to create row buffer: {}", e))
                    })?;

            let mut row_cursor = cursor
                .bind_buffer(&mut buffers)
                .map_err(|e| ExportError::source(format!("Failed to bind buffer: {}", e)))?;

            while let Some(batch) = row_cursor
                .fetch()
                .map_err(|e| ExportError::source(format!("Failed to fetch rows: {}", e)))?
            {
                for row_idx in 0..batch.num_rows() {
                    let row = (0..num_cols)
                        .map(|col_idx| {
                            let declared = declared_types
                                .get(col_idx)
                                .map(|s| s.as_str())
                                .unwrap_or("VARCHAR2");
                            let text = batch
                                .at(col_idx, row_idx)
                                .map(|bytes| String::from_utf8_lossy(bytes).to_string());
                            convert_text_value(text, declared)
                        })
                        .collect();
                    on_row(row)?;
                }
            }
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        Self::fetch_text(&conn, "SELECT 1 FROM DUAL", ()).map(|_| ())
    }
}
