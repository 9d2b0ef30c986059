//! # ora-insert-export
//!
//! Export Oracle table contents as textual SQL `INSERT` scripts for later
//! replay against another database instance.
//!
//! Tables are declared in a YAML configuration (optionally schema-qualified,
//! with per-table WHERE/ORDER BY fragments); the library connects to the
//! source, resolves each table's column metadata, streams rows forward-only
//! and renders every value as a round-trippable SQL literal:
//!
//! ```text
//! INSERT INTO ORDERS (ID, NAME, CREATED) VALUES
//!     (1, 'O''Brien', TO_DATE('2024-01-15 10:30:00','YYYY-MM-DD HH24:MI:SS'));
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use ora_insert_export::{Config, ExportOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> ora_insert_export::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let orchestrator = ExportOrchestrator::new(config)?;
//!     for result in orchestrator.run(false).await? {
//!         println!("{}: {} rows", result.table_name, result.rows_exported);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod encode;
pub mod error;
pub mod exporter;
pub mod orchestrator;
pub mod source;

// Re-exports for convenient access
pub use config::{Config, ExportConfig, Layout, SourceConfig, TableConfig};
pub use core::{ColumnDescriptor, ExportResult, OraValue, Row, TableSpec};
pub use error::{ExportError, Result};
pub use exporter::TableExporter;
pub use orchestrator::ExportOrchestrator;
pub use source::{OdbcSource, SourceConnection};
