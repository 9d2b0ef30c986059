//! Core abstractions shared across the export pipeline.
//!
//! - [`schema`]: table and column metadata types
//! - [`value`]: the semantic value union read from the source cursor
//! - [`identifier`]: identifier quoting and filename sanitization

pub mod identifier;
pub mod schema;
pub mod value;

pub use schema::{ColumnDescriptor, ExportResult, TableSpec};
pub use value::{OraValue, Row};
