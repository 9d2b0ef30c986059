//! Configuration type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source database connection settings.
    pub source: SourceConfig,

    /// Tables to export, in output order.
    pub tables: Vec<TableConfig>,

    /// Output layout and formatting settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Source database (Oracle) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database host.
    pub host: String,

    /// Listener port (default: 1521).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Service name.
    pub service: String,

    /// Username.
    pub user: String,

    /// Password. Overridable via the ORA_EXPORT_PASSWORD environment
    /// variable; never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// ODBC driver name as registered with the driver manager.
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl SourceConfig {
    /// Build an ODBC connection string (EZConnect addressing).
    pub fn connection_string(&self) -> String {
        format!(
            "Driver={{{}}};DBQ=//{}:{}/{};UID={};PWD={};",
            self.driver, self.host, self.port, self.service, self.user, self.password
        )
    }
}

/// One table to export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table reference, `NAME` or `SCHEMA.NAME`.
    pub name: String,

    /// Optional row filter, appended to the SELECT verbatim (trusted
    /// operator-authored SQL, not sanitized).
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    /// Optional ordering, appended to the SELECT verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

/// Output layout and formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving script and log files (created if missing).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// One file per table, or one combined file.
    #[serde(default)]
    pub layout: Layout,

    /// Double-quote every table and column identifier in the output.
    #[serde(default)]
    pub quote_identifiers: bool,

    /// Rows between checkpoint markers; 0 disables intermediate markers.
    #[serde(default = "default_checkpoint_rows")]
    pub checkpoint_rows: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            layout: Layout::default(),
            quote_identifiers: false,
            checkpoint_rows: default_checkpoint_rows(),
        }
    }
}

/// Output file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// One `<SCHEMA>_<TABLE>_<timestamp>.sql` file per table.
    #[default]
    Separate,

    /// A single banner-delimited `export_<timestamp>.sql` file.
    Combined,
}

// Default value functions for serde
fn default_port() -> u16 {
    1521
}

fn default_driver() -> String {
    "Oracle ODBC Driver".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("export")
}

fn default_checkpoint_rows() -> u64 {
    1000
}
