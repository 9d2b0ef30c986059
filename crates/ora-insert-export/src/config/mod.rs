//! Configuration loading and validation.
//!
//! Settings merge in precedence order: YAML file, then environment
//! (`ORA_EXPORT_PASSWORD`), then CLI flag overrides applied by the binary.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

/// Environment variable overriding the configured source password.
pub const PASSWORD_ENV_VAR: &str = "ORA_EXPORT_PASSWORD";

impl Config {
    /// Load configuration from a YAML file and apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var(PASSWORD_ENV_VAR) {
            if !password.is_empty() {
                self.source.password = password;
            }
        }
    }
}

/// A commented sample configuration, written by the CLI's `init` command.
pub const SAMPLE_CONFIG: &str = r#"# ora-insert-export configuration
source:
  host: db.example.com
  port: 1521
  service: ORCLPDB1
  user: exporter
  # Prefer the ORA_EXPORT_PASSWORD environment variable over storing the
  # password here.
  password: change-me
  # driver: Oracle ODBC Driver

# Tables are exported in the order listed. Unqualified names resolve against
# the session's current schema. 'where' and 'order_by' are appended to the
# generated SELECT verbatim.
tables:
  - name: HR.EMPLOYEES
    where: "HIRE_DATE >= DATE '2024-01-01'"
    order_by: EMPLOYEE_ID
  - name: ORDERS

export:
  output_dir: ./export
  # separate: one file per table; combined: a single file with one section
  # per table.
  layout: separate
  quote_identifiers: false
  # Rows between checkpoint markers; 0 writes only the final marker.
  checkpoint_rows: 1000
"#;
