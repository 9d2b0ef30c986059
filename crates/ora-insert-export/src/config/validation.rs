//! Configuration validation.

use crate::config::Config;
use crate::error::{ExportError, Result};

/// Validate a parsed configuration before any connection is attempted.
pub fn validate(config: &Config) -> Result<()> {
    if config.source.host.trim().is_empty() {
        return Err(ExportError::Config("source.host must not be empty".into()));
    }
    if config.source.service.trim().is_empty() {
        return Err(ExportError::Config(
            "source.service must not be empty".into(),
        ));
    }
    if config.source.user.trim().is_empty() {
        return Err(ExportError::Config("source.user must not be empty".into()));
    }

    if config.tables.is_empty() {
        return Err(ExportError::Config(
            "at least one table must be configured under 'tables'".into(),
        ));
    }

    for table in &config.tables {
        if table.name.trim().is_empty() {
            return Err(ExportError::Config(
                "table entries must have a non-empty 'name'".into(),
            ));
        }
        if let Some(w) = &table.where_clause {
            if w.trim().is_empty() {
                return Err(ExportError::Config(format!(
                    "table {}: 'where' must be omitted rather than empty",
                    table.name
                )));
            }
        }
        if let Some(o) = &table.order_by {
            if o.trim().is_empty() {
                return Err(ExportError::Config(format!(
                    "table {}: 'order_by' must be omitted rather than empty",
                    table.name
                )));
            }
        }
    }

    Ok(())
}
