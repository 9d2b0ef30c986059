//! Error types for the export library.

use thiserror::Error;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A table reference contains more than one schema qualifier separator.
    #[error("Invalid table identifier '{identifier}': at most one '.' separator is allowed")]
    InvalidIdentifier { identifier: String },

    /// Catalog resolution returned zero columns for a table.
    #[error(
        "No columns found for table {table} - check the spelling and casing of the \
         table name and that the connected user has SELECT privileges on it"
    )]
    NoColumnsFound { table: String },

    /// Source database connection or query error (ODBC).
    #[error("Source database error: {0}")]
    Source(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExportError {
    /// Create a Source error from any displayable driver failure.
    pub fn source(message: impl std::fmt::Display) -> Self {
        ExportError::Source(message.to_string())
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Map the error to a process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Config(_) | ExportError::Yaml(_) => 1,
            ExportError::InvalidIdentifier { .. } => 2,
            ExportError::NoColumnsFound { .. } => 3,
            ExportError::Source(_) => 4,
            ExportError::Io(_) => 7,
        }
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_message_names_identifier() {
        let err = ExportError::InvalidIdentifier {
            identifier: "A.B.C".to_string(),
        };
        assert!(err.to_string().contains("A.B.C"));
    }

    #[test]
    fn test_no_columns_message_states_likely_cause() {
        let err = ExportError::NoColumnsFound {
            table: "HR.MISSING".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("HR.MISSING"));
        assert!(msg.contains("casing"));
        assert!(msg.contains("privileges"));
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            ExportError::Config("x".into()),
            ExportError::InvalidIdentifier {
                identifier: "a.b.c".into(),
            },
            ExportError::NoColumnsFound { table: "t".into() },
            ExportError::Source("down".into()),
            ExportError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        ];
        let codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|c| *c != 0));
        let mut dedup = codes.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), codes.len());
    }
}
