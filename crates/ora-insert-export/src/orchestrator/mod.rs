//! Export orchestrator - main workflow coordinator.
//!
//! Iterates the configured tables strictly sequentially over one shared
//! source connection, opens the destination file(s) according to the layout
//! and delegates each table to the [`TableExporter`]. Any failure aborts the
//! run immediately; files already written for earlier tables are retained.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::{Config, Layout};
use crate::core::identifier::file_stem;
use crate::core::{ExportResult, TableSpec};
use crate::error::Result;
use crate::exporter::TableExporter;
use crate::source::{OdbcSource, SourceConnection};

/// Export orchestrator.
pub struct ExportOrchestrator {
    config: Config,
    source: Arc<dyn SourceConnection>,
}

impl ExportOrchestrator {
    /// Open the source connection and build an orchestrator.
    pub fn new(config: Config) -> Result<Self> {
        let source = OdbcSource::connect(&config.source)?;
        Ok(Self {
            config,
            source: Arc::new(source),
        })
    }

    /// Build an orchestrator over an already-opened source connection.
    pub fn with_source(config: Config, source: Arc<dyn SourceConnection>) -> Self {
        Self { config, source }
    }

    /// Check source connectivity and report the session schema.
    pub async fn health_check(&self) -> Result<String> {
        self.source.ping().await?;
        let schema = self.source.current_schema().await?;
        info!("Source connection healthy, session schema {}", schema);
        Ok(schema)
    }

    /// Run the export.
    ///
    /// With `dry_run` set, resolves metadata and logs the plan but creates
    /// no files.
    pub async fn run(&self, dry_run: bool) -> Result<Vec<ExportResult>> {
        let started_at = Utc::now();
        let stamp = started_at.format("%Y%m%d_%H%M%S").to_string();

        let default_schema = self.source.current_schema().await?;
        info!("Session schema: {}", default_schema);
        info!("Exporting {} table(s)", self.config.tables.len());

        let exporter = TableExporter::new(
            self.source.as_ref(),
            self.config.export.quote_identifiers,
            self.config.export.checkpoint_rows,
        );

        if dry_run {
            return self.plan(&exporter, &default_schema).await;
        }

        std::fs::create_dir_all(&self.config.export.output_dir)?;

        let mut results = Vec::new();
        match self.config.export.layout {
            Layout::Separate => {
                for table in &self.config.tables {
                    let spec = TableSpec::resolve(
                        &table.name,
                        &default_schema,
                        table.where_clause.clone(),
                        table.order_by.clone(),
                    )?;
                    let path = self.script_path(&spec, &stamp);
                    let mut writer = BufWriter::new(File::create(&path)?);
                    write_banner(&mut writer, &spec, &started_at)?;

                    let rows = exporter.export(&spec, &mut writer).await?;
                    writer.flush()?;

                    info!(
                        "Exported {} rows from {} to {}",
                        rows,
                        spec.full_name(),
                        path.display()
                    );
                    results.push(ExportResult {
                        table_name: spec.full_name(),
                        rows_exported: rows,
                    });
                }
            }
            Layout::Combined => {
                let path = self
                    .config
                    .export
                    .output_dir
                    .join(format!("export_{}.sql", stamp));
                let mut writer = BufWriter::new(File::create(&path)?);

                for table in &self.config.tables {
                    let spec = TableSpec::resolve(
                        &table.name,
                        &default_schema,
                        table.where_clause.clone(),
                        table.order_by.clone(),
                    )?;
                    write_banner(&mut writer, &spec, &started_at)?;

                    let rows = exporter.export(&spec, &mut writer).await?;
                    writer.flush()?;

                    info!("Exported {} rows from {}", rows, spec.full_name());
                    results.push(ExportResult {
                        table_name: spec.full_name(),
                        rows_exported: rows,
                    });
                }

                info!("Combined script written to {}", path.display());
            }
        }

        let total_rows: u64 = results.iter().map(|r| r.rows_exported).sum();
        info!(
            "Export completed: {} table(s), {} row(s) total",
            results.len(),
            total_rows
        );

        Ok(results)
    }

    /// Dry-run plan: resolve every table's columns, write nothing.
    async fn plan(
        &self,
        exporter: &TableExporter<'_>,
        default_schema: &str,
    ) -> Result<Vec<ExportResult>> {
        let mut results = Vec::new();
        for table in &self.config.tables {
            let spec = TableSpec::resolve(
                &table.name,
                default_schema,
                table.where_clause.clone(),
                table.order_by.clone(),
            )?;
            let columns = exporter.resolve_columns(&spec).await?;
            info!(
                "Would export {} ({} columns)",
                spec.full_name(),
                columns.len()
            );
            results.push(ExportResult {
                table_name: spec.full_name(),
                rows_exported: 0,
            });
        }
        info!("Dry run completed, no files written");
        Ok(results)
    }

    fn script_path(&self, spec: &TableSpec, stamp: &str) -> PathBuf {
        self.config.export.output_dir.join(format!(
            "{}_{}.sql",
            file_stem(&spec.schema, &spec.name),
            stamp
        ))
    }
}

/// Header comment naming the table and the generation time. Written at the
/// top of each file (separate layout) or section (combined layout).
fn write_banner(
    sink: &mut (dyn Write + Send),
    spec: &TableSpec,
    generated_at: &DateTime<Utc>,
) -> Result<()> {
    writeln!(sink, "-- ------------------------------------------------------------")?;
    writeln!(sink, "-- Table {}", spec.full_name())?;
    writeln!(
        sink,
        "-- Generated at {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(sink, "-- ------------------------------------------------------------")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_names_table_and_time() {
        let spec = TableSpec::resolve("HR.EMPLOYEES", "HR", None, None).unwrap();
        let generated_at = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let mut sink = Vec::new();
        write_banner(&mut sink, &spec, &generated_at).unwrap();

        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("-- Table HR.EMPLOYEES"));
        assert!(text.contains("-- Generated at 2024-01-15 10:30:00 UTC"));
        assert!(text.lines().all(|l| l.starts_with("--")));
    }
}
