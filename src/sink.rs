// Writers for the aggregated matches and the debug report.
use crate::aggregator::ResultSet;
use crate::matcher::MatchReport;
use crate::model::SinkError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn write_results(&self, results: &ResultSet) -> Result<(), SinkError>;
}

#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    async fn write_report(&self, report: &MatchReport) -> Result<(), SinkError>;
}

/// Writes one `{"product_name", "listings"}` object per line.
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Writes the whole report as a single pretty-printed JSON document.
pub struct JsonReportFile {
    path: PathBuf,
}

impl JsonReportFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

async fn write_file(path: &Path, content: String) -> Result<(), SinkError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| SinkError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[async_trait]
impl ResultSink for JsonLinesSink {
    async fn write_results(&self, results: &ResultSet) -> Result<(), SinkError> {
        let mut out = String::new();
        for entry in results.iter() {
            out.push_str(&serde_json::to_string(&entry)?);
            out.push('\n');
        }
        write_file(&self.path, out).await?;
        info!("Wrote {} products to {}", results.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl DiagnosticsSink for JsonReportFile {
    async fn write_report(&self, report: &MatchReport) -> Result<(), SinkError> {
        let document = serde_json::to_string_pretty(&report.to_document())?;
        write_file(&self.path, document).await?;
        info!("Wrote debug report to {}", self.path.display());
        Ok(())
    }
}
