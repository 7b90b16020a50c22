// Line-delimited JSON readers for the product catalog and the listings.
use crate::model::{Listing, ProductRecord, SourceError};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn products(&self) -> Result<Vec<ProductRecord>, SourceError>;
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn listings(&self) -> Result<Vec<Listing>, SourceError>;
}

/// A file with one JSON object per line. Blank lines are skipped.
pub struct JsonLinesFile {
    path: PathBuf,
}

impl JsonLinesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    /// Parses every non-blank line, handing `(line number, value)` to `convert`.
    async fn read_with<T, F>(&self, mut convert: F) -> Result<Vec<T>, SourceError>
    where
        T: Send,
        F: FnMut(usize, Value) -> Result<T, SourceError> + Send,
    {
        let io_err = |source| SourceError::Io {
            path: self.display(),
            source,
        };
        let file = File::open(&self.path).await.map_err(io_err)?;
        let mut lines = BufReader::new(file).lines();

        let mut items = Vec::new();
        let mut line_no = 0;
        while let Some(line) = lines.next_line().await.map_err(io_err)? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(&line).map_err(|source| SourceError::Json {
                path: self.display(),
                line: line_no,
                source,
            })?;
            items.push(convert(line_no, value)?);
        }
        info!("Read {} records from {}", items.len(), self.display());
        Ok(items)
    }
}

#[async_trait]
impl ProductSource for JsonLinesFile {
    async fn products(&self) -> Result<Vec<ProductRecord>, SourceError> {
        self.read_with(|line, value| {
            serde_json::from_value(value).map_err(|source| SourceError::Json {
                path: self.display(),
                line,
                source,
            })
        })
        .await
    }
}

#[async_trait]
impl ListingSource for JsonLinesFile {
    async fn listings(&self) -> Result<Vec<Listing>, SourceError> {
        self.read_with(|line, value| {
            Listing::from_json(value).map_err(|source| SourceError::Listing {
                path: self.display(),
                line,
                source,
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListingError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_products_skipping_blank_lines() {
        let file = file_with(concat!(
            r#"{"product_name":"Sony_DSC-W310","manufacturer":"Sony","model":"DSC-W310","family":"Cyber-shot"}"#,
            "\n\n",
            r#"{"product_name":"Canon_SX130","manufacturer":"Canon","model":"SX130 IS"}"#,
            "\n",
        ));
        let products = JsonLinesFile::new(file.path()).products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].family.as_deref(), Some("Cyber-shot"));
        assert_eq!(products[1].family, None);
    }

    #[tokio::test]
    async fn reports_line_of_malformed_json() {
        let file = file_with("{\"manufacturer\":\"a\",\"title\":\"b\"}\n{oops\n");
        let err = JsonLinesFile::new(file.path()).listings().await.unwrap_err();
        assert!(matches!(err, SourceError::Json { line: 2, .. }));
    }

    #[tokio::test]
    async fn rejects_listing_without_title() {
        let file = file_with("{\"manufacturer\":\"a\"}\n");
        let err = JsonLinesFile::new(file.path()).listings().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Listing {
                line: 1,
                source: ListingError::MissingField("title"),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = JsonLinesFile::new("/nonexistent/products.txt")
            .products()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
