use crate::catalog::CrawlResult;
use crate::output::traits::{ResultSink, SinkResult};
use crate::SinkError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes `{"products": [...]}` to `<directory>/<subcategory-path>.json`
///
/// Paths containing `/` produce nested files; missing directories are
/// created.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    directory: PathBuf,
}

impl JsonFileSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file a subcategory's result is written to
    pub fn file_path(&self, path: &str) -> PathBuf {
        self.directory.join(format!("{}.json", path))
    }
}

#[async_trait]
impl ResultSink for JsonFileSink {
    async fn write(&self, path: &str, result: &CrawlResult) -> SinkResult<()> {
        let file = self.file_path(path);
        let body = serde_json::to_vec(result)?;

        let io_error = |source| SinkError::Io {
            path: file.display().to_string(),
            source,
        };

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&file, body).await.map_err(io_error)?;

        tracing::info!("Wrote {} products to {}", result.len(), file.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductRecord;
    use tempfile::TempDir;

    fn result() -> CrawlResult {
        CrawlResult {
            products: vec![ProductRecord {
                category: "Bebidas".to_string(),
                subcategory: "Refrigerantes".to_string(),
                name: "Refrigerante Pack 6 unidades".to_string(),
                image: "//cdn/x.jpg".to_string(),
                weight: String::new(),
                quantity: "6 unidades".to_string(),
                price: "R$ 19.99".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_write_creates_named_file() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path());

        sink.write("refrigerantes", &result()).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("refrigerantes.json")).unwrap();
        let parsed: CrawlResult = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, result());

        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(raw["products"][0]["subcategoria"], "Refrigerantes");
        assert_eq!(raw["products"][0]["price"], "R$ 19.99");
    }

    #[tokio::test]
    async fn test_write_nested_path() {
        let dir = TempDir::new().unwrap();
        let sink = JsonFileSink::new(dir.path());

        sink.write("bebidas/refrigerantes", &CrawlResult::default())
            .await
            .unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("bebidas").join("refrigerantes.json")).unwrap();
        assert_eq!(content, r#"{"products":[]}"#);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let sink = JsonFileSink::new(&blocker);

        let result = sink.write("bebidas", &result()).await;

        assert!(matches!(result, Err(SinkError::Io { .. })));
    }
}
