//! Input manager for handling different file types

use crate::error::{AtharError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::strength_scorer::CvInput;
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Text content of a CV or job description file
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(AtharError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Text | FileType::Json => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(AtharError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Loads a CV for scoring. JSON files become structured input, everything
    /// else is read as text.
    pub async fn load_cv(&mut self, path: &Path) -> Result<CvInput> {
        let content = self.extract_text(path).await?;

        if FileType::from_path(path) == FileType::Json {
            let value: serde_json::Value = serde_json::from_str(&content)?;
            return Ok(CvInput::Structured(value));
        }

        Ok(CvInput::Text(content))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extract_text_caches_by_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Project Officer").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Project Officer");

        std::fs::write(&path, "changed").unwrap();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Project Officer");
        assert_eq!(manager.cache_size(), 1);

        manager.clear_cache();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_unsupported_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("cv.pdf");
        std::fs::write(&pdf, "%PDF-1.4").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        let err = manager.extract_text(&pdf).await.unwrap_err();
        assert!(matches!(err, AtharError::UnsupportedFormat(_)));

        let err = manager.extract_text(&dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, AtharError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_load_cv_json_is_structured() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cv.json");
        std::fs::write(&path, r#"{"name": "Rana", "skills": ["M&E"]}"#).unwrap();

        let mut manager = InputManager::new();
        let cv = manager.load_cv(&path).await.unwrap();
        assert!(matches!(cv, CvInput::Structured(_)));

        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let err = manager.load_cv(&dir.path().join("bad.json")).await.unwrap_err();
        assert!(matches!(err, AtharError::Serialization(_)));
    }
}
