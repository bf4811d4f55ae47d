//! Configuration management for athar-cv

use crate::error::{AtharError, Result};
use crate::processing::keyword_matcher::{KeywordCategory, KeywordTaxonomy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every table and key is optional; missing ones take their defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub taxonomy: TaxonomyConfig,
    pub scoring: ScoringConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

/// Extra keywords merged into the built-in humanitarian taxonomy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub organizations: Vec<String>,
    pub action_verbs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Delegate the ATS criterion of the strength score to the ATS engine
    pub include_ats: bool,
    pub detailed_analysis: bool,
}

/// External generator command; generation flows fall back to templates without one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
    pub timeout_secs: u64,
    pub default_sector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            include_ats: true,
            detailed_analysis: true,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: 60,
            default_sector: "general".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl TaxonomyConfig {
    /// Built-in taxonomy with the configured keywords appended
    pub fn build_taxonomy(&self) -> KeywordTaxonomy {
        KeywordTaxonomy::humanitarian()
            .with_additional(KeywordCategory::Technical, &self.technical)
            .with_additional(KeywordCategory::Soft, &self.soft)
            .with_additional(KeywordCategory::Organizations, &self.organizations)
            .with_additional(KeywordCategory::ActionVerbs, &self.action_verbs)
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, writing defaults there if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtharError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtharError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overwrite the file at `path` with the defaults
    pub fn reset(path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("athar-cv")
            .join("config.toml")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AtharError::Configuration(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_with_extra_keywords() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.taxonomy.technical.push("Kobo Toolbox".to_string());
        config.generation.command = Some("ollama".to_string());
        config.output.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let taxonomy = loaded.taxonomy.build_taxonomy();
        assert!(taxonomy
            .keywords(KeywordCategory::Technical)
            .contains(&"Kobo Toolbox".to_string()));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"Json\"\n\n[scoring]\ninclude_ats = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color_output);
        assert!(!config.scoring.include_ats);
        assert!(config.scoring.detailed_analysis);
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.taxonomy, TaxonomyConfig::default());

        std::fs::write(&path, "").unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AtharError::Configuration(_)));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.scoring.include_ats = false;
        config.save_to(&path).unwrap();

        let reset = Config::reset(&path).unwrap();
        assert_eq!(reset, Config::default());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
