//! Configuration management for the resume extractor

use crate::error::{Result, ResumeExtractorError};
use crate::processing::reference::ReferenceData;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub max_skills: usize,
    pub max_education_entries: usize,
    /// Non-empty lines inspected by the strict name scan
    pub name_header_lines: usize,
    /// Lines inspected by the relaxed name scan
    pub name_relaxed_lines: usize,
    pub entity_window_chars: usize,
    pub title_context_radius: usize,
    pub max_title_chars: usize,
    pub min_text_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// TOML file replacing the built-in reference tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_skills: 30,
            max_education_entries: 5,
            name_header_lines: 5,
            name_relaxed_lines: 10,
            entity_window_chars: 1500,
            title_context_radius: 2,
            max_title_chars: 80,
            min_text_chars: 50,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults there on first use
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeExtractorError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeExtractorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-extractor")
            .join("config.toml")
    }

    /// Reference tables from the configured file, or the built-in defaults
    pub fn reference_data(&self) -> Result<ReferenceData> {
        match &self.reference.path {
            Some(path) => ReferenceData::load(path),
            None => Ok(ReferenceData::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extraction.max_skills, 30);
        assert_eq!(config.extraction.max_education_entries, 5);
        assert_eq!(config.extraction.min_text_chars, 50);
        assert_eq!(config.output.format, OutputFormat::Console);
        assert!(config.reference.path.is_none());
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extraction]\nmax_skills = 10\n\n[output]\nformat = \"Json\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.extraction.max_skills, 10);
        assert_eq!(config.extraction.max_education_entries, 5);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color_output);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extraction\nmax_skills = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ResumeExtractorError::Configuration(_))));
    }

    #[test]
    fn test_reference_path_is_honoured() {
        let dir = TempDir::new().unwrap();
        let reference_path = dir.path().join("reference.toml");
        std::fs::write(&reference_path, "job_titles = [\"wrangler\"]\n").unwrap();

        let mut config = Config::default();
        config.reference.path = Some(reference_path);

        let reference = config.reference_data().unwrap();
        assert_eq!(reference.job_titles, vec!["wrangler"]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.output.format = OutputFormat::Markdown;
        config.extraction.title_context_radius = 3;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
