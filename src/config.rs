//! YAML Configuration File Support for foodscan
//!
//! Loads the tokenizer, analysis and knowledge base settings from a single
//! YAML file. Every section is optional; missing fields take the defaults
//! shown below.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # foodscan configuration
//! version: "1.0"
//!
//! canonical:
//!   version: 1
//!   lowercase: true
//!   normalize_unicode: false
//!   separators: [",", "(", ")", ";"]
//!
//! analysis:
//!   empty_input_status: not_found   # or: safe
//!   timeline: true
//!   flare_mode: false
//!   impact:
//!     immune_categories: [Cereal, Legume, Nut, Seed, Egg, Seafood, Other]
//!
//! knowledge:
//!   dataset_path: null              # null = embedded seed dataset
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use canonical::{DEFAULT_SEPARATORS, TokenizerConfig};
use knowledge::{InMemoryKnowledgeBase, KnowledgeError};
use matcher::Matcher;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::{AnalysisConfig, AnalysisError, Analyzer, EmptyInputStatus};
use crate::impact::ImpactConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FoodscanConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Tokenizer configuration
    #[serde(default)]
    pub canonical: CanonicalYamlConfig,

    /// Analysis orchestrator configuration
    #[serde(default)]
    pub analysis: AnalysisYamlConfig,

    /// Knowledge base source
    #[serde(default)]
    pub knowledge: KnowledgeYamlConfig,
}

impl FoodscanConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        info!(path = %path.display(), version = %config.version, "config.load");
        Ok(config)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: FoodscanConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.canonical.validate()?;
        self.knowledge.validate()?;

        Ok(())
    }

    /// Load the configured knowledge base and wire an analyzer around it.
    pub fn build_analyzer(&self) -> Result<Analyzer<InMemoryKnowledgeBase>, AnalysisError> {
        let knowledge = self.knowledge.load()?;
        let matcher = Matcher::new(knowledge).with_tokenizer(self.canonical.to_tokenizer_config())?;
        Ok(Analyzer::with_matcher(
            matcher,
            self.analysis.to_analysis_config(),
        ))
    }
}

impl Default for FoodscanConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            canonical: CanonicalYamlConfig::default(),
            analysis: AnalysisYamlConfig::default(),
            knowledge: KnowledgeYamlConfig::default(),
        }
    }
}

/// Tokenizer YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub lowercase: bool,

    #[serde(default)]
    pub normalize_unicode: bool,

    /// Single-character separator strings.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

impl CanonicalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "canonical.version must be >= 1".to_string(),
            ));
        }
        if self.separators.is_empty() {
            return Err(ConfigLoadError::Validation(
                "canonical.separators must not be empty".to_string(),
            ));
        }
        for sep in &self.separators {
            let mut chars = sep.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if !ch.is_whitespace() => {}
                _ => {
                    return Err(ConfigLoadError::Validation(format!(
                        "canonical.separators entry {sep:?} must be a single non-whitespace character"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn to_tokenizer_config(&self) -> TokenizerConfig {
        TokenizerConfig {
            version: self.version,
            separators: self.separators.iter().filter_map(|s| s.chars().next()).collect(),
            lowercase: self.lowercase,
            normalize_unicode: self.normalize_unicode,
        }
    }
}

impl Default for CanonicalYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            lowercase: true,
            normalize_unicode: false,
            separators: default_separators(),
        }
    }
}

/// Analysis YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisYamlConfig {
    #[serde(default)]
    pub empty_input_status: EmptyInputStatus,

    #[serde(default = "true_value")]
    pub timeline: bool,

    /// Default flare mode for callers that do not pass one explicitly.
    #[serde(default)]
    pub flare_mode: bool,

    #[serde(default)]
    pub impact: ImpactConfig,
}

impl AnalysisYamlConfig {
    pub fn to_analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            empty_input_status: self.empty_input_status,
            timeline: self.timeline,
            impact: self.impact.clone(),
        }
    }
}

impl Default for AnalysisYamlConfig {
    fn default() -> Self {
        Self {
            empty_input_status: EmptyInputStatus::NotFound,
            timeline: true,
            flare_mode: false,
            impact: ImpactConfig::default(),
        }
    }
}

/// Knowledge base YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeYamlConfig {
    /// JSON dataset file; the embedded seed tables when unset.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
}

impl KnowledgeYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(path) = &self.dataset_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigLoadError::Validation(
                    "knowledge.dataset_path must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn load(&self) -> Result<InMemoryKnowledgeBase, KnowledgeError> {
        match &self.dataset_path {
            Some(path) => InMemoryKnowledgeBase::from_path(path),
            None => InMemoryKnowledgeBase::seed(),
        }
    }
}

// Helper functions for serde defaults
fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "strict profile"
canonical:
  version: 1
  normalize_unicode: true
analysis:
  empty_input_status: safe
  flare_mode: true
"#;

        let config = FoodscanConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("strict profile".to_string()));
        assert!(config.canonical.normalize_unicode);
        assert!(config.canonical.lowercase);
        assert_eq!(config.analysis.empty_input_status, EmptyInputStatus::Safe);
        assert!(config.analysis.flare_mode);
        assert!(config.analysis.timeline);
        assert!(config.knowledge.dataset_path.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
canonical:
  separators: [",", "/"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = FoodscanConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.canonical.to_tokenizer_config().separators, vec![',', '/']);
    }

    #[test]
    fn test_default_config() {
        let config = FoodscanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.canonical.to_tokenizer_config(),
            TokenizerConfig::default()
        );
        assert_eq!(config.analysis.to_analysis_config(), AnalysisConfig::default());
    }

    #[test]
    fn test_unsupported_version() {
        let result = FoodscanConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_separator_validation() {
        let yaml = r#"
version: "1.0"
canonical:
  separators: [",", "::"]
"#;
        let err = FoodscanConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("separators"));

        let yaml = "version: \"1.0\"\ncanonical:\n  separators: [\" \"]\n";
        assert!(matches!(
            FoodscanConfig::from_yaml(yaml),
            Err(ConfigLoadError::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_empty_input_status_rejected() {
        let yaml = "version: \"1.0\"\nanalysis:\n  empty_input_status: maybe\n";
        assert!(matches!(
            FoodscanConfig::from_yaml(yaml),
            Err(ConfigLoadError::YamlParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = FoodscanConfig::from_file("/nonexistent/foodscan.yaml");
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_build_analyzer_from_seed() {
        let analyzer = FoodscanConfig::default().build_analyzer().unwrap();
        assert_eq!(analyzer.config(), &AnalysisConfig::default());
        assert_eq!(analyzer.matcher().tokenizer(), &TokenizerConfig::default());
    }

    #[test]
    fn test_build_analyzer_missing_dataset() {
        let config = FoodscanConfig {
            knowledge: KnowledgeYamlConfig {
                dataset_path: Some(PathBuf::from("/nonexistent/dataset.json")),
            },
            ..FoodscanConfig::default()
        };
        assert!(matches!(
            config.build_analyzer(),
            Err(AnalysisError::Knowledge(KnowledgeError::Io(_)))
        ));
    }
}
