use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Thresholds used by the assessment core.
///
/// These numbers are part of the product contract; changing them changes
/// which sentences unlock and which words land in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum per-word accuracy for the sentence gate (strict less-than fails)
    pub gate_threshold: f64,
    /// Accuracy at or above this renders as "good"
    pub good_threshold: f64,
    /// Accuracy at or above this (and below good) renders as "fair"
    pub fair_threshold: f64,
    /// Words below this accuracy are collected as session word issues
    pub issue_threshold: f64,
    /// Maximum number of word issues shown in the session report
    pub max_word_issues: usize,
    /// Overall score at or above this triggers the celebration animation
    pub celebration_threshold: f64,
    /// When true, recognized non-insertion words left over after the last
    /// reference word also fail the gate. Off by default; kept as an explicit
    /// switch rather than an always-on rule.
    #[serde(default)]
    pub fail_on_trailing_words: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            gate_threshold: 70.0,
            good_threshold: 80.0,
            fair_threshold: 60.0,
            issue_threshold: 70.0,
            max_word_issues: 15,
            celebration_threshold: 80.0,
            fail_on_trailing_words: false,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Speech
    pub recognizer_engine: String,
    pub recognition_language: String,

    // Assessment
    pub scoring: ScoringConfig,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recognizer_engine: "scripted".to_string(),
            recognition_language: "en-US".to_string(),
            scoring: ScoringConfig::default(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            match serde_json::from_str(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    // Graceful degradation: log warning and use defaults
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    // Backup corrupt file for debugging
                    let backup_path = path.with_extension("json.corrupt");
                    let _ = std::fs::rename(path, &backup_path);
                    Ok(Self::default())
                }
            }
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shadowcoach")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.recognizer_engine, "scripted");
        assert_eq!(config.scoring.gate_threshold, 70.0);
        assert_eq!(config.scoring.good_threshold, 80.0);
        assert_eq!(config.scoring.max_word_issues, 15);
        assert!(!config.scoring.fail_on_trailing_words);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let restored: Config = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config.recognizer_engine, restored.recognizer_engine);
        assert_eq!(
            config.scoring.celebration_threshold,
            restored.scoring.celebration_threshold
        );
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.scoring.gate_threshold = 65.0;
        config.save_to(&path).expect("save");

        let restored = Config::load_from(&path).expect("load");
        assert_eq!(restored.scoring.gate_threshold, 65.0);
    }

    #[test]
    fn test_config_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.scoring.gate_threshold, 70.0);
        // Corrupt file is moved aside, not deleted
        assert!(path.with_extension("json.corrupt").exists());
    }
}
