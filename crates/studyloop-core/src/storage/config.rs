//! TOML-based application configuration.
//!
//! Stores tuning for the study engines:
//! - Learn mode ease/interval parameters and explanation delay
//! - Match mode heart budget, streak celebration period and mistake delay
//!
//! The elapsed-time clock of the timed modes always ticks once per second and
//! is not configurable.
//!
//! Configuration is stored at `~/.config/studyloop/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Learn (spaced repetition) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnConfig {
    #[serde(default = "default_initial_ease")]
    pub initial_ease: f64,
    #[serde(default = "default_initial_interval_days")]
    pub initial_interval_days: f64,
    /// Added to the ease factor on a correct answer.
    #[serde(default = "default_ease_bonus")]
    pub ease_bonus: f64,
    /// Subtracted from the ease factor on an incorrect answer.
    #[serde(default = "default_ease_penalty")]
    pub ease_penalty: f64,
    #[serde(default = "default_explanation_delay_ms")]
    pub explanation_delay_ms: u64,
}

/// Match game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_hearts")]
    pub hearts: u32,
    /// A streak that is a multiple of this triggers a celebration.
    #[serde(default = "default_celebration_every")]
    pub celebration_every: u32,
    /// How long a wrong pair stays highlighted.
    #[serde(default = "default_mistake_delay_ms")]
    pub mistake_delay_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyloop/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub learn: LearnConfig,
    #[serde(default)]
    pub matching: MatchConfig,
}

// Default functions
fn default_initial_ease() -> f64 {
    2.5
}
fn default_initial_interval_days() -> f64 {
    1.0
}
fn default_ease_bonus() -> f64 {
    0.1
}
fn default_ease_penalty() -> f64 {
    0.2
}
fn default_explanation_delay_ms() -> u64 {
    500
}
fn default_hearts() -> u32 {
    3
}
fn default_celebration_every() -> u32 {
    3
}
fn default_mistake_delay_ms() -> u64 {
    1000
}

impl Default for LearnConfig {
    fn default() -> Self {
        Self {
            initial_ease: default_initial_ease(),
            initial_interval_days: default_initial_interval_days(),
            ease_bonus: default_ease_bonus(),
            ease_penalty: default_ease_penalty(),
            explanation_delay_ms: default_explanation_delay_ms(),
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hearts: default_hearts(),
            celebration_every: default_celebration_every(),
            mistake_delay_ms: default_mistake_delay_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Returns error if the key is
    /// unknown or the value does not fit the field.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.learn.initial_ease, 2.5);
        assert_eq!(cfg.learn.initial_interval_days, 1.0);
        assert_eq!(cfg.learn.explanation_delay_ms, 500);
        assert_eq!(cfg.matching.hearts, 3);
        assert_eq!(cfg.matching.celebration_every, 3);
        assert_eq!(cfg.matching.mistake_delay_ms, 1000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[matching]\nhearts = 5\n").unwrap();
        assert_eq!(cfg.matching.hearts, 5);
        assert_eq!(cfg.matching.celebration_every, 3);
        assert_eq!(cfg.learn, LearnConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("matching.hearts").as_deref(), Some("3"));
        assert_eq!(cfg.get("learn.initial_ease").as_deref(), Some("2.5"));
        assert!(cfg.get("learn.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_integer_and_float() {
        let mut cfg = Config::default();
        cfg.apply("matching.hearts", "5").unwrap();
        cfg.apply("learn.ease_bonus", "0.15").unwrap();
        assert_eq!(cfg.matching.hearts, 5);
        assert_eq!(cfg.learn.ease_bonus, 0.15);
    }

    #[test]
    fn apply_accepts_integer_for_float_field() {
        let mut cfg = Config::default();
        cfg.apply("learn.initial_ease", "3").unwrap();
        assert_eq!(cfg.learn.initial_ease, 3.0);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("learn.nonexistent", "1").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn apply_rejects_invalid_number() {
        let mut cfg = Config::default();
        assert!(cfg.apply("matching.hearts", "lots").is_err());
        assert_eq!(cfg.matching.hearts, 3);
    }

    #[test]
    fn apply_rejects_float_for_integer_field() {
        let mut cfg = Config::default();
        assert!(cfg.apply("matching.hearts", "2.5").is_err());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_and_load_preserve_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("matching.mistake_delay_ms", "250").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().matching.mistake_delay_ms, 250);
    }

    #[test]
    fn old_flashcards_section_is_ignored() {
        let cfg: Config = toml::from_str("[flashcards]\ntick_secs = 5\n").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.get("flashcards.tick_secs").is_none());
    }

    #[test]
    fn load_from_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "learn = [not toml").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
