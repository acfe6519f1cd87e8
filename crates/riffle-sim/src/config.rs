use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use riffle_core::{ShufflerParams, SplitSpread};

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";
const MAX_DECK_SIZE: usize = u16::MAX as usize;

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    pub shuffler: ShufflerConfig,
    pub trials: TrialConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimulationConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.shuffler.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            history_jsonl: resolve_template(&self.run_id, &self.outputs.history_jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            plots_dir: resolve_template(&self.run_id, &self.outputs.plots_dir),
        }
    }
}

/// Shuffler construction parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ShufflerConfig {
    pub shuffle_accuracy: f64,
    pub split_accuracy: f64,
    #[serde(default = "default_deck_size")]
    pub deck_size: usize,
    #[serde(default)]
    pub split_spread: SplitSpread,
}

impl ShufflerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("shuffler.shuffle_accuracy", self.shuffle_accuracy),
            ("shuffler.split_accuracy", self.split_accuracy),
        ] {
            if !value.is_finite() || value <= 0.0 || value >= 1.0 {
                return Err(ValidationError::InvalidField {
                    field: field.to_string(),
                    message: "accuracy must lie strictly between 0 and 1".to_string(),
                });
            }
        }

        if self.deck_size < 2 || self.deck_size > MAX_DECK_SIZE {
            return Err(ValidationError::InvalidField {
                field: "shuffler.deck_size".to_string(),
                message: format!("deck size must lie in [2, {MAX_DECK_SIZE}]"),
            });
        }

        Ok(())
    }

    pub fn to_params(&self) -> ShufflerParams {
        ShufflerParams {
            shuffle_accuracy: self.shuffle_accuracy,
            split_accuracy: self.split_accuracy,
            deck_size: self.deck_size,
            spread: self.split_spread,
        }
    }
}

fn default_deck_size() -> usize {
    52
}

/// Trial loop configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrialConfig {
    pub seed: Option<u64>,
    /// Number of split-and-shuffle trials; 0 records only the initial deck.
    pub count: usize,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub history_jsonl: String,
    pub summary_md: String,
    pub plots_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.history_jsonl", &self.history_jsonl),
            ("outputs.summary_md", &self.summary_md),
            ("outputs.plots_dir", &self.plots_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub history_jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub plots_dir: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "mixing_demo"
shuffler:
  shuffle_accuracy: 0.5
  split_accuracy: 0.95
trials:
  seed: 42
  count: 5
outputs:
  history_jsonl: "sim/out/{run_id}/history.jsonl"
  summary_md: "sim/out/{run_id}/summary.md"
  plots_dir: "sim/out/{run_id}/plots"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: SimulationConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.shuffler.deck_size, 52);
        assert_eq!(cfg.shuffler.split_spread, SplitSpread::DeckSize);
        assert_eq!(cfg.trials.count, 5);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.history_jsonl,
            PathBuf::from("sim/out/mixing_demo/history.jsonl")
        );
    }

    #[test]
    fn corrected_spread_is_selectable() {
        let yaml = BASIC_YAML.replace(
            "  split_accuracy: 0.95\n",
            "  split_accuracy: 0.95\n  split_spread: \"split_accuracy\"\n",
        );
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.shuffler.split_spread, SplitSpread::SplitAccuracy);
        assert_eq!(cfg.shuffler.to_params().spread, SplitSpread::SplitAccuracy);
    }

    #[test]
    fn rejects_out_of_range_accuracy() {
        let yaml = BASIC_YAML.replace("shuffle_accuracy: 0.5", "shuffle_accuracy: 1.5");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("accuracy out of range");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "shuffler.shuffle_accuracy"
        ));
    }

    #[test]
    fn rejects_degenerate_deck_size() {
        let yaml = BASIC_YAML.replace(
            "  split_accuracy: 0.95\n",
            "  split_accuracy: 0.95\n  deck_size: 1\n",
        );
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("deck too small");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "shuffler.deck_size"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("mixing_demo", "mixing demo");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn zero_trials_are_valid() {
        let yaml = BASIC_YAML.replace("count: 5", "count: 0");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("zero trials validate");
        assert_eq!(cfg.trials.count, 0);
    }

    #[test]
    fn outputs_resolve_template_multiple_occurrences() {
        let yaml = BASIC_YAML.replace(
            "sim/out/{run_id}/plots",
            "sim/out/{run_id}/{run_id}/plots",
        );
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.plots_dir,
            PathBuf::from("sim/out/mixing_demo/mixing_demo/plots")
        );
    }
}
