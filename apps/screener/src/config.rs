//! Engine configuration: skill criteria, thresholds, and dimension weights.
//!
//! Loaded once from TOML (missing fields fall back to defaults) and shared
//! read-only for the run's duration. `validate` is the gate that turns a
//! malformed config into a run-aborting [`ConfigError`] instead of letting
//! scoring divide by garbage later.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ConfigError;

/// Top-level configuration aggregating all engine criteria.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub document: DocumentLimits,
    pub skills: SkillsCriteria,
    pub experience: ExperienceCriteria,
    pub education: EducationCriteria,
    pub github: GithubCriteria,
    pub linkedin: LinkedinCriteria,
    pub network: NetworkPolicy,
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentLimits {
    pub max_file_size_bytes: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Skill lists driving both resume scoring and per-source verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsCriteria {
    pub required: Vec<String>,
    pub preferred: Vec<String>,
    pub bonus: Vec<String>,
}

impl Default for SkillsCriteria {
    fn default() -> Self {
        Self {
            required: vec![
                "Python".to_string(),
                "JavaScript".to_string(),
                "SQL".to_string(),
            ],
            preferred: vec![
                "React".to_string(),
                "Django".to_string(),
                "AWS".to_string(),
                "Docker".to_string(),
            ],
            bonus: vec![
                "Kubernetes".to_string(),
                "Machine Learning".to_string(),
                "GraphQL".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceCriteria {
    pub minimum_years: u32,
    pub senior_threshold: u32,
}

impl Default for ExperienceCriteria {
    fn default() -> Self {
        Self {
            minimum_years: 2,
            senior_threshold: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationCriteria {
    pub accepted_degrees: Vec<String>,
}

impl Default for EducationCriteria {
    fn default() -> Self {
        Self {
            accepted_degrees: vec![
                "B.Tech".to_string(),
                "M.Tech".to_string(),
                "B.S.".to_string(),
                "M.S.".to_string(),
                "B.E.".to_string(),
                "Bachelor".to_string(),
                "Master".to_string(),
                "PhD".to_string(),
            ],
        }
    }
}

/// Thresholds for the reputation sub-signals. Each sub-signal earns its full
/// cap at/above the target and interpolates linearly below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubCriteria {
    pub api_url: String,
    pub min_repos: u32,
    pub activity_target: u32,
    pub follower_target: u32,
    pub star_target: u64,
}

impl Default for GithubCriteria {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            min_repos: 3,
            activity_target: 50,
            follower_target: 50,
            star_target: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedinCriteria {
    pub base_url: String,
}

impl Default for LinkedinCriteria {
    fn default() -> Self {
        Self {
            base_url: "https://www.linkedin.com/in".to_string(),
        }
    }
}

/// Retry and timeout policy for all networked source clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkPolicy {
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for NetworkPolicy {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_attempts: 3,
            base_delay_ms: 2000,
        }
    }
}

/// Per-dimension weights for the total score.
///
/// The defaults intentionally do not sum to 1.0 (they sum to 1.4, matching
/// the observed production criteria). total_score is therefore not bounded
/// to [0,100] under all weight configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub reputation: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            education: 0.3,
            reputation: 0.4,
        }
    }
}

impl EngineConfig {
    /// Load config from a TOML string, falling back to defaults for missing
    /// fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate config from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Rejects configurations scoring cannot proceed with. Empty skill lists
    /// are legal (the affected term scores zero) but logged, since they
    /// usually indicate a criteria file that was never filled in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (dimension, value) in [
            ("skills", self.weights.skills),
            ("experience", self.weights.experience),
            ("education", self.weights.education),
            ("reputation", self.weights.reputation),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { dimension, value });
            }
        }

        if self.experience.senior_threshold == 0 {
            return Err(ConfigError::InvalidThreshold(
                "experience.senior_threshold must be at least 1".to_string(),
            ));
        }
        if self.experience.minimum_years > self.experience.senior_threshold {
            return Err(ConfigError::InvalidThreshold(format!(
                "experience.minimum_years ({}) exceeds senior_threshold ({})",
                self.experience.minimum_years, self.experience.senior_threshold
            )));
        }
        if self.document.max_file_size_bytes == 0 {
            return Err(ConfigError::InvalidThreshold(
                "document.max_file_size_bytes must be positive".to_string(),
            ));
        }
        if self.network.max_attempts == 0 {
            return Err(ConfigError::InvalidThreshold(
                "network.max_attempts must be at least 1".to_string(),
            ));
        }
        for (name, target) in [
            ("github.min_repos", u64::from(self.github.min_repos)),
            ("github.activity_target", u64::from(self.github.activity_target)),
            ("github.follower_target", u64::from(self.github.follower_target)),
            ("github.star_target", self.github.star_target),
        ] {
            if target == 0 {
                return Err(ConfigError::InvalidThreshold(format!(
                    "{name} must be at least 1"
                )));
            }
        }

        if self.skills.required.is_empty() {
            warn!("no required skills configured; the required term will score zero");
        }
        if self.skills.preferred.is_empty() {
            warn!("no preferred skills configured; the preferred term will score zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_above_one() {
        // Intentional: 0.4 + 0.3 + 0.3 + 0.4 = 1.4.
        let w = ScoringWeights::default();
        let sum = w.skills + w.experience + w.education + w.reputation;
        assert!((sum - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = EngineConfig::default();
        config.weights.education = -0.1;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NegativeWeight {
                dimension: "education",
                ..
            }
        ));
    }

    #[test]
    fn test_minimum_years_above_senior_rejected() {
        let mut config = EngineConfig::default();
        config.experience.minimum_years = 10;
        config.experience.senior_threshold = 8;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_zero_size_ceiling_rejected() {
        let mut config = EngineConfig::default();
        config.document.max_file_size_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_senior_threshold_rejected() {
        let mut config = EngineConfig::default();
        config.experience.minimum_years = 0;
        config.experience.senior_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_overrides() {
        let toml_str = r#"
            [experience]
            minimum_years = 3
            senior_threshold = 10

            [weights]
            skills = 0.5
        "#;
        let config = EngineConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.experience.minimum_years, 3);
        assert_eq!(config.experience.senior_threshold, 10);
        assert!((config.weights.skills - 0.5).abs() < f64::EPSILON);
        // Untouched sections keep their defaults.
        assert!((config.weights.reputation - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.github.min_repos, 3);
    }

    #[test]
    fn test_from_toml_malformed_is_parse_error() {
        let err = EngineConfig::from_toml("weights = \"not a table\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_skill_lists_are_legal() {
        let mut config = EngineConfig::default();
        config.skills.required.clear();
        config.skills.preferred.clear();
        assert!(config.validate().is_ok());
    }
}
