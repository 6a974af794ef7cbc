use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::DocumentError;
use crate::models::profile::SourceProfile;

/// How many independent sources corroborated the candidate's claimed skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// 0 or 1 contributing sources → LOW, exactly 2 → MEDIUM, 3+ → HIGH.
    pub fn from_source_count(count: usize) -> Self {
        match count {
            0 | 1 => ConfidenceLevel::Low,
            2 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::High,
        }
    }
}

/// One candidate record, progressively enriched by the pipeline.
///
/// Created from extracted fields, then scored, then verified. If `error` is
/// set the record carries only `{filename, error}` semantics: all scores stay
/// at their zero defaults and the candidate is excluded from ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub filename: String,
    pub email: String,
    pub github_handle: String,
    pub linkedin_handle: String,
    pub portfolio_url: String,
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub education: String,

    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub reputation_score: f64,
    pub verification_score: f64,
    pub total_score: f64,
    pub confidence_level: ConfidenceLevel,

    /// Per-source evidence collected during verification, keyed by source
    /// name. Consumed by the report collaborator.
    pub verified_sources: BTreeMap<String, SourceProfile>,

    pub error: Option<String>,
}

impl Candidate {
    /// Record for a document that failed validation or extraction.
    pub fn failed(filename: impl Into<String>, error: &DocumentError) -> Self {
        Self {
            filename: filename.into(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_from_source_count() {
        assert_eq!(ConfidenceLevel::from_source_count(0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_source_count(1), ConfidenceLevel::Low);
        assert_eq!(
            ConfidenceLevel::from_source_count(2),
            ConfidenceLevel::Medium
        );
        assert_eq!(ConfidenceLevel::from_source_count(3), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_source_count(7), ConfidenceLevel::High);
    }

    #[test]
    fn test_confidence_serializes_uppercase() {
        let json = serde_json::to_string(&ConfidenceLevel::Medium).unwrap();
        assert_eq!(json, r#""MEDIUM""#);
    }

    #[test]
    fn test_failed_candidate_carries_only_filename_and_error() {
        let err = DocumentError::Empty;
        let candidate = Candidate::failed("resume.pdf", &err);
        assert!(candidate.is_failed());
        assert_eq!(candidate.filename, "resume.pdf");
        assert_eq!(candidate.total_score, 0.0);
        assert!(candidate.skills.is_empty());
        assert_eq!(candidate.confidence_level, ConfidenceLevel::Low);
    }
}
