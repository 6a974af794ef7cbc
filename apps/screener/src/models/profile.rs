use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::candidate::ConfidenceLevel;

/// Activity signals from a code-hosting profile, derived from the user,
/// repository, and event payloads. Feeds the reputation score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub public_repos: u32,
    pub followers: u32,
    pub total_stars: u64,
    pub total_forks: u64,
    pub push_events: u32,
    pub pull_requests: u32,
    pub issues: u32,
    pub commits: u32,
    /// push_events + pull_requests + issues.
    pub total_contributions: u32,
    /// Events within the last 30 days.
    pub recent_activity: u32,
}

/// Evidence fetched from one external source for one candidate.
///
/// Owned by the SourceClient that fetched it; shared read-only (and cached
/// for the process lifetime) afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceProfile {
    pub source: String,
    pub handle: String,
    pub skills: BTreeSet<String>,
    pub skill_score: f64,
    /// Present only for the code-hosting source.
    pub stats: Option<ActivityStats>,
}

/// Outcome of fanning a candidate's skill claims out to all sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Source name → evidence, for sources that returned a profile.
    pub evidence: BTreeMap<String, SourceProfile>,
    /// Arithmetic mean of contributing sources' skill scores; 0 if none.
    pub verification_score: f64,
    pub confidence_level: ConfidenceLevel,
}

impl VerificationResult {
    /// The zero-score/LOW-confidence sentinel used when verification yields
    /// no evidence at all.
    pub fn empty() -> Self {
        Self::default()
    }
}
