//! External source access layer.
//!
//! Each public source implements [`SourceClient`]; the aggregator iterates a
//! configured list of them rather than branching per source. Failure
//! classification is shared: terminal outcomes (not-found, restricted) never
//! retry, transient ones go through [`RetryPolicy`], and nothing escapes the
//! `fetch_profile` boundary as an error.

pub mod cache;
pub mod github;
pub mod linkedin;
pub mod portfolio;
pub mod retry;

pub use cache::LookupCache;
pub use github::GithubClient;
pub use linkedin::LinkedinClient;
pub use portfolio::PortfolioClient;
pub use retry::RetryPolicy;

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::SkillsCriteria;
use crate::models::{Candidate, SourceProfile};

/// Result of one source lookup. Every variant is a legitimate, cacheable
/// answer; callers never see a raw transport error.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Profile(SourceProfile),
    NotFound,
    Restricted,
    TransientFailure,
}

impl FetchOutcome {
    pub fn profile(&self) -> Option<&SourceProfile> {
        match self {
            FetchOutcome::Profile(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Internal failure classification driving retry decisions.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("resource not found")]
    NotFound,

    #[error("access restricted")]
    Restricted,

    #[error("transient failure: {0}")]
    Transient(String),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }

    pub fn into_outcome(self) -> FetchOutcome {
        match self {
            FetchError::NotFound => FetchOutcome::NotFound,
            FetchError::Restricted => FetchOutcome::Restricted,
            FetchError::Transient(_) => FetchOutcome::TransientFailure,
        }
    }
}

/// Maps an HTTP status onto the failure taxonomy: 404 and 403 are terminal,
/// any other non-success is worth retrying.
pub(crate) fn classify_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(FetchError::NotFound)
    } else if status == StatusCode::FORBIDDEN {
        Err(FetchError::Restricted)
    } else {
        Err(FetchError::Transient(format!("unexpected status {status}")))
    }
}

/// Case-insensitive substring match of configured skill lists against source
/// payload text — the same technique field extraction uses against the
/// reference vocabulary.
pub(crate) fn match_skill_lists(text_lower: &str, criteria: &SkillsCriteria) -> BTreeSet<String> {
    criteria
        .required
        .iter()
        .chain(criteria.preferred.iter())
        .chain(criteria.bonus.iter())
        .filter(|skill| text_lower.contains(&skill.to_lowercase()))
        .cloned()
        .collect()
}

/// Capability interface for one external source of skill evidence.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Stable source name, used as the evidence map key and cache prefix.
    fn name(&self) -> &'static str;

    /// The identifier this source can look up for the candidate, if the
    /// candidate carries one. `None` means skip the source entirely.
    fn locator(&self, candidate: &Candidate) -> Option<String>;

    /// Fetches and normalizes the profile behind `locator`. Infallible by
    /// construction: failures come back as non-`Profile` outcomes.
    async fn fetch_profile(&self, locator: &str) -> FetchOutcome;
}
