//! Multi-source skill verification.
//!
//! Fans a candidate's claims out to every configured source, pulls each
//! lookup through the process-lifetime cache, and folds the evidence into
//! one verification score plus a discrete confidence level. The boundary is
//! total: every source failure is already a classified [`FetchOutcome`]
//! variant, so verification cannot propagate an error — the worst case is
//! the zero-score/LOW result.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::models::{Candidate, ConfidenceLevel, VerificationResult};
use crate::scoring::round2;
use crate::sources::{
    FetchOutcome, GithubClient, LinkedinClient, LookupCache, PortfolioClient, SourceClient,
};

pub struct VerificationAggregator {
    sources: Vec<Arc<dyn SourceClient>>,
    cache: LookupCache<FetchOutcome>,
}

impl VerificationAggregator {
    pub fn new(sources: Vec<Arc<dyn SourceClient>>) -> Self {
        Self {
            sources,
            cache: LookupCache::new(),
        }
    }

    /// The production source set: code-hosting API, professional-network
    /// page, portfolio page.
    pub fn with_default_sources(config: &EngineConfig) -> Self {
        Self::new(vec![
            Arc::new(GithubClient::new(config)),
            Arc::new(LinkedinClient::new(config)),
            Arc::new(PortfolioClient::new(config)),
        ])
    }

    /// Queries every source the candidate carries an identifier for.
    /// Sources without a usable identifier are skipped outright; sources
    /// that fail contribute nothing. The verification score is the mean of
    /// contributing sources' skill scores.
    pub async fn verify(&self, candidate: &Candidate) -> VerificationResult {
        let mut evidence = BTreeMap::new();
        let mut score_sum = 0.0;

        for source in &self.sources {
            let Some(locator) = source.locator(candidate) else {
                debug!(source = source.name(), "candidate carries no identifier; skipping");
                continue;
            };

            let key = format!("{}:{}", source.name(), locator);
            let outcome = self
                .cache
                .get_or_fetch(&key, || source.fetch_profile(&locator))
                .await;

            match outcome {
                FetchOutcome::Profile(profile) => {
                    score_sum += profile.skill_score;
                    evidence.insert(source.name().to_string(), profile);
                }
                other => {
                    debug!(source = source.name(), outcome = ?other, "no evidence from source");
                }
            }
        }

        let contributing = evidence.len();
        VerificationResult {
            verification_score: if contributing > 0 {
                round2(score_sum / contributing as f64)
            } else {
                0.0
            },
            confidence_level: ConfidenceLevel::from_source_count(contributing),
            evidence,
        }
    }
}
