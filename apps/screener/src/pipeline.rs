//! Batch evaluation pipeline: attachments in, ranked candidates out.
//!
//! Walks each attachment through extraction, base scoring, verification,
//! and reputation scoring. Per-document failures become error-marked
//! records; only a configuration error can abort a run, and that happens
//! at construction time.

use std::cmp::Ordering;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::errors::ConfigError;
use crate::extract::{DocumentExtractor, FieldExtractor};
use crate::models::Candidate;
use crate::scoring;
use crate::sources::SourceClient;
use crate::verify::VerificationAggregator;

/// One incoming resume document, however the transport delivered it.
#[derive(Debug, Clone)]
pub struct ResumeAttachment {
    pub filename: String,
    pub content: Bytes,
}

impl ResumeAttachment {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Everything a report generator needs: ranked candidates (failed documents
/// last) and how many of them failed to parse.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub candidates: Vec<Candidate>,
    pub parse_failures: usize,
}

pub struct Evaluator {
    config: Arc<EngineConfig>,
    documents: DocumentExtractor,
    fields: FieldExtractor,
    verifier: VerificationAggregator,
}

impl Evaluator {
    /// Builds an evaluator over the production source set. Fails only on a
    /// configuration the scoring engine cannot work with.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let verifier = VerificationAggregator::with_default_sources(&config);
        Ok(Self::assemble(config, verifier))
    }

    /// Same as [`Evaluator::new`] with an injected source list.
    pub fn with_sources(
        config: EngineConfig,
        sources: Vec<Arc<dyn SourceClient>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config, VerificationAggregator::new(sources)))
    }

    fn assemble(config: EngineConfig, verifier: VerificationAggregator) -> Self {
        Self {
            documents: DocumentExtractor::new(config.document.max_file_size_bytes),
            fields: FieldExtractor::new(),
            verifier,
            config: Arc::new(config),
        }
    }

    /// Evaluates a batch sequentially and ranks the result by total score,
    /// descending, with failed documents at the tail.
    pub async fn evaluate_batch(&self, attachments: Vec<ResumeAttachment>) -> BatchOutcome {
        let mut candidates = Vec::with_capacity(attachments.len());
        let mut parse_failures = 0;

        for attachment in &attachments {
            let candidate = self.evaluate_one(attachment).await;
            if candidate.is_failed() {
                parse_failures += 1;
            }
            candidates.push(candidate);
        }

        rank(&mut candidates);
        info!(
            total = candidates.len(),
            parse_failures, "batch evaluation complete"
        );
        BatchOutcome {
            candidates,
            parse_failures,
        }
    }

    async fn evaluate_one(&self, attachment: &ResumeAttachment) -> Candidate {
        let text = match self
            .documents
            .extract(&attachment.filename, &attachment.content)
        {
            Ok(text) => text,
            Err(e) => {
                warn!(filename = %attachment.filename, error = %e, "document rejected");
                return Candidate::failed(&attachment.filename, &e);
            }
        };

        let fields = self.fields.extract(&text);
        let mut candidate = Candidate {
            filename: attachment.filename.clone(),
            email: fields.email,
            github_handle: fields.github_handle,
            linkedin_handle: fields.linkedin_handle,
            portfolio_url: fields.portfolio_url,
            skills: fields.skills,
            experience_years: fields.experience_years,
            education: fields.education,
            ..Candidate::default()
        };

        candidate.skills_score = scoring::skills_score(&candidate.skills, &self.config.skills);
        candidate.experience_score =
            scoring::experience_score(candidate.experience_years, &self.config.experience);
        candidate.education_score =
            scoring::education_score(&candidate.education, &self.config.education);

        let verification = self.verifier.verify(&candidate).await;
        candidate.verification_score = verification.verification_score;
        candidate.confidence_level = verification.confidence_level;
        candidate.reputation_score = scoring::reputation_score(
            verification
                .evidence
                .get("github")
                .and_then(|profile| profile.stats.as_ref()),
            &self.config.github,
        );
        candidate.verified_sources = verification.evidence;
        candidate.total_score = scoring::total_score(&candidate, &self.config.weights);

        candidate
    }
}

fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| match (a.is_failed(), b.is_failed()) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => b
            .total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal),
    });
}
