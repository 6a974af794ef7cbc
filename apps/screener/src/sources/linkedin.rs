//! Professional-network source client (public profile page fetch).
//!
//! Scraping a public profile is inherently fragile: the target controls the
//! markup. When the skills section is missing the client falls back to
//! matching the configured skill lists against the whole page text, and an
//! unrecognizable page simply yields an empty skill set — never an error.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::{EngineConfig, SkillsCriteria};
use crate::models::{Candidate, SourceProfile};
use crate::scoring;
use crate::sources::{
    classify_status, match_skill_lists, FetchError, FetchOutcome, RetryPolicy, SourceClient,
};

/// Desktop browser identity; the target serves a login wall to unknown
/// agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Page content indicating a private or restricted profile behind a 200.
const PRIVATE_MARKERS: &[&str] = &[
    "this profile is not available",
    "this profile is private",
    "you need to be logged in to view this profile",
    "this profile is restricted",
    "sign in to view this profile",
];

pub struct LinkedinClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    skills: SkillsCriteria,
}

impl LinkedinClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.network.request_timeout_secs))
                .user_agent(USER_AGENT)
                .build()
                .expect("reqwest client builds with static options"),
            base_url: config.linkedin.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from(&config.network),
            skills: config.skills.clone(),
        }
    }
}

#[async_trait]
impl SourceClient for LinkedinClient {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn locator(&self, candidate: &Candidate) -> Option<String> {
        (!candidate.linkedin_handle.is_empty()).then(|| candidate.linkedin_handle.clone())
    }

    async fn fetch_profile(&self, handle: &str) -> FetchOutcome {
        let url = format!("{}/{handle}/", self.base_url);
        let body = match self
            .retry
            .run("linkedin profile", || async {
                let response = self
                    .http
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| FetchError::Transient(e.to_string()))?;
                classify_status(response.status())?;
                let body = response
                    .text()
                    .await
                    .map_err(|e| FetchError::Transient(e.to_string()))?;
                if is_private_profile(&body) {
                    return Err(FetchError::Restricted);
                }
                Ok(body)
            })
            .await
        {
            Ok(body) => body,
            Err(e) => {
                warn!(handle, error = %e, "linkedin profile fetch failed");
                return e.into_outcome();
            }
        };

        let skills = extract_profile_skills(&body, &self.skills);
        let skill_score = scoring::skills_score(&skills, &self.skills);
        debug!(handle, skills = skills.len(), "linkedin profile assembled");

        FetchOutcome::Profile(SourceProfile {
            source: "linkedin".to_string(),
            handle: handle.to_string(),
            skills,
            skill_score,
            stats: None,
        })
    }
}

fn is_private_profile(html: &str) -> bool {
    let lower = html.to_lowercase();
    PRIVATE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Skills from the profile's skills-section markup; if the section is
/// absent (markup drift, stripped page), fall back to matching the
/// configured skill lists against the full page text.
fn extract_profile_skills(html: &str, criteria: &SkillsCriteria) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("section#skills-section span.mr1.t-bold")
        .expect("hardcoded selector parses");

    let from_section: BTreeSet<String> = document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect();
    if !from_section.is_empty() {
        return from_section;
    }

    let page_text = document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    match_skill_lists(&page_text, criteria)
}
