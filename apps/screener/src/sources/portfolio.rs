//! Portfolio source client (arbitrary personal-site fetch).
//!
//! The weakest evidence source: any reachable page counts, and skills are
//! whatever configured skill names appear in its visible text.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, warn};

use crate::config::{EngineConfig, SkillsCriteria};
use crate::models::{Candidate, SourceProfile};
use crate::scoring;
use crate::sources::{
    classify_status, match_skill_lists, FetchError, FetchOutcome, RetryPolicy, SourceClient,
};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct PortfolioClient {
    http: reqwest::Client,
    retry: RetryPolicy,
    skills: SkillsCriteria,
}

impl PortfolioClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.network.request_timeout_secs))
                .user_agent(USER_AGENT)
                .build()
                .expect("reqwest client builds with static options"),
            retry: RetryPolicy::from(&config.network),
            skills: config.skills.clone(),
        }
    }
}

#[async_trait]
impl SourceClient for PortfolioClient {
    fn name(&self) -> &'static str {
        "portfolio"
    }

    fn locator(&self, candidate: &Candidate) -> Option<String> {
        (!candidate.portfolio_url.is_empty()).then(|| candidate.portfolio_url.clone())
    }

    async fn fetch_profile(&self, locator: &str) -> FetchOutcome {
        let url = normalize_url(locator);
        let body = match self
            .retry
            .run("portfolio page", || async {
                let response = self
                    .http
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| FetchError::Transient(e.to_string()))?;
                classify_status(response.status())?;
                response
                    .text()
                    .await
                    .map_err(|e| FetchError::Transient(e.to_string()))
            })
            .await
        {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "portfolio page fetch failed");
                return e.into_outcome();
            }
        };

        let skills = extract_page_skills(&body, &self.skills);
        let skill_score = scoring::skills_score(&skills, &self.skills);
        debug!(url, skills = skills.len(), "portfolio page assembled");

        FetchOutcome::Profile(SourceProfile {
            source: "portfolio".to_string(),
            handle: locator.to_string(),
            skills,
            skill_score,
            stats: None,
        })
    }
}

/// Resume text yields bare domains; give them a scheme before fetching.
fn normalize_url(locator: &str) -> String {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        locator.to_string()
    } else {
        format!("https://{locator}")
    }
}

fn extract_page_skills(html: &str, criteria: &SkillsCriteria) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let text = document
        .root_element()
        .text()
        .collect::<String>()
        .to_lowercase();
    match_skill_lists(&text, criteria)
}
