//! Code-hosting source client (GitHub REST API).
//!
//! One profile fetch is three dependent requests: the user record, the
//! repository list, and the recent event stream. The user request decides
//! the outcome; repository and event failures degrade to empty payloads so
//! a flaky secondary endpoint cannot sink an otherwise-good profile.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{EngineConfig, SkillsCriteria};
use crate::models::{ActivityStats, Candidate, SourceProfile};
use crate::scoring;
use crate::sources::{
    classify_status, match_skill_lists, FetchError, FetchOutcome, RetryPolicy, SourceClient,
};

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
struct UserPayload {
    #[serde(default)]
    public_repos: u32,
    #[serde(default)]
    followers: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct RepoPayload {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct EventPayload {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    payload: EventDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EventDetail {
    #[serde(default)]
    commits: Vec<serde_json::Value>,
}

pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
    retry: RetryPolicy,
    skills: SkillsCriteria,
}

impl GithubClient {
    /// Reads an optional `GITHUB_TOKEN` from the environment (`.env`
    /// honored); unauthenticated requests work but rate-limit quickly.
    pub fn new(config: &EngineConfig) -> Self {
        dotenvy::dotenv().ok();
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.network.request_timeout_secs))
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("reqwest client builds with static options"),
            api_url: config.github.api_url.trim_end_matches('/').to_string(),
            token: std::env::var("GITHUB_TOKEN").ok(),
            retry: RetryPolicy::from(&config.network),
            skills: config.skills.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let mut request = self.http.get(url).header("Accept", ACCEPT_HEADER);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;
        classify_status(response.status())?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Transient(format!("malformed payload: {e}")))
    }
}

#[async_trait]
impl SourceClient for GithubClient {
    fn name(&self) -> &'static str {
        "github"
    }

    fn locator(&self, candidate: &Candidate) -> Option<String> {
        (!candidate.github_handle.is_empty()).then(|| candidate.github_handle.clone())
    }

    async fn fetch_profile(&self, handle: &str) -> FetchOutcome {
        let user_url = format!("{}/users/{handle}", self.api_url);
        let user: UserPayload = match self.retry.run("github user", || self.get_json(&user_url)).await
        {
            Ok(user) => user,
            Err(e) => {
                warn!(handle, error = %e, "github user lookup failed");
                return e.into_outcome();
            }
        };

        let repos_url = format!("{}/users/{handle}/repos", self.api_url);
        let repos: Vec<RepoPayload> = self
            .retry
            .run("github repos", || self.get_json(&repos_url))
            .await
            .unwrap_or_else(|e| {
                warn!(handle, error = %e, "github repo listing failed; continuing without");
                Vec::new()
            });

        let events_url = format!("{}/users/{handle}/events", self.api_url);
        let events: Vec<EventPayload> = self
            .retry
            .run("github events", || self.get_json(&events_url))
            .await
            .unwrap_or_else(|e| {
                warn!(handle, error = %e, "github event listing failed; continuing without");
                Vec::new()
            });

        let stats = build_stats(&user, &repos, &events);
        let skills = extract_repo_skills(&repos, &self.skills);
        let skill_score = scoring::skills_score(&skills, &self.skills);
        debug!(
            handle,
            repos = stats.public_repos,
            contributions = stats.total_contributions,
            skills = skills.len(),
            "github profile assembled"
        );

        FetchOutcome::Profile(SourceProfile {
            source: "github".to_string(),
            handle: handle.to_string(),
            skills,
            skill_score,
            stats: Some(stats),
        })
    }
}

fn build_stats(user: &UserPayload, repos: &[RepoPayload], events: &[EventPayload]) -> ActivityStats {
    let mut stats = ActivityStats {
        public_repos: user.public_repos,
        followers: user.followers,
        ..ActivityStats::default()
    };

    for repo in repos {
        stats.total_stars += repo.stargazers_count;
        stats.total_forks += repo.forks_count;
    }

    let cutoff = Utc::now() - chrono::Duration::days(RECENT_WINDOW_DAYS);
    for event in events {
        match event.kind.as_str() {
            "PushEvent" => {
                stats.push_events += 1;
                stats.commits += event.payload.commits.len() as u32;
            }
            "PullRequestEvent" => stats.pull_requests += 1,
            "IssuesEvent" => stats.issues += 1,
            _ => {}
        }
        if event.created_at.is_some_and(|at| at > cutoff) {
            stats.recent_activity += 1;
        }
    }
    stats.total_contributions = stats.push_events + stats.pull_requests + stats.issues;

    stats
}

/// Repository language and topic tags join the skill set verbatim;
/// description text is matched against the configured skill lists.
fn extract_repo_skills(repos: &[RepoPayload], criteria: &SkillsCriteria) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();
    for repo in repos {
        if let Some(language) = &repo.language {
            skills.insert(language.clone());
        }
        for topic in &repo.topics {
            skills.insert(topic.clone());
        }
        if let Some(description) = &repo.description {
            skills.extend(match_skill_lists(&description.to_lowercase(), criteria));
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(language: Option<&str>, topics: &[&str], description: Option<&str>, stars: u64) -> RepoPayload {
        RepoPayload {
            language: language.map(String::from),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            description: description.map(String::from),
            stargazers_count: stars,
            forks_count: 0,
        }
    }

    fn event(kind: &str, commits: usize, age_days: i64) -> EventPayload {
        EventPayload {
            kind: kind.to_string(),
            created_at: Some(Utc::now() - chrono::Duration::days(age_days)),
            payload: EventDetail {
                commits: vec![serde_json::json!({}); commits],
            },
        }
    }

    #[test]
    fn test_build_stats_counts_event_kinds() {
        let user = UserPayload {
            public_repos: 5,
            followers: 12,
        };
        let events = vec![
            event("PushEvent", 3, 2),
            event("PushEvent", 2, 40),
            event("PullRequestEvent", 0, 3),
            event("IssuesEvent", 0, 4),
            event("WatchEvent", 0, 1),
        ];
        let stats = build_stats(&user, &[], &events);
        assert_eq!(stats.push_events, 2);
        assert_eq!(stats.pull_requests, 1);
        assert_eq!(stats.issues, 1);
        assert_eq!(stats.commits, 5);
        assert_eq!(stats.total_contributions, 4);
        // The 40-day-old push falls outside the 30-day window; the watch
        // event counts for recency even though it is no contribution.
        assert_eq!(stats.recent_activity, 4);
        assert_eq!(stats.public_repos, 5);
        assert_eq!(stats.followers, 12);
    }

    #[test]
    fn test_build_stats_sums_stars_and_forks() {
        let user = UserPayload {
            public_repos: 2,
            followers: 0,
        };
        let repos = vec![
            repo(None, &[], None, 30),
            repo(None, &[], None, 12),
        ];
        let stats = build_stats(&user, &repos, &[]);
        assert_eq!(stats.total_stars, 42);
    }

    #[test]
    fn test_extract_repo_skills_from_languages_topics_descriptions() {
        let criteria = SkillsCriteria {
            required: vec!["Python".to_string()],
            preferred: vec!["Docker".to_string()],
            bonus: vec![],
        };
        let repos = vec![
            repo(Some("Rust"), &["cli", "tokio"], None, 0),
            repo(Some("Go"), &[], Some("A Python toolchain in Docker"), 0),
        ];
        let skills = extract_repo_skills(&repos, &criteria);
        assert!(skills.contains("Rust"));
        assert!(skills.contains("Go"));
        assert!(skills.contains("cli"));
        assert!(skills.contains("tokio"));
        assert!(skills.contains("Python"));
        assert!(skills.contains("Docker"));
    }

    #[test]
    fn test_payloads_tolerate_sparse_json() {
        let user: UserPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(user.public_repos, 0);

        let repos: Vec<RepoPayload> =
            serde_json::from_str(r#"[{"language": null}, {"stargazers_count": 7}]"#).unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[1].stargazers_count, 7);

        let events: Vec<EventPayload> = serde_json::from_str(
            r#"[{"type": "PushEvent", "created_at": "2024-01-01T00:00:00Z", "payload": {"commits": [{}]}}]"#,
        )
        .unwrap();
        assert_eq!(events[0].kind, "PushEvent");
        assert_eq!(events[0].payload.commits.len(), 1);
    }

    #[test]
    fn test_locator_requires_handle() {
        let client = GithubClient::new(&EngineConfig::default());
        let mut candidate = Candidate::default();
        assert!(client.locator(&candidate).is_none());
        candidate.github_handle = "octocat".to_string();
        assert_eq!(client.locator(&candidate).as_deref(), Some("octocat"));
    }
}
