//! Per-dimension scoring — pure functions over extracted/verified facts.
//!
//! Deterministic and side-effect-free given inputs and config. All dimension
//! scores land in [0,100]; the weighted total is only bounded when the
//! configured weights are (they are intentionally not, by default).

use std::collections::BTreeSet;

use crate::config::{
    EducationCriteria, ExperienceCriteria, GithubCriteria, ScoringWeights, SkillsCriteria,
};
use crate::models::{ActivityStats, Candidate};

/// `60 * required coverage + 30 * preferred coverage + min(5 * bonus, 10)`,
/// clamped to [0,100]. An empty skill set scores 0; an empty required or
/// preferred list contributes 0 for its term rather than dividing by zero.
pub fn skills_score(skills: &BTreeSet<String>, criteria: &SkillsCriteria) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }

    let held: BTreeSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let matched = |list: &[String]| {
        list.iter()
            .filter(|skill| held.contains(&skill.to_lowercase()))
            .count() as f64
    };

    let mut score = 0.0;
    if !criteria.required.is_empty() {
        score += 60.0 * matched(&criteria.required) / criteria.required.len() as f64;
    }
    if !criteria.preferred.is_empty() {
        score += 30.0 * matched(&criteria.preferred) / criteria.preferred.len() as f64;
    }
    score += (5.0 * matched(&criteria.bonus)).min(10.0);

    score.clamp(0.0, 100.0)
}

/// 0 below the minimum, 100 at/above the senior threshold, linear in
/// between. Monotonically non-decreasing in years.
pub fn experience_score(years: u32, criteria: &ExperienceCriteria) -> f64 {
    if years < criteria.minimum_years {
        return 0.0;
    }
    if years >= criteria.senior_threshold {
        return 100.0;
    }
    100.0 * f64::from(years) / f64::from(criteria.senior_threshold)
}

/// 100 for any accepted-degree substring (case-insensitive), 50 partial
/// credit for other education text, 0 for none.
pub fn education_score(education: &str, criteria: &EducationCriteria) -> f64 {
    if education.is_empty() {
        return 0.0;
    }
    let lower = education.to_lowercase();
    if criteria
        .accepted_degrees
        .iter()
        .any(|degree| lower.contains(&degree.to_lowercase()))
    {
        100.0
    } else {
        50.0
    }
}

/// Four capped activity sub-signals: repositories (30), recent activity
/// events (40), followers (20), total stars (10). Each interpolates linearly
/// below its target and earns the full cap at/above it.
pub fn reputation_score(stats: Option<&ActivityStats>, criteria: &GithubCriteria) -> f64 {
    let Some(stats) = stats else {
        return 0.0;
    };

    let score = capped(f64::from(stats.public_repos), f64::from(criteria.min_repos), 30.0)
        + capped(
            f64::from(stats.recent_activity),
            f64::from(criteria.activity_target),
            40.0,
        )
        + capped(
            f64::from(stats.followers),
            f64::from(criteria.follower_target),
            20.0,
        )
        + capped(stats.total_stars as f64, criteria.star_target as f64, 10.0);

    score.clamp(0.0, 100.0)
}

fn capped(value: f64, target: f64, cap: f64) -> f64 {
    if value <= 0.0 || target <= 0.0 {
        0.0
    } else if value >= target {
        cap
    } else {
        cap * value / target
    }
}

/// Weighted sum of the four dimension scores, rounded to 2 decimals. The
/// weights are taken as configured; no normalization is applied.
pub fn total_score(candidate: &Candidate, weights: &ScoringWeights) -> f64 {
    round2(
        candidate.skills_score * weights.skills
            + candidate.experience_score * weights.experience
            + candidate.education_score * weights.education
            + candidate.reputation_score * weights.reputation,
    )
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
