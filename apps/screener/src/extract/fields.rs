//! Structured fact extraction from normalized resume text.
//!
//! Everything here is best-effort pattern matching: a missing field is an
//! empty/zero value, never an error. Handle patterns tolerate a whitespace
//! separator where a URL slash stood, because text cleaning collapses
//! punctuation before extraction runs.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::vocab::{DEGREE_LABELS, EXPERIENCE_PATTERNS, SKILL_VOCABULARY};

/// Facts derived from one resume's text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub email: String,
    pub github_handle: String,
    pub linkedin_handle: String,
    pub portfolio_url: String,
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub education: String,
}

pub struct FieldExtractor {
    email: Regex,
    github: Regex,
    linkedin: Regex,
    domain: Regex,
    experience: Vec<Regex>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        let compile = |p: &str| Regex::new(p).expect("hardcoded pattern compiles");
        Self {
            email: compile(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
            github: compile(r"(?i)github\.com[/\s]+([A-Za-z0-9_-]+)"),
            linkedin: compile(r"(?i)linkedin\.com[/\s]+(?:in|pub)[/\s]+([A-Za-z0-9_%-]+)"),
            domain: compile(
                r"(?i)\b([a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:dev|io|me|app|tech|site|page))\b",
            ),
            experience: EXPERIENCE_PATTERNS.iter().map(|p| compile(p)).collect(),
        }
    }

    pub fn extract(&self, text: &str) -> ExtractedFields {
        let email = self.extract_email(text);
        ExtractedFields {
            github_handle: self.extract_github_handle(text),
            linkedin_handle: self.extract_linkedin_handle(text),
            portfolio_url: self.extract_portfolio_url(text, &email),
            skills: extract_skills(text),
            experience_years: self.extract_experience_years(text),
            education: extract_education(text),
            email,
        }
    }

    /// First standard local@domain match; empty if none.
    fn extract_email(&self, text: &str) -> String {
        self.email
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }

    fn extract_github_handle(&self, text: &str) -> String {
        self.github
            .captures(text)
            .map(|c| c[1].to_lowercase())
            .unwrap_or_default()
    }

    fn extract_linkedin_handle(&self, text: &str) -> String {
        self.linkedin
            .captures(text)
            .map(|c| c[1].to_lowercase())
            .unwrap_or_default()
    }

    /// First bare domain that is neither a known profile host nor the
    /// candidate's own mail domain. Heuristic only; an absent portfolio is
    /// the common case.
    fn extract_portfolio_url(&self, text: &str, email: &str) -> String {
        let mail_domain = email.split('@').nth(1).unwrap_or("").to_lowercase();
        for captures in self.domain.captures_iter(text) {
            let domain = captures[1].to_lowercase();
            if domain.contains("github.com") || domain.contains("linkedin.com") {
                continue;
            }
            if !mail_domain.is_empty() && domain == mail_domain {
                continue;
            }
            return domain;
        }
        String::new()
    }

    /// Patterns are tried in fixed priority order; the first pattern whose
    /// first match parses as an integer wins, and later patterns are never
    /// consulted.
    fn extract_experience_years(&self, text: &str) -> u32 {
        let lower = text.to_lowercase();
        for pattern in &self.experience {
            if let Some(captures) = pattern.captures(&lower) {
                if let Ok(years) = captures[1].parse::<u32>() {
                    return years;
                }
            }
        }
        0
    }
}

/// Case-insensitive substring match of the text against the reference skill
/// vocabulary. The result keeps vocabulary casing; duplicates are impossible
/// by construction.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

/// First degree label (in priority order) appearing as a case-insensitive
/// substring; empty if none.
fn extract_education(text: &str) -> String {
    let lower = text.to_lowercase();
    DEGREE_LABELS
        .iter()
        .find(|degree| lower.contains(&degree.to_lowercase()))
        .map(|degree| degree.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(text: &str) -> ExtractedFields {
        FieldExtractor::new().extract(text)
    }

    #[test]
    fn test_email_first_match_wins() {
        let f = fields("contact a.first@example.com or b.second@example.com");
        assert_eq!(f.email, "a.first@example.com");
    }

    #[test]
    fn test_missing_email_is_empty_not_error() {
        assert_eq!(fields("no contact details here").email, "");
    }

    #[test]
    fn test_github_handle_from_url_form() {
        assert_eq!(fields("see github.com/OctoCat for code").github_handle, "octocat");
    }

    #[test]
    fn test_github_handle_from_cleaned_text_form() {
        // Cleaning turns "github.com/octocat" into "github.com octocat".
        assert_eq!(fields("github.com octocat").github_handle, "octocat");
    }

    #[test]
    fn test_linkedin_handle_both_path_shapes() {
        assert_eq!(fields("linkedin.com in jane-doe").linkedin_handle, "jane-doe");
        assert_eq!(fields("linkedin.com/pub/jdoe").linkedin_handle, "jdoe");
    }

    #[test]
    fn test_portfolio_skips_profile_hosts_and_mail_domain() {
        let f = fields("jane@startup.io github.com jane janedoe.dev linkedin.com in jane");
        assert_eq!(f.portfolio_url, "janedoe.dev");
    }

    #[test]
    fn test_portfolio_absent_is_empty() {
        assert_eq!(fields("jane@example.com github.com jane").portfolio_url, "");
    }

    #[test]
    fn test_skills_case_insensitive_set() {
        let f = fields("worked with PYTHON, docker and PostgreSQL");
        assert!(f.skills.contains("Python"));
        assert!(f.skills.contains("Docker"));
        assert!(f.skills.contains("PostgreSQL"));
        assert!(!f.skills.contains("Rust"));
    }

    #[test]
    fn test_skills_no_duplicates() {
        let f = fields("python python Python");
        assert_eq!(f.skills.iter().filter(|s| *s == "Python").count(), 1);
    }

    #[test]
    fn test_experience_basic_phrasing() {
        assert_eq!(fields("5 years experience building services").experience_years, 5);
        assert_eq!(fields("10+ years of experience").experience_years, 10);
    }

    #[test]
    fn test_experience_alternative_phrasings() {
        assert_eq!(fields("3 yrs experience with Rust").experience_years, 3);
        assert_eq!(fields("6 years in the field").experience_years, 6);
        assert_eq!(fields("4 years of professional work").experience_years, 4);
        assert_eq!(fields("2 years working experience").experience_years, 2);
    }

    #[test]
    fn test_experience_pattern_priority_beats_text_position() {
        // "years in the field" appears first in the text, but the yrs
        // phrasing is earlier in the priority order.
        let f = fields("2 years in the field and 9 yrs experience overall");
        assert_eq!(f.experience_years, 9);
    }

    #[test]
    fn test_experience_unmatched_is_zero() {
        assert_eq!(fields("a decade of shipping software").experience_years, 0);
    }

    #[test]
    fn test_experience_unparseable_capture_falls_through() {
        // 99999999999999999999 overflows u32; the next pattern supplies 6.
        let f = fields("99999999999999999999 years experience and 6 years in the field");
        assert_eq!(f.experience_years, 6);
    }

    #[test]
    fn test_education_priority_order() {
        // B.Tech precedes Bachelor in the label list.
        let f = fields("Bachelor of Technology B.Tech in CS");
        assert_eq!(f.education, "B.Tech");
    }

    #[test]
    fn test_education_case_insensitive() {
        assert_eq!(fields("completed my phd in 2019").education, "PhD");
    }

    #[test]
    fn test_education_absent_is_empty() {
        assert_eq!(fields("self-taught engineer").education, "");
    }

    #[test]
    fn test_education_substring_match_can_fire_inside_domains() {
        // Substring semantics mean "b.com" matches inside "github.com" when
        // no higher-priority label is present. Real degrees still win.
        assert_eq!(fields("code at github.com octocat").education, "B.Com");
        assert_eq!(
            fields("B.Tech graduate, code at github.com octocat").education,
            "B.Tech"
        );
    }

    #[test]
    fn test_full_resume_roundtrip() {
        let text = "Jane Doe jane.doe@example.com github.com janedoe \
                    linkedin.com in jane-doe Skills Python Docker SQL \
                    5 years experience M.S. Computer Science";
        let f = fields(text);
        assert_eq!(f.email, "jane.doe@example.com");
        assert_eq!(f.github_handle, "janedoe");
        assert_eq!(f.linkedin_handle, "jane-doe");
        assert_eq!(f.experience_years, 5);
        assert_eq!(f.education, "M.S.");
        assert!(f.skills.contains("Python"));
        assert!(f.skills.contains("Docker"));
        assert!(f.skills.contains("SQL"));
    }
}
