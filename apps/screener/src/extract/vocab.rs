//! Reference vocabularies used by field extraction.
//!
//! These are data, not code: growing the skill list or adding an experience
//! phrasing never touches extraction or scoring logic.

/// Technologies recognized in resume text by case-insensitive substring
/// match. Matches keep the casing listed here.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "C++",
    "C#",
    "Ruby",
    "PHP",
    "Go",
    "Rust",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Express",
    "Django",
    "Flask",
    "Spring",
    "ASP.NET",
    "SQL",
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "Cassandra",
    "Oracle",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Ansible",
    "Jenkins",
    "GitLab CI",
    "Git",
    "SVN",
    "JIRA",
    "Confluence",
    "Machine Learning",
    "Deep Learning",
    "TensorFlow",
    "PyTorch",
    "Scikit-learn",
    "NLP",
    "Computer Vision",
    "REST API",
    "GraphQL",
    "gRPC",
    "WebSocket",
    "Microservices",
    "Serverless",
    "CI/CD",
];

/// Degree labels tested in priority order; the first label found wins.
pub const DEGREE_LABELS: &[&str] = &[
    "B.Tech", "M.Tech", "B.S.", "M.S.", "PhD", "Bachelor", "Master", "B.E.", "M.E.", "B.Sc.",
    "M.Sc.", "B.A.", "M.A.", "B.Com", "M.Com", "MBA", "BBA", "MCA", "BCA",
];

/// Experience phrasings in priority order. The first pattern that matches
/// anywhere in the text supplies the answer; later patterns are never tried.
pub const EXPERIENCE_PATTERNS: &[&str] = &[
    r"(\d+)\+?\s*years?\s*(?:of\s*)?experience",
    r"experience\D*?(\d+)\+?\s*years?",
    r"(\d+)\+?\s*yrs?\s*experience",
    r"(\d+)\+?\s*years?\s*in\s*the\s*field",
    r"(\d+)\+?\s*years?\s*of\s*professional",
    r"(\d+)\+?\s*years?\s*working\s*experience",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for skill in SKILL_VOCABULARY {
            assert!(seen.insert(skill.to_lowercase()), "duplicate skill {skill}");
        }
    }

    #[test]
    fn test_experience_patterns_compile() {
        for pattern in EXPERIENCE_PATTERNS {
            assert!(regex::Regex::new(pattern).is_ok(), "bad pattern {pattern}");
        }
    }
}
