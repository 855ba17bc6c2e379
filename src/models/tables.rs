use serde::{Deserialize, Serialize};

/// Returns true if any keyword is a case-insensitive substring of `code`.
/// Blank keywords never match.
pub fn code_matches(code: &str, keywords: &[String]) -> bool {
    let code_lower = code.to_lowercase();
    keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .any(|k| code_lower.contains(&k.to_lowercase()))
}

/// A Stage 2 group: id, title and the keywords that pull codes into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub group_id: String,
    pub title: String,
    pub keywords: Vec<String>,
}

impl GroupDefinition {
    pub fn new(group_id: &str, title: &str, keywords: &[&str]) -> Self {
        Self {
            group_id: group_id.to_string(),
            title: title.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        code_matches(code, &self.keywords)
    }
}

/// Ordered group table; output groups follow this order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTable {
    pub groups: Vec<GroupDefinition>,
}

impl Default for GroupTable {
    fn default() -> Self {
        Self {
            groups: vec![
                GroupDefinition::new(
                    "G01",
                    "Professional Background and Identity",
                    &["professional", "identity", "experience", "career"],
                ),
                GroupDefinition::new(
                    "G02",
                    "Digital Tools and Platforms",
                    &["lms", "multimedia", "social media", "virtual", "presentation", "technology"],
                ),
                GroupDefinition::new(
                    "G03",
                    "Professional Development and Learning",
                    &["professional development", "continuous learning", "training", "workshop"],
                ),
                GroupDefinition::new(
                    "G04",
                    "Technology Integration Challenges",
                    &["challenge", "limitation", "barrier", "problem", "resource"],
                ),
                GroupDefinition::new(
                    "G05",
                    "Assessment and Feedback Practices",
                    &["assessment", "feedback", "grading", "evaluation"],
                ),
                GroupDefinition::new(
                    "G06",
                    "Student Engagement and Interaction",
                    &["engagement", "interaction", "motivation", "participation"],
                ),
                GroupDefinition::new(
                    "G07",
                    "General Teaching Practices",
                    &["teaching", "educational", "general"],
                ),
            ],
        }
    }
}

/// A Stage 3 theme and the code keywords that support it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ThemeDefinition {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        code_matches(code, &self.keywords)
    }
}

/// Ordered theme table; output entries are grouped in this order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTable {
    pub themes: Vec<ThemeDefinition>,
}

impl Default for ThemeTable {
    fn default() -> Self {
        Self {
            themes: vec![
                ThemeDefinition::new(
                    "Technology Integration Barriers",
                    &["challenge", "limitation", "barrier", "problem"],
                ),
                ThemeDefinition::new(
                    "Skill and Knowledge Gaps",
                    &["lack", "limited", "insufficient", "gap"],
                ),
                ThemeDefinition::new(
                    "Institutional Constraints",
                    &["resource", "support", "institutional"],
                ),
                ThemeDefinition::new(
                    "Professional Development Strategies",
                    &["training", "workshop", "development", "learning"],
                ),
                ThemeDefinition::new(
                    "Peer and Collaborative Learning",
                    &["colleague", "peer", "collaboration"],
                ),
                ThemeDefinition::new("Self-Directed Learning", &["self", "independent", "personal"]),
                ThemeDefinition::new(
                    "Communication and Collaboration Tools",
                    &["lms", "social media", "virtual", "communication"],
                ),
                ThemeDefinition::new(
                    "Multimedia and Presentation Tools",
                    &["multimedia", "presentation", "video", "visual"],
                ),
                ThemeDefinition::new(
                    "Assessment and Feedback Systems",
                    &["assessment", "feedback", "evaluation", "grading"],
                ),
                ThemeDefinition::new(
                    "Student Engagement Technologies",
                    &["engagement", "interaction", "motivation"],
                ),
            ],
        }
    }
}
