pub const TECHNOLOGY_PRACTICE: &str = "Technology-related practice";
pub const TEACHING_PRACTICE: &str = "Teaching-related practice";
pub const GENERAL_PRACTICE: &str = "General educational practice";

const TECHNOLOGY_WORDS: &[&str] = &["technology", "digital", "computer"];
const TEACHING_WORDS: &[&str] = &["student", "class", "teach", "learner"];

/// Code for a sentence no keyword matched. Expects lowercased text.
pub fn fallback_code(text_lower: &str) -> &'static str {
    if TECHNOLOGY_WORDS.iter().any(|w| text_lower.contains(w)) {
        TECHNOLOGY_PRACTICE
    } else if TEACHING_WORDS.iter().any(|w| text_lower.contains(w)) {
        TEACHING_PRACTICE
    } else {
        GENERAL_PRACTICE
    }
}
