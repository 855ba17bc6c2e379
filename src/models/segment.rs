use serde::{Deserialize, Serialize};

/// A coded sentence from a participant utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Sequential id within the document, starting at 1
    pub id: u32,
    /// The sentence text
    pub text: String,
    /// Assigned code label
    pub code: String,
    /// Domain keyword that produced the code, if any
    pub matched_keyword: Option<String>,
}

impl Segment {
    /// Display id, e.g. `S007`
    pub fn label(&self) -> String {
        segment_label(self.id)
    }

    /// Notes column text
    pub fn notes(&self) -> String {
        match &self.matched_keyword {
            Some(kw) => format!("Matched domain keyword: {}", kw),
            None => String::new(),
        }
    }
}

/// Format a segment id as `S001`, `S002`, ...
pub fn segment_label(id: u32) -> String {
    format!("S{:03}", id)
}

/// A cluster of codes sharing a thematic keyword set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier from the group table (e.g. `G02`)
    pub group_id: String,
    pub title: String,
    /// Distinct matching codes, sorted
    pub codes: Vec<String>,
    /// Ids of every matching segment, in segment order
    pub segment_ids: Vec<u32>,
}

impl Group {
    /// Number of matching segments (not distinct codes)
    pub fn count(&self) -> usize {
        self.segment_ids.len()
    }
}

/// One supporting example linking a code to a theme and research question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub research_question: String,
    pub main_theme: String,
    /// `<theme> - Example <n>`
    pub sub_theme: String,
    pub supporting_code: String,
    /// Segment text, at most 500 characters
    pub supporting_quote: String,
    pub segment_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_label_padding() {
        assert_eq!(segment_label(1), "S001");
        assert_eq!(segment_label(42), "S042");
        assert_eq!(segment_label(1234), "S1234");
    }

    #[test]
    fn test_segment_notes() {
        let mut segment = Segment {
            id: 1,
            text: "We run the robotics club after school.".to_string(),
            code: "Domain-specific practice (robotics)".to_string(),
            matched_keyword: Some("robotics".to_string()),
        };
        assert_eq!(segment.notes(), "Matched domain keyword: robotics");

        segment.matched_keyword = None;
        assert_eq!(segment.notes(), "");
    }
}
