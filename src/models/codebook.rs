use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single code label with the keywords that trigger it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebookEntry {
    /// Code label emitted when one of the keywords matches
    pub label: String,
    /// Keywords in matching order
    pub keywords: Vec<String>,
}

impl CodebookEntry {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered mapping from code label to keywords.
///
/// Entry order is the matching order: the first entry with a keyword
/// contained in a sentence wins. JSON objects keep their key order on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    entries: Vec<CodebookEntry>,
}

impl Codebook {
    pub fn new(entries: Vec<CodebookEntry>) -> Self {
        Self { entries }
    }

    /// The built-in codebook used when no custom one is supplied
    pub fn builtin() -> Self {
        Self::new(vec![
            CodebookEntry::new(
                "Professional identity and experience",
                &["professor", "lecturer", "teacher", "years of experience", "experience"],
            ),
            CodebookEntry::new(
                "Use of Learning Management Systems",
                &["lms", "learning management", "blackboard", "moodle"],
            ),
            CodebookEntry::new(
                "Use of multimedia resources",
                &["youtube", "video", "multimedia", "visual"],
            ),
            CodebookEntry::new(
                "Use of social media for education",
                &["whatsapp", "social media", "facebook", "telegram"],
            ),
            CodebookEntry::new(
                "Virtual teaching platforms",
                &["google meet", "zoom", "online class", "teams"],
            ),
            CodebookEntry::new(
                "Presentation software usage",
                &["powerpoint", "slides", "presentation"],
            ),
            CodebookEntry::new(
                "Professional development activities",
                &["training", "workshop", "professional development"],
            ),
            CodebookEntry::new("Continuous learning practices", &["learn", "update", "skill"]),
            CodebookEntry::new(
                "Technology integration challenges",
                &["difficult", "challenge", "problem", "barrier"],
            ),
            CodebookEntry::new(
                "Resource limitations",
                &["lack", "limited", "insufficient", "shortage"],
            ),
            CodebookEntry::new(
                "Digital assessment practices",
                &["assessment", "evaluation", "quiz", "test"],
            ),
            CodebookEntry::new("Feedback and grading", &["feedback", "grade", "marking"]),
            CodebookEntry::new(
                "Student engagement strategies",
                &["engage", "motivate", "interest"],
            ),
            CodebookEntry::new(
                "Interactive teaching methods",
                &["interaction", "participation", "active"],
            ),
            CodebookEntry::new(
                "Technology-related practice",
                &["technology", "digital", "computer"],
            ),
            CodebookEntry::new("Teaching-related practice", &["student", "class", "teach"]),
        ])
    }

    pub fn entries(&self) -> &[CodebookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keywords for a label, if present
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.keywords.as_slice())
    }

    /// Insert or replace a label. A replaced label keeps its original position.
    pub fn insert(&mut self, label: String, keywords: Vec<String>) {
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => entry.keywords = keywords,
            None => self.entries.push(CodebookEntry { label, keywords }),
        }
    }
}

impl Default for Codebook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Serialize for Codebook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.label, &entry.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Codebook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CodebookVisitor)
    }
}

struct CodebookVisitor;

impl<'de> Visitor<'de> for CodebookVisitor {
    type Value = Codebook;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping code labels to keyword lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut codebook = Codebook::new(Vec::with_capacity(access.size_hint().unwrap_or(0)));
        while let Some((label, keywords)) = access.next_entry::<String, Vec<String>>()? {
            codebook.insert(label, keywords);
        }
        Ok(codebook)
    }
}
