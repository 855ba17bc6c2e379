use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::heuristics::{classify_unmarked_line, Speaker};

static SPEAKER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+:\s*").expect("valid speaker prefix regex"));

// Punctuation, whitespace, then the capital or digit opening the next sentence.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+[A-Z0-9]").expect("valid sentence boundary regex"));

/// Configuration for speaker segmentation
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Line prefixes that open a participant turn (matched case-insensitively)
    pub participant_markers: Vec<String>,
    /// Line prefixes that open an interviewer turn
    pub interviewer_markers: Vec<String>,
    /// Blocks shorter than this (in chars) are dropped
    pub min_block_chars: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            participant_markers: vec![
                "participant:".to_string(),
                "interviewee:".to_string(),
                "teacher:".to_string(),
                "respondent:".to_string(),
            ],
            interviewer_markers: vec![
                "researcher:".to_string(),
                "interviewer:".to_string(),
                "moderator:".to_string(),
            ],
            min_block_chars: 20,
        }
    }
}

// Line and paragraph separators, including lone `\r`, form feeds from PDF
// page breaks and the Unicode separators.
const LINE_SEPARATORS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(LINE_SEPARATORS)
}

fn starts_with_marker(line_lower: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .any(|m| line_lower.starts_with(&m.to_lowercase()))
}

fn flush(current: &mut Vec<String>, speaker: Option<Speaker>, blocks: &mut Vec<String>) {
    if !current.is_empty() && speaker == Some(Speaker::Participant) {
        blocks.push(current.join(" ").trim().to_string());
    }
    current.clear();
}

/// Split a transcript into participant-only utterance blocks.
///
/// Explicit markers switch the current speaker. Until the first marker (or
/// the first classified line) the speaker is unknown and the first unmarked
/// line is classified by content; later unmarked lines inherit the current
/// speaker. Blocks are returned in transcript order.
pub fn segment_speakers(text: &str, config: &SegmenterConfig) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut speaker: Option<Speaker> = None;

    for line in split_lines(text).map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        if starts_with_marker(&lower, &config.participant_markers) {
            flush(&mut current, speaker, &mut blocks);
            speaker = Some(Speaker::Participant);
            let cleaned = SPEAKER_PREFIX.replace(line, "");
            if !cleaned.is_empty() {
                current.push(cleaned.into_owned());
            }
        } else if starts_with_marker(&lower, &config.interviewer_markers) {
            flush(&mut current, speaker, &mut blocks);
            speaker = Some(Speaker::Interviewer);
        } else {
            let resolved = match speaker {
                Some(s) => s,
                None => {
                    let cue = classify_unmarked_line(line);
                    debug!("Unmarked line classified as {:?} ({:?})", cue.speaker(), cue);
                    cue.speaker()
                }
            };
            speaker = Some(resolved);

            match resolved {
                Speaker::Participant => current.push(line.to_string()),
                Speaker::Interviewer => flush(&mut current, speaker, &mut blocks),
            }
        }
    }

    flush(&mut current, speaker, &mut blocks);

    let before = blocks.len();
    blocks.retain(|b| b.chars().count() >= config.min_block_chars);
    info!(
        "Extracted {} participant blocks ({} dropped as too short)",
        blocks.len(),
        before - blocks.len()
    );
    blocks
}

/// Split an utterance block into sentences.
///
/// Splits after `.`, `!` or `?` when followed by whitespace and an uppercase
/// ASCII letter or digit. If that yields a single piece, falls back to line
/// breaks. Pieces are trimmed and empty ones dropped.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut pieces: Vec<&str> = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BOUNDARY.find_iter(text) {
        // both ends of the match are single-byte ASCII characters
        pieces.push(&text[start..m.start() + 1]);
        start = m.end() - 1;
    }
    pieces.push(&text[start..]);

    if pieces.len() <= 1 {
        pieces = split_lines(text).collect();
    }

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_participant_block() {
        let text = "Interviewer: Hello\nParticipant: I teach math and use Zoom for online class.\nInterviewer: Thanks";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(blocks, vec!["I teach math and use Zoom for online class."]);
    }

    #[test]
    fn test_continuation_lines_join_block() {
        let text = "Researcher: How do you assess students?\n\
                    Respondent: Mostly with online quizzes.\n\
                    Sometimes I also use peer review.\n\
                    Researcher: Interesting.\n\
                    This line belongs to the researcher.\n\
                    Teacher: We lack proper internet in rural schools.";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(
            blocks,
            vec![
                "Mostly with online quizzes. Sometimes I also use peer review.",
                "We lack proper internet in rural schools.",
            ]
        );
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        let text = "INTERVIEWER: Tell me more\nPARTICIPANT: We started using Moodle last year.";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(blocks, vec!["We started using Moodle last year."]);
    }

    #[test]
    fn test_short_blocks_dropped() {
        let text = "Participant: Yes, sure.\nInterviewer: And then?\nParticipant: Then we moved everything to Teams.";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(blocks, vec!["Then we moved everything to Teams."]);
    }

    #[test]
    fn test_empty_marker_line_starts_empty_block() {
        let text = "Participant:\nI have taught chemistry for twelve years now.\nInterviewer: Thanks";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(blocks, vec!["I have taught chemistry for twelve years now."]);
    }

    #[test]
    fn test_heuristic_first_line_participant() {
        let text = "I have been using WhatsApp groups with my students since 2019.\nIt works well for quick announcements.";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("I have been using WhatsApp"));
        assert!(blocks[0].ends_with("quick announcements."));
    }

    #[test]
    fn test_heuristic_first_line_interviewer_excludes_all() {
        // The first line is a question, so the unmarked remainder inherits the interviewer
        let text = "What tools do you use?\nI use Moodle and YouTube for most of my lessons.";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_custom_markers() {
        let config = SegmenterConfig {
            participant_markers: vec!["p1:".to_string()],
            interviewer_markers: vec!["q:".to_string()],
            min_block_chars: 5,
        };
        let text = "Q: Start\nP1: Blackboard is our main system.\nQ: Ok";
        let blocks = segment_speakers(text, &config);
        assert_eq!(blocks, vec!["Blackboard is our main system."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(segment_speakers("", &SegmenterConfig::default()).is_empty());
        assert!(segment_speakers("\n \n\t\n", &SegmenterConfig::default()).is_empty());
    }

    #[test]
    fn test_split_sentences_on_boundaries() {
        let sentences =
            split_into_sentences("I use slides. They help a lot! Do students like it? 2020 was hard.");
        assert_eq!(
            sentences,
            vec![
                "I use slides.",
                "They help a lot!",
                "Do students like it?",
                "2020 was hard.",
            ]
        );
    }

    #[test]
    fn test_split_requires_capital_after_boundary() {
        let sentences = split_into_sentences("We use e.g. zoom. and teams too");
        assert_eq!(sentences, vec!["We use e.g. zoom. and teams too"]);
    }

    #[test]
    fn test_split_falls_back_to_lines() {
        let sentences = split_into_sentences("first line without stop\n\nsecond line here\n");
        assert_eq!(sentences, vec!["first line without stop", "second line here"]);
    }

    #[test]
    fn test_split_falls_back_to_any_line_separator() {
        let sentences = split_into_sentences("mac line one\rpage two starts\x0cthen\u{2028}done");
        assert_eq!(sentences, vec!["mac line one", "page two starts", "then", "done"]);
    }

    #[test]
    fn test_lone_carriage_returns_separate_turns() {
        let text = "Interviewer: What tools do you use?\r\
                    Participant: I use Moodle and Zoom for every online class.\r\
                    Interviewer: Thanks";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(blocks, vec!["I use Moodle and Zoom for every online class."]);
    }

    #[test]
    fn test_form_feed_and_unicode_separators_separate_turns() {
        let text = "Interviewer: Which platform do you use?\x0c\
                    Participant: We moved all our classes to Google Classroom.\u{2028}\
                    Researcher: Why?\u{2029}\
                    Teacher: The school pays for the licences now.";
        let blocks = segment_speakers(text, &SegmenterConfig::default());
        assert_eq!(
            blocks,
            vec![
                "We moved all our classes to Google Classroom.",
                "The school pays for the licences now.",
            ]
        );
    }

    #[test]
    fn test_split_single_sentence() {
        let sentences = split_into_sentences("  I teach math and use Zoom for online class.  ");
        assert_eq!(sentences, vec!["I teach math and use Zoom for online class."]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences("   ").is_empty());
    }
}
