use tracing::info;

use crate::models::{Segment, ThemeEntry, ThemeTable};

/// Maximum supporting examples emitted per theme
pub const MAX_ENTRIES_PER_THEME: usize = 5;
/// Supporting quotes are cut to this many characters
pub const MAX_QUOTE_CHARS: usize = 500;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the UTF-8 bytes of `text`
pub fn fnv1a_64(text: &str) -> u64 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Pick the research question for a theme.
///
/// The choice depends only on the theme name and the number of questions,
/// so it is identical across runs and processes.
pub fn resolve_research_question(theme_name: &str, research_questions: &[String]) -> String {
    if research_questions.is_empty() {
        return format!("(No RQ) — {}", theme_name);
    }
    let index = (fnv1a_64(theme_name) % research_questions.len() as u64) as usize;
    research_questions[index].clone()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Result of Stage 3 theme mapping
#[derive(Debug, Clone, Default)]
pub struct Stage3Result {
    /// Entries grouped by theme in table order
    pub entries: Vec<ThemeEntry>,
    /// Number of themes with at least one supporting segment
    pub themes_matched: usize,
}

/// Execute Stage 3: thematic framework
///
/// For each theme, the first five segments whose code contains one of the
/// theme keywords become supporting examples tied to a research question.
pub fn execute_stage3(
    segments: &[Segment],
    table: &ThemeTable,
    research_questions: &[String],
) -> Stage3Result {
    let mut entries = Vec::new();
    let mut themes_matched = 0;

    for theme in &table.themes {
        let mut relevant = segments.iter().filter(|s| theme.matches(&s.code)).peekable();
        if relevant.peek().is_none() {
            continue;
        }
        themes_matched += 1;

        let research_question = resolve_research_question(&theme.name, research_questions);
        for (i, segment) in relevant.take(MAX_ENTRIES_PER_THEME).enumerate() {
            entries.push(ThemeEntry {
                research_question: research_question.clone(),
                main_theme: theme.name.clone(),
                sub_theme: format!("{} - Example {}", theme.name, i + 1),
                supporting_code: segment.code.clone(),
                supporting_quote: truncate_chars(&segment.text, MAX_QUOTE_CHARS),
                segment_id: segment.id,
            });
        }
    }

    info!(
        "Stage 3: {} thematic entries created across {} themes",
        entries.len(),
        themes_matched
    );

    Stage3Result {
        entries,
        themes_matched,
    }
}
