use std::sync::LazyLock;

use regex::Regex;

static PERSONAL_PRONOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(i|we|my|our|us|me)\b").expect("valid pronoun regex"));

static QUESTION_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(what|how|why|when|where|who|could you|would you|can you)\b")
        .expect("valid question regex")
});

/// Lines shorter than this read as interviewer prompts
pub const SHORT_LINE_CHARS: usize = 20;
/// Lines longer than this read as participant statements
pub const LONG_LINE_CHARS: usize = 60;

/// Who is speaking a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Participant,
    Interviewer,
}

/// Which content rule decided an unmarked line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerCue {
    /// First-person pronoun and no question cue
    PersonalStatement,
    /// Question cue or a short line
    QuestionOrShort,
    /// Long line without other cues
    LongStatement,
    /// Nothing matched; excluded by default
    Ambiguous,
}

impl SpeakerCue {
    pub fn speaker(self) -> Speaker {
        match self {
            SpeakerCue::PersonalStatement | SpeakerCue::LongStatement => Speaker::Participant,
            SpeakerCue::QuestionOrShort | SpeakerCue::Ambiguous => Speaker::Interviewer,
        }
    }
}

pub fn has_personal_pronoun(line: &str) -> bool {
    PERSONAL_PRONOUN.is_match(line)
}

pub fn has_question_cue(line: &str) -> bool {
    QUESTION_CUE.is_match(line)
}

/// Classify a line that carries no speaker marker.
///
/// Rules apply in order, first hit wins:
/// 1. pronoun and no question cue -> participant
/// 2. question cue or fewer than 20 chars -> interviewer
/// 3. more than 60 chars -> participant
/// 4. otherwise interviewer
pub fn classify_unmarked_line(line: &str) -> SpeakerCue {
    let has_question = has_question_cue(line);
    let len = line.chars().count();

    if has_personal_pronoun(line) && !has_question {
        SpeakerCue::PersonalStatement
    } else if has_question || len < SHORT_LINE_CHARS {
        SpeakerCue::QuestionOrShort
    } else if len > LONG_LINE_CHARS {
        SpeakerCue::LongStatement
    } else {
        SpeakerCue::Ambiguous
    }
}
