pub mod fallback_codes;
pub mod speaker_cues;

pub use fallback_codes::*;
pub use speaker_cues::*;
