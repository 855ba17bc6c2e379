pub mod stage0_segment;
pub mod stage1_coding;
pub mod stage2_grouping;
pub mod stage3_themes;

pub use stage0_segment::*;
pub use stage1_coding::*;
pub use stage2_grouping::*;
pub use stage3_themes::*;
