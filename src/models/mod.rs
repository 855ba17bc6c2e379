pub mod codebook;
pub mod segment;
pub mod tables;

pub use codebook::*;
pub use segment::*;
pub use tables::*;
