//! Color → emotion matching: classify each color, then rank the matches.
//! `extract` supplies colors from image files.

pub mod classify;
pub mod extract;
pub mod rank;
