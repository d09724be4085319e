//! Table of authorities detection and parsing.
//!
//! [`scanner`] finds the table's page span, [`category`] and [`line_parser`]
//! read its lines, and [`segmenter`] ties them together into a
//! [`crate::model::Document`].

pub mod category;
pub mod line_parser;
pub mod scanner;
pub mod segmenter;

pub use segmenter::{DocumentSegmenter, EndBoundary, EndPagePolicy, SegmentOutcome, SegmenterConfig};
