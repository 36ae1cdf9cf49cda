//! bcd-export
//!
//! Screening report PDF generation and plain-text rendering of the summary.

pub mod error;
pub mod pdf;
pub mod render;
pub mod styles;
