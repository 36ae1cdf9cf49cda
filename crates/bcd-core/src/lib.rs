//! bcd-core
//!
//! Pure domain types for breast screening data entry: the form model, its
//! fixed vocabularies, patient identifiers and the summary projection shared
//! by the review step and the report. No file or terminal I/O lives here.

pub mod age;
pub mod error;
pub mod models;
pub mod patient_id;
pub mod summary;
pub mod vocab;
