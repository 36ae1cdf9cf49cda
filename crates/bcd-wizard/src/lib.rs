//! bcd-wizard
//!
//! The data-entry flow: a linear six-page wizard over the form model, and the
//! review step that either sends the user back to editing or produces the
//! report. Front ends drive it one user action at a time.

pub mod controller;
pub mod edit;
pub mod error;
pub mod page;
pub mod review;

pub use controller::{NavAction, Wizard};
pub use edit::FieldEdit;
pub use error::WizardError;
pub use page::Page;
pub use review::{ReportGenerator, ReviewDialog, ReviewOutcome};
