use jiff::civil::{Date, DateTime};
use serde::Serialize;
use tracing::{debug, info};

use bcd_core::models::FormModel;
use bcd_core::patient_id::PatientId;
use bcd_core::summary::{QuickPreview, SummaryView};

use crate::edit::FieldEdit;
use crate::error::WizardError;
use crate::page::Page;
use crate::review::{ReviewDialog, ReviewOutcome};

/// The forward control shown next to `Previous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavAction {
    Next,
    /// Replaces `Next` on the summary page and opens the review dialog.
    Submit,
}

impl NavAction {
    pub fn label(self) -> &'static str {
        match self {
            NavAction::Next => "Next",
            NavAction::Submit => "Review & Submit",
        }
    }
}

/// Linear wizard over [`Page`]. Owns the form model.
///
/// There is no validation gate: every page can be left with empty fields.
/// `Next` on the last page and `Previous` on the first are no-ops.
#[derive(Debug, Clone)]
pub struct Wizard {
    page: Page,
    form: FormModel,
    preview: Option<QuickPreview>,
    submitted: bool,
}

impl Wizard {
    pub fn new(form: FormModel) -> Self {
        info!(patient_id = %form.patient.id(), "wizard started");
        Self {
            page: Page::default(),
            form,
            preview: None,
            submitted: false,
        }
    }

    /// Start a session now, with a freshly generated patient id.
    pub fn start(id_prefix: &str) -> Self {
        let now: DateTime = jiff::Zoned::now().datetime();
        Self::new(FormModel::new(PatientId::generate(id_prefix), now))
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    /// `(current page number, page count)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.page.number(), Page::ALL.len())
    }

    pub fn can_go_back(&self) -> bool {
        self.page.previous().is_some()
    }

    pub fn primary_action(&self) -> NavAction {
        if self.page == Page::Summary {
            NavAction::Submit
        } else {
            NavAction::Next
        }
    }

    /// Quick preview, present only while the summary page is showing.
    pub fn preview(&self) -> Option<&QuickPreview> {
        self.preview.as_ref()
    }

    /// Whether a review has ended in a generated report.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Advance one page. Returns false (and changes nothing) on the last page.
    pub fn next(&mut self) -> bool {
        let Some(to) = self.page.next() else {
            return false;
        };
        debug!(from = ?self.page, to = ?to, "next page");
        self.page = to;
        if to == Page::Summary {
            self.preview = Some(QuickPreview::from_form(&self.form));
        }
        true
    }

    /// Go back one page. Returns false (and changes nothing) on the first page.
    pub fn previous(&mut self) -> bool {
        let Some(to) = self.page.previous() else {
            return false;
        };
        debug!(from = ?self.page, to = ?to, "previous page");
        self.page = to;
        self.preview = None;
        true
    }

    /// Apply an edit belonging to the current page.
    pub fn apply(&mut self, edit: FieldEdit, today: Date) -> Result<(), WizardError> {
        let field_page = edit.page();
        if field_page != self.page {
            return Err(WizardError::FieldNotOnPage {
                field_page,
                current: self.page,
            });
        }
        edit.apply_to(&mut self.form, today)?;
        Ok(())
    }

    /// Assemble the current form into a review dialog.
    pub fn submit(&self) -> Result<ReviewDialog, WizardError> {
        if self.page != Page::Summary {
            return Err(WizardError::NotOnSummaryPage);
        }
        info!(patient_id = %self.form.patient.id(), "opening review");
        Ok(ReviewDialog::new(SummaryView::assemble(&self.form)))
    }

    /// Take back control from a closed review dialog.
    pub fn close_review(&mut self, outcome: &ReviewOutcome) {
        match outcome {
            ReviewOutcome::Edit => {
                info!("review rejected, back to editing");
            }
            ReviewOutcome::Submitted { report } => {
                self.submitted = true;
                info!(
                    patient_id = %self.form.patient.id(),
                    report = %report.display(),
                    "data submitted"
                );
            }
        }
    }
}
