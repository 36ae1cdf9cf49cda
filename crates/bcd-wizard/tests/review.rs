use std::cell::Cell;
use std::path::Path;

use bcd_core::models::FormModel;
use bcd_core::patient_id::PatientId;
use bcd_core::summary::SummaryView;
use bcd_export::pdf::ReportWriter;
use bcd_wizard::review::ImagePreview;
use bcd_wizard::{FieldEdit, Page, ReportGenerator, ReviewOutcome, Wizard};
use jiff::civil::{date, datetime};

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

/// Fails the first `failures` calls, then succeeds.
struct Flaky {
    failures: Cell<usize>,
}

impl ReportGenerator for Flaky {
    type Error = DiskFull;

    fn generate(&self, _summary: &SummaryView, _destination: &Path) -> Result<(), DiskFull> {
        let left = self.failures.get();
        if left > 0 {
            self.failures.set(left - 1);
            Err(DiskFull)
        } else {
            Ok(())
        }
    }
}

fn wizard_on_summary() -> Wizard {
    let mut w = Wizard::new(FormModel::new(
        PatientId::generate("BC"),
        datetime(2040, 3, 1, 8, 0, 0, 0),
    ));
    while w.next() {}
    assert_eq!(w.page(), Page::Summary);
    w
}

#[test]
fn edit_returns_to_wizard_untouched() {
    let mut w = wizard_on_summary();
    let before = w.form().clone();
    let mut dialog = w.submit().unwrap();

    let outcome = dialog.edit();
    assert_eq!(outcome, ReviewOutcome::Edit);
    assert!(!dialog.is_open());

    w.close_review(&outcome);
    assert_eq!(w.page(), Page::Summary);
    assert_eq!(w.form(), &before);
    assert!(!w.is_submitted());
}

#[test]
fn failed_generation_keeps_dialog_open_for_retry() {
    let mut w = wizard_on_summary();
    let mut dialog = w.submit().unwrap();
    let generator = Flaky {
        failures: Cell::new(1),
    };

    assert!(dialog.generate_report(&generator, Path::new("out.pdf")).is_err());
    assert!(dialog.is_open());

    let outcome = dialog
        .generate_report(&generator, Path::new("out.pdf"))
        .unwrap();
    assert!(!dialog.is_open());
    assert_eq!(
        outcome,
        ReviewOutcome::Submitted {
            report: "out.pdf".into()
        }
    );

    w.close_review(&outcome);
    assert!(w.is_submitted());
}

#[test]
fn generates_real_report_with_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let w = wizard_on_summary();
    let mut dialog = w.submit().unwrap();

    let name = dialog.default_file_name();
    assert_eq!(name, format!("Report_{}.pdf", w.form().patient.id()));

    let dest = dir.path().join(&name);
    dialog
        .generate_report(&ReportWriter::default(), &dest)
        .unwrap();
    assert!(std::fs::read(&dest).unwrap().starts_with(b"%PDF"));
}

#[test]
fn unwritable_destination_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    let w = wizard_on_summary();
    let mut dialog = w.submit().unwrap();
    let dest = dir.path().join("missing").join("r.pdf");

    let err = dialog
        .generate_report(&ReportWriter::default(), &dest)
        .unwrap_err();
    assert!(err.to_string().contains("cannot write report"));
    assert!(dialog.is_open());
}

#[test]
fn image_preview_falls_back_to_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let mut w = Wizard::new(FormModel::new(
        PatientId::generate("BC"),
        datetime(2040, 3, 1, 8, 0, 0, 0),
    ));
    while w.page() != Page::Imaging {
        w.next();
    }
    let missing = dir.path().join("nope.png");
    w.apply(FieldEdit::ImagePath(Some(missing)), date(2040, 3, 1))
        .unwrap();
    w.next();
    assert_eq!(w.submit().unwrap().image_preview(), ImagePreview::Placeholder);

    let present = dir.path().join("scan.png");
    std::fs::write(&present, b"png").unwrap();
    w.previous();
    w.apply(FieldEdit::ImagePath(Some(present.clone())), date(2040, 3, 1))
        .unwrap();
    w.next();
    assert_eq!(
        w.submit().unwrap().image_preview(),
        ImagePreview::Available(present)
    );
    assert_eq!(ImagePreview::placeholder_text(), "No Image Preview Available");
}

#[test]
fn ai_analysis_is_an_inert_stub() {
    let w = wizard_on_summary();
    let mut dialog = w.submit().unwrap();
    assert_eq!(dialog.ai_analysis().label(), "Run AI Analysis");
    assert!(dialog.ai_analysis().is_enabled());

    dialog.run_ai_analysis();
    assert_eq!(dialog.ai_analysis().label(), "Analyzing...");
    assert!(!dialog.ai_analysis().is_enabled());
    assert!(dialog.is_open());

    dialog.run_ai_analysis();
    assert_eq!(dialog.ai_analysis().label(), "Analyzing...");
}
