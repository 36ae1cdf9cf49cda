use bcd_core::models::FormModel;
use bcd_core::patient_id::PatientId;
use bcd_core::summary::{QuickPreview, SummaryView};
use bcd_core::vocab::Indicator;
use bcd_export::render::{NO_IMAGE_PREVIEW, render_preview, render_review, render_template};
use jiff::civil::datetime;

fn form() -> FormModel {
    FormModel::new(
        PatientId::generate("BC"),
        datetime(2025, 5, 2, 10, 30, 0, 0),
    )
}

#[test]
fn review_lists_sections_and_skips_empty_values() {
    let form = form();
    let text = render_review(&SummaryView::assemble(&form)).unwrap();

    assert!(text.starts_with("Review Your Submission"));
    assert!(text.contains("[ Patient Information ]"));
    assert!(text.contains(&format!("Patient ID: {}", form.patient.id())));
    assert!(text.contains("Contact: Not provided"));
    assert!(text.contains("Right Breast Findings: None"));
    // Empty name and study id are omitted entirely.
    assert!(!text.contains("Name/Code:"));
    assert!(!text.contains("Study ID:"));
    // No indicators checked: the section is skipped.
    assert!(!text.contains("Early Detection Indicators"));
}

#[test]
fn review_lists_indicators_as_bullets() {
    let mut form = form();
    form.indicators.toggle(Indicator::SuspiciousLymphNodes);
    let text = render_review(&SummaryView::assemble(&form)).unwrap();

    assert!(text.contains("[ Early Detection Indicators ]"));
    assert!(text.contains("\u{2022} Suspicious lymph nodes detected"));
}

#[test]
fn review_shows_placeholder_for_missing_image() {
    let mut form = form();
    form.imaging.image_path = Some("/definitely/not/here.png".into());
    let text = render_review(&SummaryView::assemble(&form)).unwrap();

    assert!(text.contains(NO_IMAGE_PREVIEW));
    assert!(text.contains("Image File: here.png"));
    assert!(!text.contains("/definitely/not/here.png"));
}

#[test]
fn review_shows_existing_image_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.png");
    std::fs::write(&path, b"bytes").unwrap();

    let mut form = form();
    form.imaging.image_path = Some(path.clone());
    let text = render_review(&SummaryView::assemble(&form)).unwrap();

    assert!(text.contains(&format!("Image preview: {}", path.display())));
    assert!(!text.contains(NO_IMAGE_PREVIEW));
}

#[test]
fn preview_reads_like_the_summary_page() {
    let mut form = form();
    form.patient.name = "Code-42".to_string();
    let text = render_preview(&QuickPreview::from_form(&form)).unwrap();

    assert!(text.contains(&format!("Patient: Code-42 (ID: {})", form.patient.id())));
    assert!(text.contains("Study: Not specified on 2025-05-02"));
    assert!(text.contains("Modality: Ultrasound"));
    assert!(text.contains("Findings: 0 total findings across both breasts"));
    assert!(text.contains("Indicators: 0 early detection indicators noted"));
    assert!(text.contains("Images: No images"));
}

#[test]
fn bad_template_is_a_parse_error() {
    let err = render_template("bad.txt", "{% for %}", &serde_json::json!({})).unwrap_err();
    assert!(matches!(err, bcd_export::error::ExportError::TemplateParse(_)));
}
