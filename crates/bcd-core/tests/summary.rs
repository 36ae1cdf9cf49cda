use bcd_core::models::FormModel;
use bcd_core::patient_id::PatientId;
use bcd_core::summary::{QuickPreview, SectionContent, SummaryView, truncate_description};
use bcd_core::vocab::{BreastFinding, Indicator, Side, Technique};
use jiff::civil::datetime;

fn form() -> FormModel {
    FormModel::new(
        PatientId::generate("BC"),
        datetime(2040, 1, 10, 14, 5, 0, 0),
    )
}

#[test]
fn empty_checklists_use_sentinels() {
    let summary = SummaryView::assemble(&form());
    assert_eq!(summary.field("Right Breast Findings"), Some("None"));
    assert_eq!(summary.field("Left Breast Findings"), Some("None"));
    assert_eq!(summary.field("Techniques"), Some("None specified"));
    assert_eq!(summary.field("Contact"), Some("Not provided"));
    assert!(summary.indicators.is_empty());
}

#[test]
fn labels_follow_vocabulary_order_not_toggle_order() {
    let mut form = form();
    form.findings.toggle(Side::Right, BreastFinding::AxillaryLymphadenopathy).unwrap();
    form.findings.toggle(Side::Right, BreastFinding::RetroareolarDuctDilatation).unwrap();
    form.indicators.toggle(Indicator::StabilityOverTime);
    form.indicators.toggle(Indicator::SuspiciousMass);
    form.visit.techniques.toggle(Technique::Other);
    form.visit.techniques.toggle(Technique::Radial);

    let summary = SummaryView::assemble(&form);
    assert_eq!(
        summary.field("Right Breast Findings"),
        Some("Retroareolar duct dilatation, Axillary lymphadenopathy")
    );
    assert_eq!(summary.field("Left Breast Findings"), Some("None"));
    assert_eq!(summary.field("Techniques"), Some("Radial, Other"));
    assert_eq!(
        summary.indicators,
        vec!["Suspicious mass detected", "Stability over time"]
    );
}

#[test]
fn toggle_round_trip_restores_summary() {
    let mut form = form();
    let before = SummaryView::assemble(&form);
    form.findings.toggle(Side::Left, BreastFinding::NippleRetraction).unwrap();
    assert_ne!(SummaryView::assemble(&form), before);
    form.findings.toggle(Side::Left, BreastFinding::NippleRetraction).unwrap();
    assert_eq!(SummaryView::assemble(&form), before);
}

#[test]
fn long_description_is_truncated_for_preview_only() {
    let mut form = form();
    let text = "x".repeat(150);
    form.imaging.description = text.clone();

    let summary = SummaryView::assemble(&form);
    let preview = summary.field("Description").unwrap();
    assert_eq!(preview, format!("{}...", "x".repeat(100)));
    assert_eq!(summary.imaging.full_description, text);
    assert_eq!(form.imaging.description.chars().count(), 150);
}

#[test]
fn truncation_counts_characters_not_bytes() {
    assert_eq!(truncate_description(&"é".repeat(100)), "é".repeat(100));
    assert_eq!(
        truncate_description(&"é".repeat(101)),
        format!("{}...", "é".repeat(100))
    );
    assert_eq!(truncate_description(""), "");
}

#[test]
fn dates_are_formatted_for_display() {
    let summary = SummaryView::assemble(&form());
    assert_eq!(summary.field("Date of Birth"), Some("2000-01-10"));
    assert_eq!(summary.field("Age"), Some("40"));
    assert_eq!(summary.field("Study Date"), Some("2040-01-10 14:05"));
    assert_eq!(summary.field("Image Date"), Some("2040-01-10 14:05"));
}

#[test]
fn imaging_keeps_path_out_of_display_fields() {
    let mut form = form();
    form.imaging.image_path = Some("/data/scans/left_cc.png".into());
    let summary = SummaryView::assemble(&form);

    assert_eq!(summary.field("Image File"), Some("left_cc.png"));
    assert_eq!(summary.imaging.path.as_deref(), Some(std::path::Path::new("/data/scans/left_cc.png")));
    assert!(summary.imaging.fields.iter().all(|f| f.label != "path"));
}

#[test]
fn sections_are_in_display_order() {
    let summary = SummaryView::assemble(&form());
    let titles: Vec<_> = summary.sections().iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        [
            "Patient Information",
            "Visit/Study Information",
            "Breast Examination Findings",
            "Early Detection Indicators",
            "Imaging Data",
        ]
    );
    let indicators = summary.sections()[3];
    assert!(matches!(indicators.content, SectionContent::List(_)));
    assert!(indicators.is_empty());
}

#[test]
fn assembling_twice_is_identical() {
    let form = form();
    assert_eq!(SummaryView::assemble(&form), SummaryView::assemble(&form));
    assert_eq!(QuickPreview::from_form(&form), QuickPreview::from_form(&form));
}

#[test]
fn quick_preview_counts_and_sentinels() {
    let mut form = form();
    form.findings.toggle(Side::Right, BreastFinding::SolidMassPresent).unwrap();
    form.findings.toggle(Side::Left, BreastFinding::SolidMassPresent).unwrap();
    form.indicators.toggle(Indicator::SuspiciousMass);

    let preview = QuickPreview::from_form(&form);
    assert_eq!(preview.patient_name, "Anonymous");
    assert_eq!(preview.study_id, "Not specified");
    assert_eq!(preview.study_date, "2040-01-10");
    assert_eq!(preview.modality, "Ultrasound");
    assert_eq!(preview.findings_count, 2);
    assert_eq!(preview.indicators_count, 1);
    assert_eq!(preview.images, "No images");
}
