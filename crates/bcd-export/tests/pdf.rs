use std::path::Path;

use bcd_core::models::FormModel;
use bcd_core::patient_id::PatientId;
use bcd_core::summary::SummaryView;
use bcd_core::vocab::{BreastFinding, Side};
use bcd_export::error::ExportError;
use bcd_export::pdf::{ReportWriter, default_destination, report_file_name};
use jiff::civil::datetime;
use printpdf::image_crate::{Rgb, RgbImage};

fn form() -> FormModel {
    FormModel::new(
        PatientId::generate("BC"),
        datetime(2025, 5, 2, 10, 30, 0, 0),
    )
}

/// Deterministic noise so the embedded image does not compress away.
fn write_noise_png(path: &Path) {
    let mut state: u32 = 0x1234_5678;
    let img = RgbImage::from_fn(96, 64, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    });
    img.save(path).unwrap();
}

fn occurrences(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, w)| *w == needle)
        .map(|(i, _)| i)
        .collect()
}

/// Page count from the page tree's `/Count` entry.
fn page_count(pdf: &[u8]) -> usize {
    occurrences(pdf, b"/Count")
        .into_iter()
        .filter_map(|at| {
            let digits: String = pdf[at + b"/Count".len()..]
                .iter()
                .map(|&b| b as char)
                .skip_while(|c| c.is_whitespace())
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse().ok()
        })
        .max()
        .unwrap_or(0)
}

fn image_xobjects(pdf: &[u8]) -> usize {
    occurrences(pdf, b"/Subtype/Image").len() + occurrences(pdf, b"/Subtype /Image").len()
}

#[test]
fn renders_a_pdf_document() {
    let summary = SummaryView::assemble(&form());
    let bytes = ReportWriter::default().render(&summary).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn default_file_name_uses_patient_id() {
    let form = form();
    let summary = SummaryView::assemble(&form);
    assert_eq!(
        report_file_name(&summary),
        format!("Report_{}.pdf", form.patient.id())
    );
    assert_eq!(
        default_destination(Path::new("/reports"), &summary),
        Path::new("/reports").join(format!("Report_{}.pdf", form.patient.id()))
    );
}

#[test]
fn writes_report_to_destination() {
    let dir = tempfile::tempdir().unwrap();
    let summary = SummaryView::assemble(&form());
    let dest = default_destination(dir.path(), &summary);

    ReportWriter::default().write(&summary, &dest).unwrap();

    let written = std::fs::read(&dest).unwrap();
    assert!(written.starts_with(b"%PDF"));
    // Only the report itself is left in the directory.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn missing_image_is_skipped_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut form = form();
    form.imaging.image_path = Some(dir.path().join("gone.png"));
    let with_missing = SummaryView::assemble(&form);
    form.imaging.image_path = None;
    let without = SummaryView::assemble(&form);

    let writer = ReportWriter::default();
    let a = writer.render(&with_missing).unwrap();
    let b = writer.render(&without).unwrap();
    assert!(a.starts_with(b"%PDF"));
    assert_eq!(image_xobjects(&a), 0);
    assert_eq!(image_xobjects(&b), 0);
    assert_eq!(page_count(&a), page_count(&b));
}

#[test]
fn existing_image_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("scan.png");
    write_noise_png(&image_path);

    let mut form = form();
    let plain = ReportWriter::default()
        .render(&SummaryView::assemble(&form))
        .unwrap();

    form.imaging.image_path = Some(image_path);
    let with_image = ReportWriter::default()
        .render(&SummaryView::assemble(&form))
        .unwrap();

    assert_eq!(image_xobjects(&plain), 0);
    assert_eq!(image_xobjects(&with_image), 1);
}

#[test]
fn undecodable_image_is_a_reported_failure() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("broken.png");
    std::fs::write(&image_path, b"not an image").unwrap();

    let mut form = form();
    form.imaging.image_path = Some(image_path);
    let summary = SummaryView::assemble(&form);
    let dest = dir.path().join("report.pdf");

    let err = ReportWriter::default().write(&summary, &dest).unwrap_err();
    assert!(matches!(err, ExportError::Image { .. }), "{err}");
    assert!(!dest.exists());
}

#[test]
fn unwritable_destination_is_a_reported_failure() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("no-such-dir").join("report.pdf");
    let summary = SummaryView::assemble(&form());

    let err = ReportWriter::default().write(&summary, &dest).unwrap_err();
    assert!(matches!(err, ExportError::Write { .. }), "{err}");
    assert!(!dest.exists());
}

#[test]
fn long_content_flows_onto_more_pages() {
    let mut long_form = form();
    long_form.patient.name = "word ".repeat(3_000);
    long_form.patient.contact = "x".repeat(2_000);
    for &finding in Side::Right.vocabulary() {
        long_form.findings.toggle(Side::Right, finding).unwrap();
    }
    long_form.findings
        .toggle(Side::Left, BreastFinding::SolidMassPresent)
        .unwrap();

    let short = ReportWriter::default()
        .render(&SummaryView::assemble(&form()))
        .unwrap();
    let long = ReportWriter::default()
        .render(&SummaryView::assemble(&long_form))
        .unwrap();
    assert!(long.starts_with(b"%PDF"));
    assert_eq!(page_count(&short), 1);
    assert!(page_count(&long) > 1, "{} pages", page_count(&long));
}
