use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use bcd_core::summary::SummaryView;
use bcd_export::error::ExportError;
use bcd_export::pdf::{ReportWriter, report_file_name};
use bcd_export::render::NO_IMAGE_PREVIEW;

/// Turns a confirmed summary into a report file.
pub trait ReportGenerator {
    type Error: std::error::Error;

    fn generate(&self, summary: &SummaryView, destination: &Path) -> Result<(), Self::Error>;
}

impl ReportGenerator for ReportWriter {
    type Error = ExportError;

    fn generate(&self, summary: &SummaryView, destination: &Path) -> Result<(), ExportError> {
        self.write(summary, destination)
    }
}

/// How a review dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Back to the wizard with all data untouched.
    Edit,
    /// A report was generated; this is the final submission.
    Submitted { report: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePreview {
    Available(PathBuf),
    Placeholder,
}

impl ImagePreview {
    pub fn placeholder_text() -> &'static str {
        NO_IMAGE_PREVIEW
    }
}

/// "Run AI Analysis" control. There is no analysis behind it: pressing it
/// only relabels and disables the control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiAnalysisControl {
    label: &'static str,
    enabled: bool,
}

impl Default for AiAnalysisControl {
    fn default() -> Self {
        Self {
            label: "Run AI Analysis",
            enabled: true,
        }
    }
}

impl AiAnalysisControl {
    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn press(&mut self) {
        if !self.enabled {
            return;
        }
        self.label = "Analyzing...";
        self.enabled = false;
        info!("starting AI analysis on image");
    }
}

/// Final review of an assembled summary before the report is produced.
#[derive(Debug, Clone)]
pub struct ReviewDialog {
    summary: SummaryView,
    ai_analysis: AiAnalysisControl,
    outcome: Option<ReviewOutcome>,
}

impl ReviewDialog {
    pub fn new(summary: SummaryView) -> Self {
        let dialog = Self {
            summary,
            ai_analysis: AiAnalysisControl::default(),
            outcome: None,
        };
        if let (ImagePreview::Placeholder, Some(path)) =
            (dialog.image_preview(), dialog.summary.imaging.path.as_deref())
        {
            warn!(path = %path.display(), "image not found, showing placeholder");
        }
        dialog
    }

    pub fn summary(&self) -> &SummaryView {
        &self.summary
    }

    pub fn ai_analysis(&self) -> &AiAnalysisControl {
        &self.ai_analysis
    }

    pub fn run_ai_analysis(&mut self) {
        self.ai_analysis.press();
    }

    pub fn is_open(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<&ReviewOutcome> {
        self.outcome.as_ref()
    }

    /// Image preview, or a placeholder when the referenced file is absent.
    pub fn image_preview(&self) -> ImagePreview {
        match self.summary.imaging.path.as_deref() {
            Some(path) if path.is_file() => ImagePreview::Available(path.to_path_buf()),
            _ => ImagePreview::Placeholder,
        }
    }

    /// `Report_{patient_id}.pdf`.
    pub fn default_file_name(&self) -> String {
        report_file_name(&self.summary)
    }

    /// Close the dialog and go back to editing.
    pub fn edit(&mut self) -> ReviewOutcome {
        let outcome = ReviewOutcome::Edit;
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Produce the report. Success closes the dialog as a submission; on
    /// failure the dialog stays open so the user can retry.
    pub fn generate_report<G: ReportGenerator>(
        &mut self,
        generator: &G,
        destination: &Path,
    ) -> Result<ReviewOutcome, G::Error> {
        match generator.generate(&self.summary, destination) {
            Ok(()) => {
                info!(path = %destination.display(), "report generated");
                let outcome = ReviewOutcome::Submitted {
                    report: destination.to_path_buf(),
                };
                self.outcome = Some(outcome.clone());
                Ok(outcome)
            }
            Err(e) => {
                error!(path = %destination.display(), error = %e, "report generation failed");
                Err(e)
            }
        }
    }
}
