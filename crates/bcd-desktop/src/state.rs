use bcd_export::pdf::ReportWriter;
use bcd_export::styles::DocumentStyles;
use bcd_wizard::{ReviewDialog, Wizard};

use crate::config::BcdConfig;

/// Everything one terminal session owns.
pub struct DesktopState {
    pub wizard: Wizard,
    /// Open review dialog, if any. While set, only review commands apply.
    pub review: Option<ReviewDialog>,
    pub config: BcdConfig,
    pub writer: ReportWriter,
}

impl DesktopState {
    pub fn new(config: BcdConfig) -> Self {
        Self::with_wizard(Wizard::start(&config.patient_id_prefix), config)
    }

    pub fn with_wizard(wizard: Wizard, config: BcdConfig) -> Self {
        let writer = ReportWriter::new(DocumentStyles::default(), config.letterhead.clone());
        Self {
            wizard,
            review: None,
            config,
            writer,
        }
    }
}
