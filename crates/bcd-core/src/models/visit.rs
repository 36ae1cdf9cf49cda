use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::vocab::{Checklist, Modality, Technique};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitInfo {
    /// Study id / accession number.
    pub study_id: String,
    pub study_datetime: DateTime,
    pub modality: Modality,
    /// Free text, e.g. "Screening" or "Diagnostic".
    pub exam_type: String,
    pub techniques: Checklist<Technique>,
    pub facility: String,
    pub clinician: String,
}

impl VisitInfo {
    pub fn new(study_datetime: DateTime) -> Self {
        Self {
            study_id: String::new(),
            study_datetime,
            modality: Modality::default(),
            exam_type: String::new(),
            techniques: Checklist::new(),
            facility: String::new(),
            clinician: String::new(),
        }
    }
}
