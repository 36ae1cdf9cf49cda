//! Display-ready projection of the form.
//!
//! [`SummaryView`] is what both the review step and the report consume. It
//! is assembled fresh from a [`FormModel`] each time and never written back.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::FormModel;
use crate::vocab::{Side, Term};

pub const PATIENT_INFO_TITLE: &str = "Patient Information";
pub const VISIT_INFO_TITLE: &str = "Visit/Study Information";
pub const FINDINGS_TITLE: &str = "Breast Examination Findings";
pub const INDICATORS_TITLE: &str = "Early Detection Indicators";
pub const IMAGING_TITLE: &str = "Imaging Data";

pub const PATIENT_ID_LABEL: &str = "Patient ID";
pub const RIGHT_FINDINGS_LABEL: &str = "Right Breast Findings";
pub const LEFT_FINDINGS_LABEL: &str = "Left Breast Findings";
pub const IMAGE_TYPE_LABEL: &str = "Image Type";
pub const DESCRIPTION_LABEL: &str = "Description";

pub const NOT_PROVIDED: &str = "Not provided";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NONE: &str = "None";
pub const NONE_SPECIFIED: &str = "None specified";

/// Preview length of the imaging description, in characters.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingSummary {
    pub fields: Vec<Field>,
    /// Referenced image, if one was selected. Not a display field.
    pub path: Option<PathBuf>,
    /// Untruncated description for consumers that want all of it.
    pub full_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
    pub patient_info: Vec<Field>,
    pub visit_info: Vec<Field>,
    pub findings: Vec<Field>,
    pub indicators: Vec<String>,
    pub imaging: ImagingSummary,
}

/// One titled section of a [`SummaryView`], in display order.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub title: &'static str,
    pub content: SectionContent<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum SectionContent<'a> {
    Fields(&'a [Field]),
    List(&'a [String]),
    Imaging(&'a ImagingSummary),
}

impl Section<'_> {
    pub fn is_empty(&self) -> bool {
        match self.content {
            SectionContent::Fields(fields) => fields.is_empty(),
            SectionContent::List(items) => items.is_empty(),
            SectionContent::Imaging(imaging) => imaging.fields.is_empty() && imaging.path.is_none(),
        }
    }
}

impl SummaryView {
    pub fn assemble(form: &FormModel) -> Self {
        let patient = &form.patient;
        let visit = &form.visit;
        let imaging = &form.imaging;

        let patient_info = vec![
            Field::new(PATIENT_ID_LABEL, patient.id().as_str()),
            Field::new("Name/Code", patient.name.as_str()),
            Field::new(
                "Date of Birth",
                patient.date_of_birth().strftime(DATE_FORMAT).to_string(),
            ),
            Field::new("Age", patient.age().to_string()),
            Field::new("Sex", patient.sex.label()),
            Field::new("Menopausal Status", patient.menopausal_status.label()),
            Field::new("Contact", or_sentinel(&patient.contact, NOT_PROVIDED)),
        ];

        let visit_info = vec![
            Field::new("Study ID", visit.study_id.as_str()),
            Field::new(
                "Study Date",
                visit.study_datetime.strftime(DATETIME_FORMAT).to_string(),
            ),
            Field::new("Imaging Modality", visit.modality.label()),
            Field::new("Examination Type", visit.exam_type.as_str()),
            Field::new("Techniques", visit.techniques.joined_or(NONE_SPECIFIED)),
            Field::new("Health Facility", visit.facility.as_str()),
            Field::new("Reporting Clinician", visit.clinician.as_str()),
        ];

        let findings = vec![
            Field::new(
                RIGHT_FINDINGS_LABEL,
                form.findings.side(Side::Right).joined_or(NONE),
            ),
            Field::new(
                LEFT_FINDINGS_LABEL,
                form.findings.side(Side::Left).joined_or(NONE),
            ),
        ];

        let indicators = form
            .indicators
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect();

        let imaging = ImagingSummary {
            fields: vec![
                Field::new(IMAGE_TYPE_LABEL, imaging.image_type.label()),
                Field::new("Laterality", imaging.laterality.label()),
                Field::new(
                    "Image Date",
                    imaging.image_datetime.strftime(DATETIME_FORMAT).to_string(),
                ),
                Field::new("Image Reference ID", imaging.reference_id.as_str()),
                Field::new("Image File", imaging.file_label()),
                Field::new(DESCRIPTION_LABEL, truncate_description(&imaging.description)),
            ],
            path: imaging.image_path.clone(),
            full_description: imaging.description.clone(),
        };

        Self {
            patient_info,
            visit_info,
            findings,
            indicators,
            imaging,
        }
    }

    /// All sections in display order, including empty ones.
    pub fn sections(&self) -> [Section<'_>; 5] {
        [
            Section {
                title: PATIENT_INFO_TITLE,
                content: SectionContent::Fields(&self.patient_info),
            },
            Section {
                title: VISIT_INFO_TITLE,
                content: SectionContent::Fields(&self.visit_info),
            },
            Section {
                title: FINDINGS_TITLE,
                content: SectionContent::Fields(&self.findings),
            },
            Section {
                title: INDICATORS_TITLE,
                content: SectionContent::List(&self.indicators),
            },
            Section {
                title: IMAGING_TITLE,
                content: SectionContent::Imaging(&self.imaging),
            },
        ]
    }

    /// Look up a field value by label across the field sections.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.patient_info
            .iter()
            .chain(&self.visit_info)
            .chain(&self.findings)
            .chain(&self.imaging.fields)
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.field(PATIENT_ID_LABEL).filter(|id| !id.is_empty())
    }

    pub fn image_type(&self) -> Option<&str> {
        self.imaging
            .fields
            .iter()
            .find(|f| f.label == IMAGE_TYPE_LABEL)
            .map(|f| f.value.as_str())
            .filter(|v| !v.is_empty())
    }
}

/// First [`DESCRIPTION_PREVIEW_CHARS`] characters, with `...` appended only
/// when something was cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

fn or_sentinel(value: &str, sentinel: &str) -> String {
    if value.is_empty() {
        sentinel.to_string()
    } else {
        value.to_string()
    }
}

/// Short overview shown on the last wizard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPreview {
    pub patient_name: String,
    pub patient_id: String,
    pub study_id: String,
    pub study_date: String,
    pub modality: String,
    pub findings_count: usize,
    pub indicators_count: usize,
    pub images: String,
}

impl QuickPreview {
    pub fn from_form(form: &FormModel) -> Self {
        let image_label = match form.imaging.image_path {
            Some(_) => form.imaging.file_label(),
            None => "No images".to_string(),
        };

        Self {
            patient_name: or_sentinel(&form.patient.name, "Anonymous"),
            patient_id: or_sentinel(form.patient.id().as_str(), NOT_SPECIFIED),
            study_id: or_sentinel(&form.visit.study_id, NOT_SPECIFIED),
            study_date: form.visit.study_datetime.strftime(DATE_FORMAT).to_string(),
            modality: form.visit.modality.label().to_string(),
            findings_count: form.findings.total(),
            indicators_count: form.indicators.count(),
            images: image_label,
        }
    }
}
