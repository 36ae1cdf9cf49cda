use std::path::PathBuf;

use jiff::civil::{Date, DateTime};

use bcd_core::error::CoreError;
use bcd_core::models::FormModel;
use bcd_core::vocab::{
    BreastFinding, Indicator, Laterality, MenopausalStatus, Modality, Sex, Side, Technique,
};

use crate::page::Page;

/// A single user edit to one form field.
///
/// Every edit belongs to exactly one page and is only accepted while that
/// page is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    /// Also recomputes age.
    DateOfBirth(Date),
    /// Manual age entry; leaves date of birth unchanged.
    Age(i32),
    Sex(Sex),
    MenopausalStatus(MenopausalStatus),
    Contact(String),

    StudyId(String),
    StudyDateTime(DateTime),
    Modality(Modality),
    ExamType(String),
    ToggleTechnique(Technique),
    Facility(String),
    Clinician(String),

    ToggleFinding(Side, BreastFinding),

    ToggleIndicator(Indicator),

    ImagePath(Option<PathBuf>),
    ImageType(Modality),
    Laterality(Laterality),
    ImageDateTime(DateTime),
    ReferenceId(String),
    Description(String),
}

impl FieldEdit {
    pub fn page(&self) -> Page {
        match self {
            FieldEdit::Name(_)
            | FieldEdit::DateOfBirth(_)
            | FieldEdit::Age(_)
            | FieldEdit::Sex(_)
            | FieldEdit::MenopausalStatus(_)
            | FieldEdit::Contact(_) => Page::PatientInfo,

            FieldEdit::StudyId(_)
            | FieldEdit::StudyDateTime(_)
            | FieldEdit::Modality(_)
            | FieldEdit::ExamType(_)
            | FieldEdit::ToggleTechnique(_)
            | FieldEdit::Facility(_)
            | FieldEdit::Clinician(_) => Page::VisitInfo,

            FieldEdit::ToggleFinding(..) => Page::Findings,

            FieldEdit::ToggleIndicator(_) => Page::Indicators,

            FieldEdit::ImagePath(_)
            | FieldEdit::ImageType(_)
            | FieldEdit::Laterality(_)
            | FieldEdit::ImageDateTime(_)
            | FieldEdit::ReferenceId(_)
            | FieldEdit::Description(_) => Page::Imaging,
        }
    }

    pub(crate) fn apply_to(self, form: &mut FormModel, today: Date) -> Result<(), CoreError> {
        match self {
            FieldEdit::Name(v) => form.patient.name = v,
            FieldEdit::DateOfBirth(dob) => form.patient.set_date_of_birth(dob, today),
            FieldEdit::Age(years) => form.patient.set_age(years),
            FieldEdit::Sex(v) => form.patient.sex = v,
            FieldEdit::MenopausalStatus(v) => form.patient.menopausal_status = v,
            FieldEdit::Contact(v) => form.patient.contact = v,

            FieldEdit::StudyId(v) => form.visit.study_id = v,
            FieldEdit::StudyDateTime(v) => form.visit.study_datetime = v,
            FieldEdit::Modality(v) => form.visit.modality = v,
            FieldEdit::ExamType(v) => form.visit.exam_type = v,
            FieldEdit::ToggleTechnique(t) => {
                form.visit.techniques.toggle(t);
            }
            FieldEdit::Facility(v) => form.visit.facility = v,
            FieldEdit::Clinician(v) => form.visit.clinician = v,

            FieldEdit::ToggleFinding(side, finding) => {
                form.findings.toggle(side, finding)?;
            }

            FieldEdit::ToggleIndicator(i) => {
                form.indicators.toggle(i);
            }

            FieldEdit::ImagePath(v) => form.imaging.image_path = v,
            FieldEdit::ImageType(v) => form.imaging.image_type = v,
            FieldEdit::Laterality(v) => form.imaging.laterality = v,
            FieldEdit::ImageDateTime(v) => form.imaging.image_datetime = v,
            FieldEdit::ReferenceId(v) => form.imaging.reference_id = v,
            FieldEdit::Description(v) => form.imaging.description = v,
        }
        Ok(())
    }
}
