use jiff::ToSpan;
use jiff::civil::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Findings, ImagingRecord, PatientInfo, VisitInfo};
use crate::patient_id::PatientId;
use crate::vocab::{Checklist, Indicator};

/// Age the date-of-birth field starts at.
pub const DEFAULT_AGE_YEARS: i16 = 40;

/// The in-progress screening record.
///
/// Created empty at session start and edited in place while the user moves
/// between pages. Nothing is committed per page: the summary and the report
/// always read the current state of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormModel {
    pub patient: PatientInfo,
    pub visit: VisitInfo,
    pub findings: Findings,
    pub indicators: Checklist<Indicator>,
    pub imaging: ImagingRecord,
}

impl FormModel {
    /// Fresh form for a session that started at `now`.
    pub fn new(patient_id: PatientId, now: DateTime) -> Self {
        let today = now.date();
        let now = today.at(now.hour(), now.minute(), 0, 0);
        let date_of_birth = today
            .checked_sub(DEFAULT_AGE_YEARS.years())
            .unwrap_or(today);

        Self {
            patient: PatientInfo::new(patient_id, date_of_birth, today),
            visit: VisitInfo::new(now),
            findings: Findings::default(),
            indicators: Checklist::new(),
            imaging: ImagingRecord::new(now),
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
