use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::age;
use crate::patient_id::PatientId;
use crate::vocab::{MenopausalStatus, Sex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    /// Assigned once when the session starts; there is no setter.
    id: PatientId,
    /// Name or anonymous code.
    pub name: String,
    date_of_birth: Date,
    age: u8,
    pub sex: Sex,
    pub menopausal_status: MenopausalStatus,
    pub contact: String,
}

impl PatientInfo {
    pub fn new(id: PatientId, date_of_birth: Date, today: Date) -> Self {
        Self {
            id,
            name: String::new(),
            date_of_birth,
            age: age::age_from_birth_year(date_of_birth, today),
            sex: Sex::default(),
            menopausal_status: MenopausalStatus::default(),
            contact: String::new(),
        }
    }

    pub fn id(&self) -> &PatientId {
        &self.id
    }

    pub fn date_of_birth(&self) -> Date {
        self.date_of_birth
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    /// Set the date of birth and recompute age from it.
    pub fn set_date_of_birth(&mut self, date_of_birth: Date, today: Date) {
        self.date_of_birth = date_of_birth;
        self.age = age::age_from_birth_year(date_of_birth, today);
    }

    /// Manual age entry. Leaves the date of birth alone.
    pub fn set_age(&mut self, years: i32) {
        self.age = age::clamp_age(years);
    }
}
