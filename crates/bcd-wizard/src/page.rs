use std::fmt;

use serde::{Deserialize, Serialize};

/// Wizard pages in order. Five data pages, then the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    PatientInfo,
    VisitInfo,
    Findings,
    Indicators,
    Imaging,
    Summary,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::PatientInfo,
        Page::VisitInfo,
        Page::Findings,
        Page::Indicators,
        Page::Imaging,
        Page::Summary,
    ];

    /// 0-based position.
    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based position, as shown in the progress bar.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn from_index(index: usize) -> Option<Page> {
        Self::ALL.get(index).copied()
    }

    /// Page reached by `Next`, if any.
    pub fn next(self) -> Option<Page> {
        Self::from_index(self.index() + 1)
    }

    /// Page reached by `Previous`, if any.
    pub fn previous(self) -> Option<Page> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::PatientInfo => "1. Patient Information",
            Page::VisitInfo => "2. Visit / Study Information",
            Page::Findings => "3. Breast Examination Findings",
            Page::Indicators => "4. Early Detection Indicators",
            Page::Imaging => "5. Loading / Imaging Module",
            Page::Summary => "Data Summary Preview",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
