//! Fixed vocabularies used by the screening form.
//!
//! Every enum lists its variants in display order; `Ord` follows declaration
//! order so a [`Checklist`] always yields its labels in that order, no matter
//! in which order the flags were toggled.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A closed vocabulary entry with a display label.
pub trait Term: Copy + Ord + 'static {
    /// Vocabulary name used in error messages.
    const VOCABULARY: &'static str;

    fn all() -> &'static [Self];

    fn label(self) -> &'static str;

    /// Look up an entry by its 1-based display position.
    fn at_position(position: usize) -> Result<Self, CoreError> {
        let all = Self::all();
        position
            .checked_sub(1)
            .and_then(|i| all.get(i).copied())
            .ok_or(CoreError::UnknownPosition {
                vocabulary: Self::VOCABULARY,
                position,
                len: all.len(),
            })
    }

    /// Case-insensitive match against the label, or against the first
    /// whitespace/hyphen separated word of it ("pre" matches "Pre-menopause").
    fn parse_label(value: &str) -> Result<Self, CoreError> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|t| {
                let label = t.label().to_ascii_lowercase();
                label == wanted
                    || label
                        .split(|c: char| c == '-' || c.is_whitespace())
                        .next()
                        .is_some_and(|first| first == wanted)
            })
            .ok_or_else(|| CoreError::UnknownTerm {
                vocabulary: Self::VOCABULARY,
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreastFinding {
    RetroareolarDuctDilatation,
    EchogenicDuctContent,
    DuctEctasia,
    SolidMassPresent,
    SkinThickening,
    NippleRetraction,
    ArchitecturalDistortion,
    MammillaryLymphadenopathy,
    AxillaryLymphadenopathy,
}

const RIGHT_FINDINGS: &[BreastFinding] = &[
    BreastFinding::RetroareolarDuctDilatation,
    BreastFinding::EchogenicDuctContent,
    BreastFinding::DuctEctasia,
    BreastFinding::SolidMassPresent,
    BreastFinding::SkinThickening,
    BreastFinding::NippleRetraction,
    BreastFinding::ArchitecturalDistortion,
    BreastFinding::MammillaryLymphadenopathy,
    BreastFinding::AxillaryLymphadenopathy,
];

// The left-breast form has never offered duct ectasia.
const LEFT_FINDINGS: &[BreastFinding] = &[
    BreastFinding::RetroareolarDuctDilatation,
    BreastFinding::EchogenicDuctContent,
    BreastFinding::SolidMassPresent,
    BreastFinding::SkinThickening,
    BreastFinding::NippleRetraction,
    BreastFinding::ArchitecturalDistortion,
    BreastFinding::MammillaryLymphadenopathy,
    BreastFinding::AxillaryLymphadenopathy,
];

impl Term for BreastFinding {
    const VOCABULARY: &'static str = "breast finding";

    fn all() -> &'static [Self] {
        RIGHT_FINDINGS
    }

    fn label(self) -> &'static str {
        match self {
            Self::RetroareolarDuctDilatation => "Retroareolar duct dilatation",
            Self::EchogenicDuctContent => "Echogenic duct content",
            Self::DuctEctasia => "Duct ectasia",
            Self::SolidMassPresent => "Solid mass present",
            Self::SkinThickening => "Skin thickening",
            Self::NippleRetraction => "Nipple retraction",
            Self::ArchitecturalDistortion => "Architectural distortion",
            Self::MammillaryLymphadenopathy => "Mammillary lymphadenopathy",
            Self::AxillaryLymphadenopathy => "Axillary lymphadenopathy",
        }
    }
}

/// Which breast a set of findings belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Right,
    Left,
}

impl Side {
    /// The findings offered for this side, in display order.
    pub fn vocabulary(self) -> &'static [BreastFinding] {
        match self {
            Side::Right => RIGHT_FINDINGS,
            Side::Left => LEFT_FINDINGS,
        }
    }

    pub fn allows(self, finding: BreastFinding) -> bool {
        self.vocabulary().contains(&finding)
    }

    /// 1-based lookup within this side's vocabulary.
    pub fn finding_at(self, position: usize) -> Result<BreastFinding, CoreError> {
        let vocabulary = self.vocabulary();
        position
            .checked_sub(1)
            .and_then(|i| vocabulary.get(i).copied())
            .ok_or(CoreError::UnknownPosition {
                vocabulary: match self {
                    Side::Right => "right breast finding",
                    Side::Left => "left breast finding",
                },
                position,
                len: vocabulary.len(),
            })
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Right => f.write_str("right"),
            Side::Left => f.write_str("left"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    SuspiciousMass,
    SuspiciousLymphNodes,
    SkinOrNippleAbnormality,
    PreviousExamAvailable,
    ChangeSincePreviousExam,
    StabilityOverTime,
}

impl Term for Indicator {
    const VOCABULARY: &'static str = "indicator";

    fn all() -> &'static [Self] {
        &[
            Self::SuspiciousMass,
            Self::SuspiciousLymphNodes,
            Self::SkinOrNippleAbnormality,
            Self::PreviousExamAvailable,
            Self::ChangeSincePreviousExam,
            Self::StabilityOverTime,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::SuspiciousMass => "Suspicious mass detected",
            Self::SuspiciousLymphNodes => "Suspicious lymph nodes detected",
            Self::SkinOrNippleAbnormality => "Skin or nipple abnormality detected",
            Self::PreviousExamAvailable => "Previous examination available",
            Self::ChangeSincePreviousExam => "Change compared to previous exam",
            Self::StabilityOverTime => "Stability over time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Radial,
    AntiRadial,
    Other,
}

impl Term for Technique {
    const VOCABULARY: &'static str = "technique";

    fn all() -> &'static [Self] {
        &[Self::Radial, Self::AntiRadial, Self::Other]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Radial => "Radial",
            Self::AntiRadial => "Anti-radial",
            Self::Other => "Other",
        }
    }
}

/// Imaging technique. Also used as the image type of an imaging record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    #[default]
    Ultrasound,
    Mammography,
    Mri,
}

impl Term for Modality {
    const VOCABULARY: &'static str = "modality";

    fn all() -> &'static [Self] {
        &[Self::Ultrasound, Self::Mammography, Self::Mri]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ultrasound => "Ultrasound",
            Self::Mammography => "Mammography",
            Self::Mri => "MRI",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Laterality {
    #[default]
    Right,
    Left,
    Bilateral,
}

impl Term for Laterality {
    const VOCABULARY: &'static str = "laterality";

    fn all() -> &'static [Self] {
        &[Self::Right, Self::Left, Self::Bilateral]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Bilateral => "Bilateral",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenopausalStatus {
    #[default]
    PreMenopause,
    PostMenopause,
    Unknown,
}

impl Term for MenopausalStatus {
    const VOCABULARY: &'static str = "menopausal status";

    fn all() -> &'static [Self] {
        &[Self::PreMenopause, Self::PostMenopause, Self::Unknown]
    }

    fn label(self) -> &'static str {
        match self {
            Self::PreMenopause => "Pre-menopause",
            Self::PostMenopause => "Post-menopause",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Female,
}

impl Term for Sex {
    const VOCABULARY: &'static str = "sex";

    fn all() -> &'static [Self] {
        &[Self::Female]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
        }
    }
}

macro_rules! from_str_via_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromStr for $ty {
                type Err = CoreError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Term>::parse_label(s)
                }
            }
        )*
    };
}

from_str_via_label!(Modality, Laterality, MenopausalStatus, Sex);

/// An independent set of boolean flags over a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de> + Ord"
))]
pub struct Checklist<T: Ord> {
    checked: BTreeSet<T>,
}

impl<T: Ord> Default for Checklist<T> {
    fn default() -> Self {
        Self {
            checked: BTreeSet::new(),
        }
    }
}

impl<T: Term> Checklist<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a flag and return its new state.
    pub fn toggle(&mut self, term: T) -> bool {
        if self.checked.remove(&term) {
            false
        } else {
            self.checked.insert(term);
            true
        }
    }

    pub fn is_checked(&self, term: T) -> bool {
        self.checked.contains(&term)
    }

    pub fn count(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Checked terms in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.checked.iter().copied()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.iter().map(Term::label).collect()
    }

    /// Comma-joined labels, or `sentinel` when nothing is checked.
    pub fn joined_or(&self, sentinel: &str) -> String {
        if self.is_empty() {
            sentinel.to_string()
        } else {
            self.labels().join(", ")
        }
    }
}
