use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::vocab::{BreastFinding, Checklist, Side};

/// Examination findings for both breasts. Each side only accepts the terms
/// of its own vocabulary (see [`Side::vocabulary`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    right: Checklist<BreastFinding>,
    left: Checklist<BreastFinding>,
}

impl Findings {
    pub fn side(&self, side: Side) -> &Checklist<BreastFinding> {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }

    /// Flip a finding on one side and return its new state.
    pub fn toggle(&mut self, side: Side, finding: BreastFinding) -> Result<bool, CoreError> {
        if !side.allows(finding) {
            return Err(CoreError::FindingNotInVocabulary { side, finding });
        }
        let list = match side {
            Side::Right => &mut self.right,
            Side::Left => &mut self.left,
        };
        Ok(list.toggle(finding))
    }

    /// Total checked findings across both breasts.
    pub fn total(&self) -> usize {
        self.right.count() + self.left.count()
    }
}
