use thiserror::Error;

use crate::vocab::{BreastFinding, Side, Term};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("\"{}\" is not recorded for the {side} breast", finding.label())]
    FindingNotInVocabulary { side: Side, finding: BreastFinding },

    #[error("no {vocabulary} entry at position {position} (expected 1..={len})")]
    UnknownPosition {
        vocabulary: &'static str,
        position: usize,
        len: usize,
    },

    #[error("unrecognized {vocabulary}: {value}")]
    UnknownTerm {
        vocabulary: &'static str,
        value: String,
    },
}
