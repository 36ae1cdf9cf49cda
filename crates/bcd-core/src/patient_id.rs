//! Human-readable patient identifiers: `{prefix}-{YYYYMMDD}-{XXXX}`.
//!
//! The four-character suffix is random; there is no collision check, so two
//! sessions started on the same day can in principle receive the same id.

use std::fmt;

use jiff::civil::Date;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFIX: &str = "BC";

const SUFFIX_LEN: usize = 4;
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Generate an id for today's local date using the thread RNG.
    pub fn generate(prefix: &str) -> Self {
        let today = jiff::Zoned::now().date();
        Self::generate_with(prefix, today, &mut rand::thread_rng())
    }

    /// Deterministic variant: caller supplies the date and the RNG.
    pub fn generate_with<R: Rng + ?Sized>(prefix: &str, date: Date, rng: &mut R) -> Self {
        let prefix = sanitize_prefix(prefix);
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())]))
            .collect();
        Self(format!("{prefix}-{}-{suffix}", date.strftime("%Y%m%d")))
    }

    /// Whether `value` has the `{prefix}-{8 digits}-{4 of A-Z0-9}` shape.
    pub fn is_well_formed(value: &str) -> bool {
        let mut parts = value.split('-');
        let (Some(prefix), Some(date), Some(suffix), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };

        !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_alphanumeric())
            && date.len() == 8
            && date.chars().all(|c| c.is_ascii_digit())
            && suffix.len() == SUFFIX_LEN
            && suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sanitize_prefix(prefix: &str) -> &str {
    let trimmed = prefix.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        DEFAULT_PREFIX
    } else {
        trimmed
    }
}
