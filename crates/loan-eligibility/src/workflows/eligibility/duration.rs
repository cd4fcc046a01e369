use std::convert::Infallible;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Loan duration choices offered by the form, in selection order.
pub const DURATION_LABELS: [&str; 5] = ["2 Month", "6 Month", "8 Month", "1 Year", "16 Month"];

/// Term values the model was trained on, indexed by selection.
pub const TERM_VALUES: [u32; 5] = [60, 180, 240, 360, 480];

/// Term used whenever a selection cannot be resolved.
pub const DEFAULT_TERM: u32 = TERM_VALUES[0];

/// Duration as submitted by a collaborator: either the selection index or its label.
///
/// Deserialization never fails. Values that are neither an index nor a label
/// (negative or fractional numbers, `null`, objects) become the default
/// selection and resolve to [`DEFAULT_TERM`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DurationSelection {
    Index(usize),
    Label(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSelection {
    Index(usize),
    Label(String),
    Number(f64),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for DurationSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let selection = match RawSelection::deserialize(deserializer)? {
            RawSelection::Index(index) => DurationSelection::Index(index),
            RawSelection::Label(label) => DurationSelection::Label(label),
            RawSelection::Number(value)
                if value.is_finite() && value.fract() == 0.0 && value >= 0.0 =>
            {
                DurationSelection::Index(value as usize)
            }
            RawSelection::Number(value) => {
                debug!(value, fallback = DEFAULT_TERM, "unusable duration number");
                DurationSelection::default()
            }
            RawSelection::Other(_) => {
                debug!(fallback = DEFAULT_TERM, "unusable duration value");
                DurationSelection::default()
            }
        };
        Ok(selection)
    }
}

impl Default for DurationSelection {
    fn default() -> Self {
        DurationSelection::Index(0)
    }
}

/// Map a selection index to its term value.
///
/// Out-of-range indices resolve to [`DEFAULT_TERM`]. The resolver is total on
/// purpose: the first bucket is the form's default, and an unknown selection
/// must not abort the request.
pub fn resolve_term(index: usize) -> u32 {
    match TERM_VALUES.get(index) {
        Some(term) => *term,
        None => {
            debug!(index, fallback = DEFAULT_TERM, "duration index out of range");
            DEFAULT_TERM
        }
    }
}

/// Position of a duration label, matched case-insensitively.
pub fn index_for_label(label: &str) -> Option<usize> {
    let needle = label.trim();
    DURATION_LABELS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(needle))
}

impl DurationSelection {
    pub fn term(&self) -> u32 {
        match self {
            DurationSelection::Index(index) => resolve_term(*index),
            DurationSelection::Label(label) => match index_for_label(label) {
                Some(index) => resolve_term(index),
                None => {
                    debug!(label = %label, fallback = DEFAULT_TERM, "unknown duration label");
                    DEFAULT_TERM
                }
            },
        }
    }
}

/// Digits select by index; anything else is treated as a label.
impl FromStr for DurationSelection {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Ok(match trimmed.parse::<usize>() {
            Ok(index) => DurationSelection::Index(index),
            Err(_) => DurationSelection::Label(trimmed.to_string()),
        })
    }
}
