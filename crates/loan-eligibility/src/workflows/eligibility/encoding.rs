//! Option tables shared by the applicant form and the classifier.
//!
//! Every categorical field is a fixed, ordered list of labels. The code the
//! model was trained with is the label's zero-based position in that list, so
//! the tables below must never be reordered.

use serde::Serialize;

/// Categorical inputs collected by the applicant form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionSet {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    PropertyArea,
}

impl OptionSet {
    pub const ALL: [OptionSet; 6] = [
        OptionSet::Gender,
        OptionSet::Married,
        OptionSet::Dependents,
        OptionSet::Education,
        OptionSet::SelfEmployed,
        OptionSet::PropertyArea,
    ];

    /// Labels in training order.
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            OptionSet::Gender => &["Female", "Male"],
            OptionSet::Married => &["No", "Yes"],
            OptionSet::Dependents => &["No", "One", "Two", "More than Two"],
            OptionSet::Education => &["Not Graduate", "Graduate"],
            OptionSet::SelfEmployed => &["No", "Yes"],
            OptionSet::PropertyArea => &["Rural", "Semi-Urban", "Urban"],
        }
    }

    /// Form field name, also used when reporting validation issues.
    pub const fn field(self) -> &'static str {
        match self {
            OptionSet::Gender => "gender",
            OptionSet::Married => "married",
            OptionSet::Dependents => "dependents",
            OptionSet::Education => "education",
            OptionSet::SelfEmployed => "self_employed",
            OptionSet::PropertyArea => "property_area",
        }
    }

    /// Encode a UI label into the numeric code the model expects.
    pub fn encode(self, label: &str) -> Result<u8, InvalidCategoryError> {
        let needle = label.trim();
        self.labels()
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(needle))
            .map(|index| index as u8)
            .ok_or_else(|| InvalidCategoryError {
                option_set: self,
                label: label.to_string(),
            })
    }

    /// Reverse lookup, used when rendering an encoded profile.
    pub fn label(self, code: u8) -> Option<&'static str> {
        self.labels().get(code as usize).copied()
    }
}

/// Raised when a label is not part of the option set it was submitted for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{label}' is not a valid {} option (expected one of: {})", .option_set.field(), .option_set.labels().join(", "))]
pub struct InvalidCategoryError {
    pub option_set: OptionSet,
    pub label: String,
}
