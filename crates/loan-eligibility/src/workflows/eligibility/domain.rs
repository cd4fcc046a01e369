use serde::{Deserialize, Serialize};

use super::duration::DurationSelection;

/// Column names the classifier was fitted on, in training order.
pub const FEATURE_SCHEMA: [&str; FEATURE_COUNT] = [
    "Gender",
    "Married",
    "Dependents",
    "Education",
    "Self_Employed",
    "ApplicantIncome",
    "CoapplicantIncome",
    "LoanAmount",
    "Loan_Amount_Term",
    "Property_Area",
];

pub const FEATURE_COUNT: usize = 10;

/// Numeric feature record in [`FEATURE_SCHEMA`] order.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Raw values supplied by the form collaborator before any validation.
///
/// Every field is optional on the wire; absent values surface as
/// `Missing` issues from the profile builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub married: String,
    #[serde(default)]
    pub dependents: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub self_employed: String,
    #[serde(default)]
    pub applicant_income: Option<f64>,
    #[serde(default)]
    pub coapplicant_income: Option<f64>,
    #[serde(default)]
    pub loan_amount: Option<f64>,
    #[serde(default)]
    pub loan_duration: DurationSelection,
    #[serde(default)]
    pub property_area: String,
}

/// Validated, encoded applicant record submitted to the classifier.
///
/// Field order mirrors [`FEATURE_SCHEMA`]; `feature_row` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub gender: u8,
    pub married: u8,
    pub dependents: u8,
    pub education: u8,
    pub self_employed: u8,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: u32,
    pub property_area: u8,
}

impl ApplicantProfile {
    pub fn feature_row(&self) -> FeatureRow {
        [
            f64::from(self.gender),
            f64::from(self.married),
            f64::from(self.dependents),
            f64::from(self.education),
            f64::from(self.self_employed),
            self.applicant_income,
            self.coapplicant_income,
            self.loan_amount,
            f64::from(self.loan_term),
            f64::from(self.property_area),
        ]
    }

    /// Pairs each schema column with its value, for logs and API responses.
    pub fn named_features(&self) -> Vec<(&'static str, f64)> {
        FEATURE_SCHEMA
            .iter()
            .copied()
            .zip(self.feature_row())
            .collect()
    }
}

/// Binary eligibility label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    NotEligible,
    Eligible,
}

impl Decision {
    pub const fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Decision::NotEligible),
            1 => Some(Decision::Eligible),
            _ => None,
        }
    }

    pub const fn label(self) -> u8 {
        match self {
            Decision::NotEligible => 0,
            Decision::Eligible => 1,
        }
    }

    pub const fn is_eligible(self) -> bool {
        matches!(self, Decision::Eligible)
    }
}
