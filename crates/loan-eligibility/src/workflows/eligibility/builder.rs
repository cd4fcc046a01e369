use std::fmt;

use serde::Serialize;

use super::domain::{ApplicantProfile, ApplicationForm, FEATURE_SCHEMA};
use super::encoding::OptionSet;

pub const MAX_ACCOUNT_NUMBER_LEN: usize = 11;
pub const MAX_FULL_NAME_LEN: usize = 250;

/// Why a single form field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    TooLong { max: usize },
    Negative,
    NotFinite,
    InvalidOption { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "{} is required", self.field),
            IssueKind::TooLong { max } => {
                write!(f, "{} exceeds {} characters", self.field, max)
            }
            IssueKind::Negative => write!(f, "{} must not be negative", self.field),
            IssueKind::NotFinite => write!(f, "{} must be a finite number", self.field),
            IssueKind::InvalidOption { label } => {
                write!(f, "{} has unknown option '{}'", self.field, label)
            }
        }
    }
}

/// Every field that kept the form from becoming a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid application form: {}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }

    /// True when the account number or full name is missing.
    pub fn missing_identity(&self) -> bool {
        self.issues.iter().any(|issue| {
            issue.kind == IssueKind::Missing
                && matches!(issue.field, "account_number" | "full_name")
        })
    }
}

fn render_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The model declares a feature layout that differs from the profile's.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model feature schema mismatch at column {position}: expected {expected:?}, model declares {found:?}")]
pub struct SchemaMismatch {
    pub position: usize,
    pub expected: Option<String>,
    pub found: Option<String>,
}

/// Fail fast when a model was fitted on a different column layout.
pub fn assert_schema(declared: &[String]) -> Result<(), SchemaMismatch> {
    let width = declared.len().max(FEATURE_SCHEMA.len());
    for position in 0..width {
        let expected = FEATURE_SCHEMA.get(position).copied();
        let found = declared.get(position).map(String::as_str);
        if expected != found {
            return Err(SchemaMismatch {
                position,
                expected: expected.map(str::to_string),
                found: found.map(str::to_string),
            });
        }
    }
    Ok(())
}

/// Validates raw form values and encodes them into an [`ApplicantProfile`].
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    max_account_len: usize,
    max_name_len: usize,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self {
            max_account_len: MAX_ACCOUNT_NUMBER_LEN,
            max_name_len: MAX_FULL_NAME_LEN,
        }
    }
}

impl ProfileBuilder {
    pub fn build(&self, form: &ApplicationForm) -> Result<ApplicantProfile, ValidationError> {
        let mut issues = Vec::new();

        check_text(
            &mut issues,
            "account_number",
            &form.account_number,
            self.max_account_len,
        );
        check_text(&mut issues, "full_name", &form.full_name, self.max_name_len);

        let gender = encode(&mut issues, OptionSet::Gender, &form.gender);
        let married = encode(&mut issues, OptionSet::Married, &form.married);
        let dependents = encode(&mut issues, OptionSet::Dependents, &form.dependents);
        let education = encode(&mut issues, OptionSet::Education, &form.education);
        let self_employed = encode(&mut issues, OptionSet::SelfEmployed, &form.self_employed);

        let applicant_income = amount(&mut issues, "applicant_income", form.applicant_income);
        let coapplicant_income =
            amount(&mut issues, "coapplicant_income", form.coapplicant_income);
        let loan_amount = amount(&mut issues, "loan_amount", form.loan_amount);

        let loan_term = form.loan_duration.term();
        let property_area = encode(&mut issues, OptionSet::PropertyArea, &form.property_area);

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        Ok(ApplicantProfile {
            gender,
            married,
            dependents,
            education,
            self_employed,
            applicant_income,
            coapplicant_income,
            loan_amount,
            loan_term,
            property_area,
        })
    }
}

fn check_text(issues: &mut Vec<FieldIssue>, field: &'static str, value: &str, max: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        issues.push(FieldIssue {
            field,
            kind: IssueKind::Missing,
        });
    } else if trimmed.chars().count() > max {
        issues.push(FieldIssue {
            field,
            kind: IssueKind::TooLong { max },
        });
    }
}

// Failed fields still yield a placeholder so every issue is collected in one pass.
fn encode(issues: &mut Vec<FieldIssue>, set: OptionSet, label: &str) -> u8 {
    if label.trim().is_empty() {
        issues.push(FieldIssue {
            field: set.field(),
            kind: IssueKind::Missing,
        });
        return 0;
    }
    match set.encode(label) {
        Ok(code) => code,
        Err(err) => {
            issues.push(FieldIssue {
                field: set.field(),
                kind: IssueKind::InvalidOption { label: err.label },
            });
            0
        }
    }
}

fn amount(issues: &mut Vec<FieldIssue>, field: &'static str, value: Option<f64>) -> f64 {
    let kind = match value {
        None => IssueKind::Missing,
        Some(v) if !v.is_finite() => IssueKind::NotFinite,
        Some(v) if v < 0.0 => IssueKind::Negative,
        Some(v) => return v,
    };
    issues.push(FieldIssue { field, kind });
    0.0
}
