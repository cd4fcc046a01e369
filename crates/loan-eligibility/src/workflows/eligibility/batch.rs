use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{ApplicationForm, Decision};
use super::duration::DurationSelection;
use super::model::ArtifactLoader;
use super::presenter::{present_failure, Message};
use super::service::EligibilityService;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read applicant file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Result for one CSV row. Failed rows carry the error notice and no decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub row: usize,
    pub account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    pub message: Message,
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    #[serde(default)]
    account_number: String,
    #[serde(default)]
    full_name: String,
    gender: String,
    married: String,
    dependents: String,
    education: String,
    self_employed: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    applicant_income: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    coapplicant_income: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    loan_amount: Option<f64>,
    #[serde(default)]
    loan_duration: String,
    property_area: String,
}

impl From<ApplicantRow> for ApplicationForm {
    fn from(row: ApplicantRow) -> Self {
        let loan_duration = match row.loan_duration.parse::<DurationSelection>() {
            Ok(selection) => selection,
            Err(never) => match never {},
        };

        ApplicationForm {
            account_number: row.account_number,
            full_name: row.full_name,
            gender: row.gender,
            married: row.married,
            dependents: row.dependents,
            education: row.education,
            self_employed: row.self_employed,
            applicant_income: row.applicant_income,
            coapplicant_income: row.coapplicant_income,
            loan_amount: row.loan_amount,
            loan_duration,
            property_area: row.property_area,
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Scores every applicant in a CSV export through the regular pipeline.
pub struct BatchScorer<'a, L> {
    service: &'a EligibilityService<L>,
}

impl<'a, L> BatchScorer<'a, L>
where
    L: ArtifactLoader + 'static,
{
    pub fn new(service: &'a EligibilityService<L>) -> Self {
        Self { service }
    }

    pub fn score_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<BatchOutcome>, BatchError> {
        let file = std::fs::File::open(path)?;
        self.score_reader(file)
    }

    pub fn score_reader<R: Read>(&self, reader: R) -> Result<Vec<BatchOutcome>, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut outcomes = Vec::new();

        for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
            let form = ApplicationForm::from(record?);
            let outcome = match self.service.assess(&form) {
                Ok(assessment) => BatchOutcome {
                    row: index + 1,
                    account_number: form.account_number.clone(),
                    decision: Some(assessment.decision),
                    message: assessment.message,
                },
                Err(error) => BatchOutcome {
                    row: index + 1,
                    account_number: form.account_number.clone(),
                    decision: None,
                    message: present_failure(&error),
                },
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
