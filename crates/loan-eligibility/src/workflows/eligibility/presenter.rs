use serde::{Deserialize, Serialize};

use super::domain::Decision;
use super::inference::InferenceError;
use super::service::EligibilityError;

/// Visual treatment the collaborator should apply to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Error,
}

/// User-facing notice rendered in place of the form result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub tone: Tone,
    pub text: String,
}

/// Render an eligibility decision for the applicant.
pub fn present(decision: Decision, name: &str, account_number: &str) -> Message {
    let greeting = format!("Hello {name}, Account Number: {account_number}.");
    match decision {
        Decision::NotEligible => Message {
            tone: Tone::Negative,
            text: format!(
                "{greeting} Based on our calculations, you are not eligible for the loan."
            ),
        },
        Decision::Eligible => Message {
            tone: Tone::Positive,
            text: format!("{greeting} Congratulations! You are eligible for the loan."),
        },
    }
}

/// Render a failed request as an error notice.
pub fn present_failure(error: &EligibilityError) -> Message {
    let text = match error {
        EligibilityError::Validation(err) if err.missing_identity() => format!(
            "Please fill in all required fields (Account Number and Full Name). {err}"
        ),
        EligibilityError::Validation(err) => format!("Please correct the form: {err}"),
        EligibilityError::Inference(InferenceError::Unavailable(_)) => {
            "The prediction model is not loaded. Please ensure the model file is available."
                .to_string()
        }
        EligibilityError::Inference(err) => {
            format!("An error occurred during prediction: {err}")
        }
        EligibilityError::Schema(err) => {
            format!("An error occurred during prediction: {err}")
        }
    };

    Message {
        tone: Tone::Error,
        text,
    }
}

/// Render a form body that could not be read at all.
pub fn present_malformed(detail: &str) -> Message {
    Message {
        tone: Tone::Error,
        text: format!("Please correct the form: {detail}"),
    }
}
