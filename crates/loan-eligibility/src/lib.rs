//! Loan eligibility pipeline: applicant form encoding, classifier inference,
//! and decision messaging.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
