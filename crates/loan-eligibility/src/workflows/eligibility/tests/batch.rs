use std::io::Cursor;

use super::common::*;
use crate::workflows::eligibility::batch::{BatchError, BatchScorer};
use crate::workflows::eligibility::domain::Decision;
use crate::workflows::eligibility::presenter::Tone;

const HEADER: &str = "account_number,full_name,gender,married,dependents,education,self_employed,applicant_income,coapplicant_income,loan_amount,loan_duration,property_area\n";

#[test]
fn scores_each_row_independently() {
    let (service, classifier, loader) = build_service(1);
    let csv = format!(
        "{HEADER}\
         12345678901,Asha,Male,Yes,One,Graduate,No,5000,0,100,3,Urban\n\
         10987654321,,Female,No,No,Graduate,No,3000,1000,80,1 Year,Rural\n\
         55555555555,Ravi,Male,No,Two,Not Graduate,Yes,2500,,120,16 Month,Semi-Urban\n"
    );

    let outcomes = BatchScorer::new(&service)
        .score_reader(Cursor::new(csv))
        .expect("csv parses");

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].row, 1);
    assert_eq!(outcomes[0].decision, Some(Decision::Eligible));
    assert_eq!(outcomes[0].message.tone, Tone::Positive);

    assert_eq!(outcomes[1].decision, None);
    assert_eq!(outcomes[1].message.tone, Tone::Error);
    assert!(outcomes[1].message.text.contains("full_name is required"));

    assert_eq!(outcomes[2].account_number, "55555555555");
    assert_eq!(outcomes[2].decision, None);
    assert!(outcomes[2]
        .message
        .text
        .contains("coapplicant_income is required"));

    assert_eq!(classifier.calls(), 1);
    assert_eq!(loader.reads(), 1);
}

#[test]
fn duration_column_accepts_labels_and_indices() {
    let (service, classifier, _) = build_service(0);
    let csv = format!(
        "{HEADER}\
         1,Asha,Male,Yes,One,Graduate,No,5000,0,100,1 Year,Urban\n\
         2,Asha,Male,Yes,One,Graduate,No,5000,0,100,4,Urban\n"
    );

    let outcomes = BatchScorer::new(&service)
        .score_reader(Cursor::new(csv))
        .expect("csv parses");

    assert!(outcomes
        .iter()
        .all(|outcome| outcome.decision == Some(Decision::NotEligible)));
    let last = classifier.last_batch().expect("scored");
    assert_eq!(last[0][8], 480.0);
}

#[test]
fn malformed_numbers_abort_the_batch() {
    let (service, _, _) = build_service(1);
    let csv = format!("{HEADER}1,Asha,Male,Yes,One,Graduate,No,lots,0,100,3,Urban\n");

    match BatchScorer::new(&service).score_reader(Cursor::new(csv)) {
        Err(BatchError::Csv(_)) => {}
        other => panic!("expected csv error, got {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let (service, _, _) = build_service(1);

    match BatchScorer::new(&service).score_path("/nonexistent/applicants.csv") {
        Err(BatchError::Io(_)) => {}
        other => panic!("expected io error, got {other:?}"),
    }
}
