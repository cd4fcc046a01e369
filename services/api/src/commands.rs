use crate::infra::{apply_model_override, loan_service, LoanService};
use clap::Args;
use loan_eligibility::config::AppConfig;
use loan_eligibility::error::AppError;
use loan_eligibility::telemetry;
use loan_eligibility::workflows::eligibility::{
    option_catalog, present_failure, ApplicationForm, BatchOutcome, BatchScorer,
    DurationSelection, Tone,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Applicant account number (up to 11 characters)
    #[arg(long)]
    pub(crate) account: String,
    /// Applicant full name
    #[arg(long)]
    pub(crate) name: String,
    /// Female or Male
    #[arg(long)]
    pub(crate) gender: String,
    /// No or Yes
    #[arg(long)]
    pub(crate) married: String,
    /// No, One, Two, or More than Two
    #[arg(long)]
    pub(crate) dependents: String,
    /// Graduate or Not Graduate
    #[arg(long)]
    pub(crate) education: String,
    /// No or Yes
    #[arg(long)]
    pub(crate) self_employed: String,
    #[arg(long)]
    pub(crate) applicant_income: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) coapplicant_income: f64,
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Duration selection index or label such as "1 Year"
    #[arg(long, default_value = "0")]
    pub(crate) duration: DurationSelection,
    /// Rural, Semi-Urban, or Urban
    #[arg(long)]
    pub(crate) property_area: String,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file whose headers match the form field names
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the configured model artifact path
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Emit outcomes as JSON instead of one line per applicant
    #[arg(long)]
    pub(crate) json: bool,
}

impl From<AssessArgs> for ApplicationForm {
    fn from(args: AssessArgs) -> Self {
        ApplicationForm {
            account_number: args.account,
            full_name: args.name,
            gender: args.gender,
            married: args.married,
            dependents: args.dependents,
            education: args.education,
            self_employed: args.self_employed,
            applicant_income: Some(args.applicant_income),
            coapplicant_income: Some(args.coapplicant_income),
            loan_amount: Some(args.loan_amount),
            loan_duration: args.duration,
            property_area: args.property_area,
        }
    }
}

/// Load configuration, install telemetry, and build the scoring service.
fn open_session(model: Option<PathBuf>) -> Result<Arc<LoanService>, AppError> {
    let mut config = AppConfig::load()?;
    apply_model_override(&mut config, model);
    telemetry::init(&config.telemetry)?;
    Ok(loan_service(&config))
}

pub(crate) fn run_assess(mut args: AssessArgs) -> Result<(), AppError> {
    let service = open_session(args.model.take())?;

    let form = ApplicationForm::from(args);
    match service.assess(&form) {
        Ok(assessment) => {
            println!("{}", assessment.message.text);
            println!(
                "Model label {} at loan term {}",
                assessment.decision.label(),
                assessment.profile.loan_term
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", present_failure(&err).text);
            Err(err.into())
        }
    }
}

pub(crate) fn run_batch(mut args: BatchArgs) -> Result<(), AppError> {
    let service = open_session(args.model.take())?;

    let outcomes = BatchScorer::new(service.as_ref()).score_path(&args.input)?;
    if args.json {
        return write_outcomes_json(std::io::stdout().lock(), &outcomes);
    }

    println!("Applicants scored from {}", args.input.display());
    for outcome in &outcomes {
        println!("{}", render_outcome(outcome));
    }
    let eligible = outcomes
        .iter()
        .filter(|outcome| outcome.decision.is_some_and(|decision| decision.is_eligible()))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|outcome| outcome.decision.is_none())
        .count();
    println!(
        "Summary: {} scored, {} eligible, {} could not be assessed",
        outcomes.len(),
        eligible,
        rejected
    );
    Ok(())
}

pub(crate) fn run_options() {
    let catalog = option_catalog();

    println!("Form options");
    for set in &catalog.categories {
        println!("  {}", set.field);
        for option in &set.labels {
            println!("    {:>3}  {}", option.code, option.label);
        }
    }

    println!("  loan_duration");
    for (index, option) in catalog.loan_duration.iter().enumerate() {
        println!(
            "    {:>3}  {:<10} term {}",
            index, option.label, option.code
        );
    }
}

fn write_outcomes_json<W: Write>(
    mut writer: W,
    outcomes: &[BatchOutcome],
) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut writer, outcomes).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn render_outcome(outcome: &BatchOutcome) -> String {
    let marker = match outcome.message.tone {
        Tone::Positive => "ELIGIBLE",
        Tone::Negative => "NOT ELIGIBLE",
        Tone::Error => "ERROR",
    };
    format!(
        "  row {:>4} [{}] {:<12} {}",
        outcome.row, outcome.account_number, marker, outcome.message.text
    )
}
