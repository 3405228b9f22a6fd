//! Predict Command
//!
//! Validate the features, request a prediction, then similar tracks.
//!
//! Usage:
//!   hitlens predict --input track.json
//!   hitlens predict --tempo 120 --energy 0.8 ... --time-signature 4

use super::input::FeatureArgs;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{HitlensError, Result};
use crate::workflow::SubmitOutcome;

pub async fn run(ctx: &CommandContext, args: &FeatureArgs) -> Result<()> {
    let output = Output::new();
    let record = args.to_record()?;
    let orchestrator = ctx.orchestrator()?;

    output.info(&format!(
        "Requesting prediction from {}",
        ctx.config.api.base_url
    ));

    match orchestrator.submit(&record).await {
        SubmitOutcome::Blocked(errors) => {
            output.field_report(&errors);
            Err(HitlensError::incomplete_submission(errors.len()))
        }
        SubmitOutcome::Finished(state) => {
            let Some(outcome) = state.prediction() else {
                let message = state.primary_error().unwrap_or_default().to_string();
                return Err(HitlensError::PredictionFailed(message));
            };
            output.prediction_panel(outcome);
            output.similar_panel(state.similar_tracks(), state.similar_error());
            Ok(())
        }
        SubmitOutcome::InProgress => Err(HitlensError::SubmissionInProgress),
        SubmitOutcome::Superseded => Ok(()),
    }
}
