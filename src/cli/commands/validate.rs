//! Validate Command
//!
//! Check feature values locally, without contacting the service.

use super::input::FeatureArgs;
use crate::cli::ui::Output;
use crate::types::{HitlensError, Result};
use crate::validation::validate_all;

pub fn run(args: &FeatureArgs) -> Result<()> {
    let output = Output::new();
    let record = args.to_record()?;
    let errors = validate_all(&record);

    output.field_report(&errors);

    if errors.is_empty() {
        output.success("All features valid, ready to submit");
        Ok(())
    } else {
        Err(HitlensError::incomplete_submission(errors.len()))
    }
}
