//! Feature Validation
//!
//! Pure per-field range checks over a partial `FeatureRecord`. Cheap enough to
//! run on every edit: O(field count), no I/O, no shared state.

use std::collections::BTreeMap;

use crate::types::{FeatureField, FeatureRecord};

/// Field → error message. A field is present iff its value is missing or out
/// of range.
pub type ValidationResult = BTreeMap<FeatureField, String>;

/// Validate a single field value.
///
/// Returns `None` when the value is present, not NaN, and inside the field's
/// closed range.
pub fn validate_field(field: FeatureField, value: Option<f64>) -> Option<String> {
    let range = field.range();

    match value {
        None => Some(format!("{} is required", field.label())),
        Some(v) if v.is_nan() => Some(format!("{} is required", field.label())),
        Some(v) if !range.contains(v) => Some(format!(
            "{} must be between {} and {}",
            field.label(), range.min, range.max
        )),
        Some(_) => None,
    }
}

/// Validate every field of the fixed set, returning only the failures.
pub fn validate_all(record: &FeatureRecord) -> ValidationResult {
    FeatureField::ALL
        .into_iter()
        .filter_map(|field| validate_field(field, record.get(field)).map(|err| (field, err)))
        .collect()
}

/// Submission gate: no field errors and every field present.
pub fn is_submittable(record: &FeatureRecord) -> bool {
    record.is_complete() && validate_all(record).is_empty()
}
