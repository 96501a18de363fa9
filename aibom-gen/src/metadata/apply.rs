//! Registry application
//!
//! Runs one spec against its sources (first hit wins, non-forced) or a
//! user-provided string (parsed, forced). Apply failures stay local to the
//! spec: they are logged and never abort a build.

use super::{ApplyInput, DatasetFieldSpec, DatasetSource, DatasetTarget, FieldError, FieldSpec, Source, Target};

/// Apply the first available source value through `spec.apply`.
pub fn apply_from_sources(spec: &FieldSpec, src: &Source, tgt: &mut Target) {
    for get in &spec.sources {
        let Some(value) = get(src) else { continue };
        if let Err(e) = (spec.apply)(tgt, ApplyInput { value, force: false }) {
            tracing::debug!(key = %spec.key, error = %e, "apply failed");
        }
        return;
    }
}

/// Parse and apply a user-provided value with `force = true`.
pub fn apply_user_value(spec: &FieldSpec, value: &str, tgt: &mut Target) -> Result<(), FieldError> {
    let parse = spec
        .parse
        .as_ref()
        .ok_or_else(|| FieldError::Other(format!("spec missing parse for {}", spec.key)))?;
    let parsed = parse(value)?;
    (spec.apply)(tgt, ApplyInput {
        value: parsed,
        force: true,
    })
}

/// Apply the first available dataset source value.
pub fn apply_dataset_from_sources(
    spec: &DatasetFieldSpec,
    src: &DatasetSource,
    tgt: &mut DatasetTarget,
) {
    for get in &spec.sources {
        let Some(value) = get(src) else { continue };
        if let Err(e) = (spec.apply)(tgt, ApplyInput { value, force: false }) {
            tracing::debug!(key = %spec.key, error = %e, "apply failed");
        }
        return;
    }
}

/// Parse and apply a dataset user value with `force = true`.
pub fn apply_dataset_user_value(
    spec: &DatasetFieldSpec,
    value: &str,
    tgt: &mut DatasetTarget,
) -> Result<(), FieldError> {
    let parse = spec
        .parse
        .as_ref()
        .ok_or_else(|| FieldError::Other(format!("spec missing parse for {}", spec.key)))?;
    let parsed = parse(value)?;
    (spec.apply)(tgt, ApplyInput {
        value: parsed,
        force: true,
    })
}
