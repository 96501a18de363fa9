//! Document validation
//!
//! Policy over the completeness report: structural checks, spec-version
//! check, strict-mode enforcement (minimum score, required fields) and
//! model-card presence warnings. Dataset policy mirrors the model policy
//! but surfaces required-field failures as warnings on the parent document,
//! never as errors.

use std::collections::BTreeMap;

use aibom_common::bom::{Bom, SpecVersion};

use crate::completeness;
use crate::metadata::{DatasetKey, Key};

/// Validation policy knobs.
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Fail when required fields are missing or the score is under the floor.
    pub strict_mode: bool,
    /// Minimum acceptable completeness score (0.0 - 1.0).
    pub min_completeness_score: f64,
    /// Emit model-card presence warnings.
    pub check_model_card: bool,
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub model_id: String,
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    pub completeness_score: f64,
    pub missing_required: Vec<Key>,
    pub missing_optional: Vec<Key>,

    pub dataset_results: BTreeMap<String, DatasetValidationResult>,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetValidationResult {
    pub dataset_ref: String,
    pub completeness_score: f64,
    pub missing_required: Vec<DatasetKey>,
    pub missing_optional: Vec<DatasetKey>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// One-line summary for command output.
    pub fn summary(&self) -> String {
        let status = if self.valid { "PASSED" } else { "FAILED" };
        if self.dataset_results.is_empty() {
            format!(
                "Validation: {} | Score: {:.1}% | Errors: {} | Warnings: {}",
                status,
                self.completeness_score * 100.0,
                self.errors.len(),
                self.warnings.len()
            )
        } else {
            format!(
                "Validation: {} | Model Score: {:.1}% | Datasets: {} | Errors: {} | Warnings: {}",
                status,
                self.completeness_score * 100.0,
                self.dataset_results.len(),
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}

/// Validate a document against the given policy.
pub fn validate(bom: &Bom, opts: &ValidationOptions) -> ValidationResult {
    let mut result = ValidationResult {
        valid: true,
        ..ValidationResult::default()
    };

    // Structural checks
    if bom.metadata.is_none() || bom.metadata_component().is_none() {
        result.valid = false;
        result
            .errors
            .push("BOM missing metadata.component".to_string());
    }

    validate_spec_version(bom, &mut result);

    // Completeness
    let report = completeness::check(bom);
    result.model_id = report.model_id.clone();
    result.completeness_score = report.score;
    result.missing_required = report.missing_required.clone();
    result.missing_optional = report.missing_optional.clone();

    // Strict-mode enforcement
    if opts.strict_mode {
        if !report.missing_required.is_empty() {
            result.valid = false;
            for key in &report.missing_required {
                result.errors.push(format!("required field missing: {}", key));
            }
        }

        if report.score < opts.min_completeness_score {
            result.valid = false;
            result.errors.push(format!(
                "completeness score {:.2} below minimum {:.2}",
                report.score, opts.min_completeness_score
            ));
        }
    }

    for key in &report.missing_optional {
        result.warnings.push(format!("optional field missing: {}", key));
    }

    if opts.check_model_card {
        validate_model_card(bom, &mut result);
    }

    // Dataset entities: required-field failures become warnings on the
    // parent document, never errors.
    for (name, ds_report) in &report.dataset_reports {
        let mut ds_result = DatasetValidationResult {
            dataset_ref: ds_report.dataset_ref.clone(),
            completeness_score: ds_report.score,
            missing_required: ds_report.missing_required.clone(),
            missing_optional: ds_report.missing_optional.clone(),
            ..DatasetValidationResult::default()
        };

        if opts.strict_mode {
            for key in &ds_report.missing_required {
                let msg = format!("required dataset field missing: {}", key);
                ds_result.errors.push(msg.clone());
                result.warnings.push(format!("dataset {}: {}", name, msg));
            }
        }

        for key in &ds_report.missing_optional {
            ds_result
                .warnings
                .push(format!("optional dataset field missing: {}", key));
        }

        result.dataset_results.insert(name.clone(), ds_result);
    }

    result
}

fn validate_spec_version(bom: &Bom, result: &mut ValidationResult) {
    let Some(version) = bom.spec_version else {
        result.valid = false;
        result.errors.push("BOM missing spec version".to_string());
        return;
    };

    // ML-BOM attributes only exist from 1.5 on.
    if version < SpecVersion::V1_5 {
        result.warnings.push(format!(
            "spec version {} predates ML-BOM support (consider upgrading to 1.5+)",
            version
        ));
    }
}

fn validate_model_card(bom: &Bom, result: &mut ValidationResult) {
    let Some(comp) = bom.metadata_component() else {
        return;
    };

    let Some(card) = &comp.model_card else {
        result.warnings.push("model card not present".to_string());
        return;
    };

    if card.model_parameters.is_none() {
        result
            .warnings
            .push("model parameters not present".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BomBuilder, BuildContext};
    use crate::generator::build_dummy;
    use crate::scanner::Discovery;

    fn name_only_bom() -> Bom {
        BomBuilder::default()
            .build(BuildContext {
                model_id: "org/model".into(),
                scan: Discovery::default(),
                hub: None,
                readme: None,
            })
            .unwrap()
    }

    #[test]
    fn test_non_strict_passes_sparse_document() {
        let bom = name_only_bom();
        let result = validate(&bom, &ValidationOptions::default());
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_strict_min_score_fails_sparse_document() {
        let bom = name_only_bom();
        let opts = ValidationOptions {
            strict_mode: true,
            min_completeness_score: 0.9,
            check_model_card: false,
        };
        let result = validate(&bom, &opts);
        assert!(!result.valid);
        let score_msg = format!(
            "completeness score {:.2} below minimum 0.90",
            result.completeness_score
        );
        assert!(
            result.errors.contains(&score_msg),
            "missing {:?} in {:?}",
            score_msg,
            result.errors
        );
    }

    #[test]
    fn test_strict_passes_full_document_with_low_floor() {
        let results = build_dummy().unwrap();
        let opts = ValidationOptions {
            strict_mode: true,
            min_completeness_score: 0.5,
            check_model_card: true,
        };
        let result = validate(&results[0].bom, &opts);
        assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_missing_metadata_component_is_structural_error() {
        let bom = Bom::new();
        let result = validate(&bom, &ValidationOptions::default());
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("metadata.component")));
    }

    #[test]
    fn test_missing_spec_version_is_error() {
        let mut bom = name_only_bom();
        bom.spec_version = None;
        let result = validate(&bom, &ValidationOptions::default());
        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("spec version")));
    }

    #[test]
    fn test_old_spec_version_warns() {
        let mut bom = name_only_bom();
        bom.spec_version = Some(SpecVersion::V1_4);
        let result = validate(&bom, &ValidationOptions::default());
        assert!(result.valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("predates ML-BOM support")));
    }

    #[test]
    fn test_dataset_required_failures_warn_on_parent() {
        // Dummy document, then blank the dataset name to trip its required spec.
        let mut results = build_dummy().unwrap();
        let bom = &mut results[0].bom;
        bom.components.as_mut().unwrap()[0].name = String::new();

        let opts = ValidationOptions {
            strict_mode: true,
            min_completeness_score: 0.0,
            check_model_card: false,
        };
        let result = validate(bom, &opts);

        let ds = result.dataset_results.values().next().unwrap();
        assert!(!ds.errors.is_empty());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("required dataset field missing")));
        // Dataset failures never flip the document invalid on their own.
        assert!(result.valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_model_card_warning_when_absent() {
        let mut bom = name_only_bom();
        bom.metadata
            .as_mut()
            .unwrap()
            .component
            .as_mut()
            .unwrap()
            .model_card = None;
        let opts = ValidationOptions {
            check_model_card: true,
            ..ValidationOptions::default()
        };
        let result = validate(&bom, &opts);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("model card not present")));
    }
}
