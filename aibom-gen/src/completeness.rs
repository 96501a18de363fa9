//! Completeness evaluation
//!
//! Walks both registries over a built document and computes a weighted
//! presence score in `[0, 1]`, plus the lists of missing required and
//! optional keys. Dataset entities get the same treatment individually,
//! keyed by name.

use std::collections::BTreeMap;

use aibom_common::bom::{Bom, Component, ComponentType};

use crate::metadata::{dataset_registry, model_registry, DatasetKey, Key};

/// Completeness report for one document.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub model_id: String,
    /// Weighted score in `[0, 1]`.
    pub score: f64,
    pub passed: usize,
    pub total: usize,
    pub missing_required: Vec<Key>,
    pub missing_optional: Vec<Key>,
    /// Per-dataset reports, keyed by dataset name.
    pub dataset_reports: BTreeMap<String, DatasetReport>,
}

/// Completeness report for one dataset entity.
#[derive(Debug, Clone, Default)]
pub struct DatasetReport {
    pub dataset_ref: String,
    pub score: f64,
    pub passed: usize,
    pub total: usize,
    pub missing_required: Vec<DatasetKey>,
    pub missing_optional: Vec<DatasetKey>,
}

/// Evaluate a document against the model registry (and each dataset entity
/// against the dataset registry).
pub fn check(bom: &Bom) -> Report {
    let mut earned = 0.0;
    let mut max = 0.0;
    let mut passed = 0;
    let mut total = 0;
    let mut missing_required = Vec::new();
    let mut missing_optional = Vec::new();

    let datasets_referenced = has_datasets_referenced(bom);

    for spec in model_registry() {
        if spec.weight <= 0.0 {
            continue;
        }

        // A model that lists no training data gets the datasets spec counted
        // as missing exactly once, without consulting its presence check.
        if spec.key == Key::ModelCardDatasets && !datasets_referenced {
            total += 1;
            max += spec.weight;
            if spec.required {
                missing_required.push(spec.key);
            } else {
                missing_optional.push(spec.key);
            }
            continue;
        }

        total += 1;
        max += spec.weight;

        if (spec.present)(bom) {
            passed += 1;
            earned += spec.weight;
            continue;
        }

        if spec.required {
            missing_required.push(spec.key);
        } else {
            missing_optional.push(spec.key);
        }
    }

    let score = if max > 0.0 { earned / max } else { 0.0 };

    let mut report = Report {
        model_id: bom
            .metadata_component()
            .map(|c| c.name.clone())
            .unwrap_or_default(),
        score,
        passed,
        total,
        missing_required,
        missing_optional,
        dataset_reports: BTreeMap::new(),
    };

    if datasets_referenced {
        for comp in bom.components.iter().flatten() {
            if comp.component_type == ComponentType::Data {
                report
                    .dataset_reports
                    .insert(comp.name.clone(), check_dataset(comp));
            }
        }
    }

    report
}

/// True when the model's training metadata references at least one dataset
/// with a non-empty ref.
fn has_datasets_referenced(bom: &Bom) -> bool {
    bom.model_parameters()
        .and_then(|mp| mp.datasets.as_ref())
        .map(|ds| ds.iter().any(|d| !d.reference.is_empty()))
        .unwrap_or(false)
}

/// Evaluate one dataset entity against the dataset registry.
pub fn check_dataset(comp: &Component) -> DatasetReport {
    let mut earned = 0.0;
    let mut max = 0.0;
    let mut passed = 0;
    let mut total = 0;
    let mut missing_required = Vec::new();
    let mut missing_optional = Vec::new();

    for spec in dataset_registry() {
        if spec.weight <= 0.0 {
            continue;
        }
        total += 1;
        max += spec.weight;

        if (spec.present)(comp) {
            passed += 1;
            earned += spec.weight;
            continue;
        }

        if spec.required {
            missing_required.push(spec.key);
        } else {
            missing_optional.push(spec.key);
        }
    }

    DatasetReport {
        dataset_ref: comp.name.clone(),
        score: if max > 0.0 { earned / max } else { 0.0 },
        passed,
        total,
        missing_required,
        missing_optional,
    }
}
