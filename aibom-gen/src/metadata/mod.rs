//! Field-spec registry engine
//!
//! The single source of truth for what the generator knows how to populate
//! and check. Each field is one declarative record: how it is found in the
//! fetched sources (ordered, first hit wins), how a user-provided string is
//! parsed, how it is applied onto the document under construction, how much
//! it weighs for completeness, and how its presence is detected.
//!
//! The builder and the completeness evaluator are both driven entirely by
//! these registries; neither contains field-specific logic.

pub mod apply;
mod fields_component;
mod fields_dataset;
mod fields_hub_props;
mod fields_model_card;
pub mod helpers;
pub mod keys;
pub mod parse;
pub mod value;

use aibom_common::bom::{Bom, Component};

use crate::hub::{DatasetReadmeCard, DatasetRecord, ModelReadmeCard, ModelRecord};
use crate::scanner::Discovery;

pub use keys::{DatasetKey, Key};
pub use value::{ApplyInput, FieldError, FieldValue};

/// Everything model field specs can read from.
#[derive(Debug, Clone, Default)]
pub struct Source {
    pub model_id: String,
    pub scan: Discovery,
    pub hub: Option<ModelRecord>,
    pub readme: Option<ModelReadmeCard>,
}

/// Everything model field specs are allowed to mutate.
pub struct Target<'a> {
    /// The model entity under construction (carries the model card).
    pub component: &'a mut Component,
    pub include_evidence_properties: bool,
    pub hub_base_url: String,
}

/// Source bundle for one dataset entity.
#[derive(Debug, Clone, Default)]
pub struct DatasetSource {
    pub dataset_id: String,
    pub scan: Discovery,
    pub hub: Option<DatasetRecord>,
    pub readme: Option<DatasetReadmeCard>,
}

/// The dataset entity being built.
pub struct DatasetTarget<'a> {
    pub component: &'a mut Component,
    pub include_evidence_properties: bool,
    pub hub_base_url: String,
}

pub type SourceFn = Box<dyn Fn(&Source) -> Option<FieldValue> + Send + Sync>;
pub type ParseFn = Box<dyn Fn(&str) -> Result<FieldValue, FieldError> + Send + Sync>;
pub type ApplyFn = Box<dyn Fn(&mut Target, ApplyInput) -> Result<(), FieldError> + Send + Sync>;
pub type PresentFn = Box<dyn Fn(&Bom) -> bool + Send + Sync>;

/// First-class definition of one model field:
/// - how it contributes to completeness (`weight`, `required`)
/// - where its value comes from (`sources`, first hit wins)
/// - how a user override string becomes a typed value (`parse`)
/// - how it is written into the document (`apply`)
/// - how its presence is detected (`present`)
pub struct FieldSpec {
    pub key: Key,
    pub weight: f64,
    pub required: bool,

    pub sources: Vec<SourceFn>,
    pub parse: Option<ParseFn>,
    pub apply: ApplyFn,
    pub present: PresentFn,
}

pub type DatasetSourceFn = Box<dyn Fn(&DatasetSource) -> Option<FieldValue> + Send + Sync>;
pub type DatasetApplyFn =
    Box<dyn Fn(&mut DatasetTarget, ApplyInput) -> Result<(), FieldError> + Send + Sync>;
pub type DatasetPresentFn = Box<dyn Fn(&Component) -> bool + Send + Sync>;

/// Dataset analog of [`FieldSpec`], operating on a dataset entity rather
/// than the top-level metadata component.
pub struct DatasetFieldSpec {
    pub key: DatasetKey,
    pub weight: f64,
    pub required: bool,

    pub sources: Vec<DatasetSourceFn>,
    pub parse: Option<ParseFn>,
    pub apply: DatasetApplyFn,
    pub present: DatasetPresentFn,
}

/// The central registry of all model field specs, in application order.
pub fn model_registry() -> Vec<FieldSpec> {
    let mut specs = Vec::with_capacity(32);
    specs.extend(fields_component::component_fields());
    specs.extend(fields_component::evidence_fields());
    specs.extend(fields_hub_props::hub_prop_fields());
    specs.extend(fields_model_card::model_card_fields());
    specs
}

/// The central registry of all dataset field specs, in application order.
pub fn dataset_registry() -> Vec<DatasetFieldSpec> {
    fields_dataset::dataset_fields()
}
