//! Document builder
//!
//! A thin, field-agnostic driver: given one build context it creates a
//! fresh document, resolves identity (serial number, timestamp, tool
//! entry), then lets the field-spec registry write every entity attribute.
//! The builder itself contains no field-specific logic.

pub mod dependency;
pub mod meta;
pub mod version;

use aibom_common::bom::{Bom, Component, ComponentType, Metadata, ModelCard};
use thiserror::Error;

use crate::hub::{DatasetReadmeCard, DatasetRecord, ModelReadmeCard, ModelRecord};
use crate::metadata::{
    apply::{apply_dataset_from_sources, apply_from_sources},
    dataset_registry, model_registry, DatasetSource, DatasetTarget, Source, Target,
};
use crate::scanner::Discovery;

pub use dependency::add_dependencies;
pub use meta::{
    add_component_bom_ref, add_component_purl, generate_purl, normalize_segment,
    purl_from_coordinates,
};
pub use version::tool_version;

/// Builder errors
#[derive(Debug, Error)]
pub enum BuildError {
    /// Context carries no usable identity at all
    #[error("build context rejected: {0}")]
    InvalidContext(String),
}

/// Inputs for one model build.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub model_id: String,
    pub scan: Discovery,
    pub hub: Option<ModelRecord>,
    pub readme: Option<ModelReadmeCard>,
}

/// Inputs for one dataset build.
#[derive(Debug, Clone, Default)]
pub struct DatasetBuildContext {
    pub dataset_id: String,
    pub scan: Discovery,
    pub hub: Option<DatasetRecord>,
    pub readme: Option<DatasetReadmeCard>,
}

/// Builder options.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Emit `aibomgen.{type,evidence,path}` properties from the scan.
    pub include_evidence_properties: bool,
    pub hub_base_url: String,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            include_evidence_properties: true,
            hub_base_url: "https://huggingface.co/".to_string(),
        }
    }
}

/// Registry-driven document builder.
pub struct BomBuilder {
    opts: BuilderOptions,
}

impl BomBuilder {
    pub fn new(opts: BuilderOptions) -> Self {
        BomBuilder { opts }
    }

    /// Build one AIBOM document: the model entity under
    /// `metadata.component`, identity fields, PURL and BOMRef.
    pub fn build(&self, ctx: BuildContext) -> Result<Bom, BuildError> {
        let model_id = ctx.model_id.trim().to_string();
        tracing::debug!(model_id = %model_id, "build start");

        if model_id.is_empty()
            && ctx.scan.id.trim().is_empty()
            && ctx.scan.name.trim().is_empty()
            && ctx.hub.is_none()
        {
            return Err(BuildError::InvalidContext(
                "no model id, scan identity or hub record".to_string(),
            ));
        }

        let mut component = Component::new(ComponentType::MachineLearningModel, "");
        component.model_card = Some(ModelCard::default());

        let src = Source {
            model_id: model_id.clone(),
            scan: ctx.scan,
            hub: ctx.hub,
            readme: ctx.readme,
        };
        {
            let mut tgt = Target {
                component: &mut component,
                include_evidence_properties: self.opts.include_evidence_properties,
                hub_base_url: self.opts.hub_base_url.clone(),
            };
            for spec in model_registry() {
                apply_from_sources(&spec, &src, &mut tgt);
            }
        }

        // Component names are never empty; last resort is the literal.
        if component.name.trim().is_empty() {
            component.name = if model_id.is_empty() {
                "model".to_string()
            } else {
                model_id.clone()
            };
        }

        prune_empty_model_parameters(&mut component);
        add_component_purl(&mut component);
        add_component_bom_ref(&mut component);

        let mut bom = Bom::new();
        meta::add_meta_serial_number(&mut bom);
        meta::add_meta_timestamp(&mut bom);
        meta::add_meta_tools(&mut bom, meta::DEFAULT_TOOL_NAME, &tool_version());
        bom.metadata.get_or_insert_with(Metadata::default).component = Some(component);

        tracing::debug!(model_id = %model_id, "build ok");
        Ok(bom)
    }

    /// Build one dataset entity with the dataset registry.
    pub fn build_dataset(&self, ctx: DatasetBuildContext) -> Result<Component, BuildError> {
        let dataset_id = ctx.dataset_id.trim().to_string();
        tracing::debug!(dataset_id = %dataset_id, "dataset build start");

        if dataset_id.is_empty() && ctx.scan.id.trim().is_empty() && ctx.hub.is_none() {
            return Err(BuildError::InvalidContext(
                "no dataset id, scan identity or hub record".to_string(),
            ));
        }

        let mut component = Component::new(ComponentType::Data, "");

        let src = DatasetSource {
            dataset_id: dataset_id.clone(),
            scan: ctx.scan,
            hub: ctx.hub,
            readme: ctx.readme,
        };
        {
            let mut tgt = DatasetTarget {
                component: &mut component,
                include_evidence_properties: self.opts.include_evidence_properties,
                hub_base_url: self.opts.hub_base_url.clone(),
            };
            for spec in dataset_registry() {
                apply_dataset_from_sources(&spec, &src, &mut tgt);
            }
        }

        if component.name.trim().is_empty() {
            component.name = dataset_id.clone();
        }

        add_component_purl(&mut component);
        add_component_bom_ref(&mut component);

        tracing::debug!(dataset_id = %dataset_id, "dataset build ok");
        Ok(component)
    }
}

impl Default for BomBuilder {
    fn default() -> Self {
        BomBuilder::new(BuilderOptions::default())
    }
}

/// Drop a `modelParameters` sub-object all of whose visible fields are
/// empty, so the serialised output stays clean.
fn prune_empty_model_parameters(comp: &mut Component) {
    let Some(card) = comp.model_card.as_mut() else {
        return;
    };
    let Some(mp) = card.model_parameters.as_ref() else {
        return;
    };
    let empty_datasets = mp.datasets.as_ref().map(|d| d.is_empty()).unwrap_or(true);
    let blank = |s: &Option<String>| s.as_deref().map(str::trim).unwrap_or("").is_empty();
    if blank(&mp.task)
        && blank(&mp.architecture_family)
        && blank(&mp.model_architecture)
        && empty_datasets
    {
        card.model_parameters = None;
    }
}
