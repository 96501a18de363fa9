//! CycloneDX-style AIBOM document tree
//!
//! In-memory representation of the AI Bill of Materials produced by the
//! generator. The model entity lives at `metadata.component`
//! (type `machine-learning-model`), dataset entities under `components[]`
//! (type `data`), and explicit edges under `dependencies[]`.
//!
//! Serialization follows the CycloneDX JSON field names; empty optional
//! substructures are omitted so downstream consumers never see noise.

use serde::{Deserialize, Serialize};

/// Declared CycloneDX specification version of a document.
///
/// Ordered oldest to newest so version comparisons work with `<`/`>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecVersion {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
    #[serde(rename = "1.4")]
    V1_4,
    #[serde(rename = "1.5")]
    V1_5,
    #[serde(rename = "1.6")]
    V1_6,
}

impl SpecVersion {
    /// Parse a version string like "1.6".
    pub fn parse(s: &str) -> Option<SpecVersion> {
        match s.trim() {
            "1.0" => Some(SpecVersion::V1_0),
            "1.1" => Some(SpecVersion::V1_1),
            "1.2" => Some(SpecVersion::V1_2),
            "1.3" => Some(SpecVersion::V1_3),
            "1.4" => Some(SpecVersion::V1_4),
            "1.5" => Some(SpecVersion::V1_5),
            "1.6" => Some(SpecVersion::V1_6),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::V1_0 => "1.0",
            SpecVersion::V1_1 => "1.1",
            SpecVersion::V1_2 => "1.2",
            SpecVersion::V1_3 => "1.3",
            SpecVersion::V1_4 => "1.4",
            SpecVersion::V1_5 => "1.5",
            SpecVersion::V1_6 => "1.6",
        }
    }
}

impl std::fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component category within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "machine-learning-model")]
    MachineLearningModel,
    #[serde(rename = "data")]
    Data,
    #[default]
    #[serde(rename = "application")]
    Application,
}

/// Top-level AIBOM document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    #[serde(default)]
    pub bom_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<SpecVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default = "default_bom_version")]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Dependency>>,
}

fn default_bom_version() -> u32 {
    1
}

impl Bom {
    /// Create an empty document at the current spec version.
    pub fn new() -> Self {
        Bom {
            bom_format: "CycloneDX".to_string(),
            spec_version: Some(SpecVersion::V1_6),
            serial_number: None,
            version: 1,
            metadata: None,
            components: None,
            dependencies: None,
        }
    }

    /// The model entity, if present.
    pub fn metadata_component(&self) -> Option<&Component> {
        self.metadata.as_ref()?.component.as_ref()
    }

    pub fn metadata_component_mut(&mut self) -> Option<&mut Component> {
        self.metadata.as_mut()?.component.as_mut()
    }

    /// Model parameters of the model entity, if present.
    pub fn model_parameters(&self) -> Option<&ModelParameters> {
        self.metadata_component()?
            .model_card
            .as_ref()?
            .model_parameters
            .as_ref()
    }
}

impl Default for Bom {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata: creation timestamp, producing tool, model entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Tools>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tools {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
}

/// One entity in the document: the model, a dataset, or the producing tool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(rename = "bom-ref", skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<OrganizationalEntity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<OrganizationalContact>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<LicenseChoice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<Hash>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_references: Option<Vec<ExternalReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_card: Option<ModelCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ComponentData>>,
}

impl Component {
    pub fn new(component_type: ComponentType, name: impl Into<String>) -> Self {
        Component {
            component_type,
            name: name.into(),
            ..Component::default()
        }
    }

    /// Set a `{name, value}` property; empty names or values are dropped,
    /// an existing property with the same name is updated in place.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let name = name.trim();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            return;
        }
        let properties = self.properties.get_or_insert_with(Vec::new);
        if let Some(existing) = properties.iter_mut().find(|p| p.name == name) {
            existing.value = value.to_string();
            return;
        }
        properties.push(Property {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// True when a property with this name exists and carries a non-empty value.
    pub fn has_property(&self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.properties
            .iter()
            .flatten()
            .any(|p| p.name.trim() == name && !p.value.trim().is_empty())
    }

    /// Value of the first property with this name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .flatten()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// First data entry, creating one of type `dataset` when absent.
    pub fn ensure_data(&mut self) -> &mut ComponentData {
        let entries = self.data.get_or_insert_with(Vec::new);
        if entries.is_empty() {
            entries.push(ComponentData {
                data_type: "dataset".to_string(),
                ..ComponentData::default()
            });
        }
        let entry = &mut entries[0];
        if entry.data_type.is_empty() {
            entry.data_type = "dataset".to_string();
        }
        entry
    }

    /// First data entry, if any.
    pub fn data_entry(&self) -> Option<&ComponentData> {
        self.data.as_ref()?.first()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrganizationalEntity {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrganizationalContact {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LicenseChoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl LicenseChoice {
    /// Wrap a hub license identifier as a named license (no SPDX assumption).
    pub fn named(name: impl Into<String>) -> Self {
        LicenseChoice {
            license: Some(License { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hash {
    #[serde(default)]
    pub alg: String,
    #[serde(default)]
    pub content: String,
}

impl Hash {
    pub fn sha1(content: impl Into<String>) -> Self {
        Hash {
            alg: "SHA-1".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "type", default)]
    pub reference_type: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// ML-BOM model card attached to the model entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_parameters: Option<ModelParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantitative_analysis: Option<QuantitativeAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub considerations: Option<Considerations>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_architecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<DatasetChoice>>,
}

/// Reference to a training dataset in the model card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatasetChoice {
    #[serde(rename = "ref", default)]
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitativeAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<Vec<PerformanceMetric>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetric {
    #[serde(rename = "type", default)]
    pub metric_type: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Considerations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_limitations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethical_considerations: Option<Vec<EthicalConsideration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environmental_considerations: Option<EnvironmentalConsiderations>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthicalConsideration {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mitigation_strategy: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentalConsiderations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<Property>>,
}

/// Dataset facts carried by a `data` component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentData {
    #[serde(rename = "type", default)]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive_data: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<DataContents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance: Option<DataGovernance>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataContents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachedText>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedText {
    #[serde(default)]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataGovernance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custodians: Option<Vec<ResponsibleParty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stewards: Option<Vec<ResponsibleParty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<ResponsibleParty>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponsibleParty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationalEntity>,
}

impl ResponsibleParty {
    pub fn organization_named(name: impl Into<String>) -> Self {
        ResponsibleParty {
            organization: Some(OrganizationalEntity { name: name.into() }),
        }
    }
}

/// One edge set in the dependency graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(rename = "ref", default)]
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
}
