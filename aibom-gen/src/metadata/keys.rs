//! Field keys
//!
//! Identify the CycloneDX fields (or pseudo-fields) the registries populate
//! and check. The string form is the logical document path; it is what
//! completeness reports print and what user overrides address fields by.

/// Model-entity field keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ComponentName,
    ComponentExternalReferences,
    ComponentTags,
    ComponentLicenses,
    ComponentHashes,
    ComponentManufacturer,
    ComponentGroup,

    // Component-level hub properties
    HubLastModified,
    HubCreatedAt,
    HubLanguage,
    HubUsedStorage,
    HubPrivate,
    HubLibraryName,
    HubDownloads,
    HubLikes,
    HubBaseModel,
    HubModelCardContact,

    // Model card
    ModelCardTask,
    ModelCardArchitectureFamily,
    ModelCardModelArchitecture,
    ModelCardDatasets,
    ModelCardUseCases,
    ModelCardTechnicalLimitations,
    ModelCardEthicalConsiderations,
    ModelCardPerformanceMetrics,
    ModelCardEnvironmentalConsiderations,

    /// Zero-weight carrier for scan evidence properties.
    Evidence,
}

impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::ComponentName => "BOM.metadata.component.name",
            Key::ComponentExternalReferences => "BOM.metadata.component.externalReferences",
            Key::ComponentTags => "BOM.metadata.component.tags",
            Key::ComponentLicenses => "BOM.metadata.component.licenses",
            Key::ComponentHashes => "BOM.metadata.component.hashes",
            Key::ComponentManufacturer => "BOM.metadata.component.manufacturer",
            Key::ComponentGroup => "BOM.metadata.component.group",
            Key::HubLastModified => {
                "BOM.metadata.component.properties.huggingface:lastModified"
            }
            Key::HubCreatedAt => "BOM.metadata.component.properties.huggingface:createdAt",
            Key::HubLanguage => "BOM.metadata.component.properties.huggingface:language",
            Key::HubUsedStorage => "BOM.metadata.component.properties.huggingface:usedStorage",
            Key::HubPrivate => "BOM.metadata.component.properties.huggingface:private",
            Key::HubLibraryName => "BOM.metadata.component.properties.huggingface:libraryName",
            Key::HubDownloads => "BOM.metadata.component.properties.huggingface:downloads",
            Key::HubLikes => "BOM.metadata.component.properties.huggingface:likes",
            Key::HubBaseModel => "BOM.metadata.component.properties.huggingface:baseModel",
            Key::HubModelCardContact => {
                "BOM.metadata.component.properties.huggingface:modelCardContact"
            }
            Key::ModelCardTask => "BOM.metadata.component.modelCard.modelParameters.task",
            Key::ModelCardArchitectureFamily => {
                "BOM.metadata.component.modelCard.modelParameters.architectureFamily"
            }
            Key::ModelCardModelArchitecture => {
                "BOM.metadata.component.modelCard.modelParameters.modelArchitecture"
            }
            Key::ModelCardDatasets => {
                "BOM.metadata.component.modelCard.modelParameters.datasets"
            }
            Key::ModelCardUseCases => {
                "BOM.metadata.component.modelCard.considerations.useCases"
            }
            Key::ModelCardTechnicalLimitations => {
                "BOM.metadata.component.modelCard.considerations.technicalLimitations"
            }
            Key::ModelCardEthicalConsiderations => {
                "BOM.metadata.component.modelCard.considerations.ethicalConsiderations"
            }
            Key::ModelCardPerformanceMetrics => {
                "BOM.metadata.component.modelCard.quantitativeAnalysis.performanceMetrics"
            }
            Key::ModelCardEnvironmentalConsiderations => {
                "BOM.metadata.component.modelCard.considerations.environmentalConsiderations.properties"
            }
            Key::Evidence => "aibomgen.evidence",
        }
    }

    /// For property-backed keys, the `Property.name` they are stored under.
    pub fn property_name(&self) -> Option<&'static str> {
        self.as_str()
            .strip_prefix("BOM.metadata.component.properties.")
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dataset-entity field keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    Name,
    ExternalReferences,
    Tags,
    Licenses,
    Description,
    Manufacturer,
    Group,
    Contents,
    SensitiveData,
    Classification,
    Governance,
    Hashes,
    Contact,
    CreatedAt,
    UsedStorage,
    LastModified,
}

impl DatasetKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKey::Name => "BOM.components[DATA].name",
            DatasetKey::ExternalReferences => "BOM.components[DATA].externalReferences",
            DatasetKey::Tags => "BOM.components[DATA].tags",
            DatasetKey::Licenses => "BOM.components[DATA].licenses",
            DatasetKey::Description => "BOM.components[DATA].data.description",
            DatasetKey::Manufacturer => "BOM.components[DATA].manufacturer",
            DatasetKey::Group => "BOM.components[DATA].group",
            DatasetKey::Contents => "BOM.components[DATA].data.contents.attachments",
            DatasetKey::SensitiveData => "BOM.components[DATA].data.sensitiveData",
            DatasetKey::Classification => "BOM.components[DATA].data.classification",
            DatasetKey::Governance => "BOM.components[DATA].data.governance",
            DatasetKey::Hashes => "BOM.components[DATA].hashes",
            DatasetKey::Contact => "BOM.components[DATA].properties.contact",
            DatasetKey::CreatedAt => "BOM.components[DATA].properties.createdAt",
            DatasetKey::UsedStorage => "BOM.components[DATA].properties.usedStorage",
            DatasetKey::LastModified => "BOM.components[DATA].tags.lastModified",
        }
    }
}

impl std::fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
