//! Hub client and response parsers
//!
//! HTTP access to the model hub (JSON API + raw-file endpoints) and the
//! decoding of its responses: model/dataset records and README cards.

pub mod client;
pub mod dataset_api;
pub mod dataset_readme;
pub mod markdown;
pub mod model_api;
pub mod model_readme;

use serde::Deserialize;

pub use client::{HubClient, HubError, DEFAULT_HUB_URL};
pub use dataset_api::DatasetRecord;
pub use dataset_readme::{parse_dataset_readme_card, DatasetReadmeCard};
pub use model_api::{Gated, ModelConfig, ModelRecord};
pub use model_readme::{parse_readme_card, ModelReadmeCard};

/// The hub emits explicit `null` for absent fields; fold it into the
/// type's default the way a missing field would be.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    T: Default + Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
