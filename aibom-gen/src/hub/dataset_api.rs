//! Hub dataset API records
//!
//! Decoded response of `GET {hub}/api/datasets/{id}`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::client::{HubClient, HubError};
use super::model_api::Gated;

/// Decoded response from `GET {hub}/api/datasets/{id}`.
///
/// Fields the hub omits or nulls decode to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub author: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub sha: String,
    #[serde(
        default,
        rename = "lastModified",
        deserialize_with = "crate::hub::null_default"
    )]
    pub last_modified: String,
    #[serde(
        default,
        rename = "createdAt",
        deserialize_with = "crate::hub::null_default"
    )]
    pub created_at: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub private: bool,
    #[serde(default)]
    pub gated: Option<Gated>,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub downloads: i64,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub likes: i64,
    #[serde(
        default,
        rename = "usedStorage",
        deserialize_with = "crate::hub::null_default"
    )]
    pub used_storage: i64,
    #[serde(default, rename = "cardData")]
    pub card_data: Option<HashMap<String, serde_json::Value>>,
}

impl HubClient {
    /// Fetch dataset metadata for `dataset_id`.
    pub async fn fetch_dataset(&self, dataset_id: &str) -> Result<DatasetRecord, HubError> {
        let trimmed = dataset_id.trim().trim_start_matches('/');
        self.get_json(&format!("/api/datasets/{}", trimmed)).await
    }
}
