//! Hub model API records
//!
//! Decoded response of `GET {hub}/api/models/{id}`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::client::{HubClient, HubError};

/// Gating status of a hub repo: the API returns either a boolean or a
/// constrained string tag (e.g. "auto", "manual"). Decoding preserves which
/// variant appeared; JSON null and missing fields stay absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gated {
    Flag(bool),
    Tag(String),
}

/// `config` sub-object of a model record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub model_type: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub architectures: Vec<String>,
}

/// Decoded response from `GET {hub}/api/models/{id}`.
///
/// Fields the hub omits or nulls decode to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub id: String,
    #[serde(
        default,
        rename = "modelId",
        deserialize_with = "crate::hub::null_default"
    )]
    pub model_id: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub author: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub pipeline_tag: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub library_name: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub license: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub sha: String,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub downloads: i64,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub likes: i64,
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
    #[serde(default)]
    pub gated: Option<Gated>,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub private: bool,
    #[serde(
        default,
        rename = "usedStorage",
        deserialize_with = "crate::hub::null_default"
    )]
    pub used_storage: i64,
    /// Free-form key/value bag from the model card front matter.
    #[serde(default, rename = "cardData")]
    pub card_data: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "crate::hub::null_default")]
    pub config: ModelConfig,
}

impl HubClient {
    /// Fetch model metadata for `model_id`.
    pub async fn fetch_model(&self, model_id: &str) -> Result<ModelRecord, HubError> {
        let trimmed = model_id.trim().trim_start_matches('/');
        self.get_json(&format!("/api/models/{}", trimmed)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gated_decodes_bool() {
        let record: ModelRecord =
            serde_json::from_str(r#"{"id":"org/m","gated":false}"#).unwrap();
        assert_eq!(record.gated, Some(Gated::Flag(false)));
    }

    #[test]
    fn test_gated_decodes_string() {
        let record: ModelRecord =
            serde_json::from_str(r#"{"id":"org/m","gated":"auto"}"#).unwrap();
        assert_eq!(record.gated, Some(Gated::Tag("auto".into())));
    }

    #[test]
    fn test_gated_null_and_missing_are_absent() {
        let record: ModelRecord = serde_json::from_str(r#"{"id":"org/m","gated":null}"#).unwrap();
        assert_eq!(record.gated, None);
        let record: ModelRecord = serde_json::from_str(r#"{"id":"org/m"}"#).unwrap();
        assert_eq!(record.gated, None);
    }

    #[test]
    fn test_model_record_decode() {
        let raw = r#"{
            "id": "facebook/opt-1.3b",
            "modelId": "facebook/opt-1.3b",
            "author": "facebook",
            "pipeline_tag": "text-generation",
            "library_name": "transformers",
            "tags": ["license:mit", "dataset:glue"],
            "sha": "ABC123",
            "downloads": 120,
            "likes": 7,
            "lastModified": "2024-02-01T00:00:00.000Z",
            "createdAt": "2022-05-11T00:00:00.000Z",
            "private": false,
            "usedStorage": 2640000000,
            "cardData": {"license": "mit", "datasets": ["glue"]},
            "config": {"model_type": "opt", "architectures": ["OPTForCausalLM"]}
        }"#;
        let record: ModelRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, "facebook/opt-1.3b");
        assert_eq!(record.pipeline_tag, "text-generation");
        assert_eq!(record.config.model_type, "opt");
        assert_eq!(record.config.architectures, vec!["OPTForCausalLM"]);
        assert_eq!(record.used_storage, 2_640_000_000);
        let card = record.card_data.unwrap();
        assert_eq!(card["license"], serde_json::json!("mit"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let record: ModelRecord =
            serde_json::from_str(r#"{"id":"org/m","spaces":["x"],"siblings":[]}"#).unwrap();
        assert_eq!(record.id, "org/m");
    }

    #[test]
    fn test_null_fields_fold_to_defaults() {
        let record: ModelRecord = serde_json::from_str(
            r#"{"id":"org/m","author":null,"tags":null,"downloads":null,"config":null,"cardData":null}"#,
        )
        .unwrap();
        assert_eq!(record.author, "");
        assert!(record.tags.is_empty());
        assert_eq!(record.downloads, 0);
        assert_eq!(record.config, ModelConfig::default());
        assert!(record.card_data.is_none());
    }
}
