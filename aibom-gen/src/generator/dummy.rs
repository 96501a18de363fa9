//! Dummy generation mode
//!
//! Produces one fully populated document from fixture records without
//! scanning or touching the network. Useful for demos and for exercising
//! downstream consumers of the document shape.

use crate::builder::{add_dependencies, BomBuilder, BuildContext, BuildError, DatasetBuildContext};
use crate::hub::{parse_dataset_readme_card, parse_readme_card, DatasetRecord, ModelConfig, ModelRecord};
use crate::scanner::Discovery;

use super::DiscoveredBom;

const DUMMY_MODEL_ID: &str = "dummy-org/dummy-model";
const DUMMY_DATASET_ID: &str = "dummy-org/dummy-dataset";

const DUMMY_MODEL_README: &str = r#"---
license: apache-2.0
tags:
  - text-classification
datasets:
  - dummy-org/dummy-dataset
metrics:
  - accuracy
base_model: dummy-org/dummy-base
model-index:
  - name: dummy-model
    results:
      - task:
          type: text-classification
          name: Text Classification
        metrics:
          - type: accuracy
            value: 0.84
---

# Dummy Model

- **Developed by:** dummy-org
- **Paper [optional]:** https://example.org/paper
- **Demo:** https://example.org/demo

## Direct Use

Sentiment analysis and intent classification.

## Out-of-Scope Use

Not suitable for non-English text.

## Bias, Risks, and Limitations

Bias in training data.

### Recommendations

Careful dataset curation.

## Environmental Impact

- **Hardware Type:** NVIDIA V100
- **Hours used:** 1000
- **Cloud Provider:** AWS
- **Compute Region:** us-east-1
- **Carbon Emitted** *(estimate)*: 0.5 tCO2eq

## Model Card Contact

dummy@example.org
"#;

const DUMMY_DATASET_README: &str = r#"---
license: cc-by-4.0
language:
  - en
annotations_creators:
  - crowdsourced
configs:
  - config_name: default
    data_files:
      - split: train
        path: data/train.parquet
---

# Dummy Dataset

## Dataset Description

A synthetic corpus for demos.

- **Curated by:** dummy-org
- **Funded by [optional]:** dummy-fund
- **Shared by [optional]:** dummy-org

## Dataset Card Contact

datasets@example.org
"#;

fn dummy_model_record() -> ModelRecord {
    ModelRecord {
        id: DUMMY_MODEL_ID.to_string(),
        model_id: DUMMY_MODEL_ID.to_string(),
        author: "dummy-org".to_string(),
        pipeline_tag: "text-classification".to_string(),
        library_name: "transformers".to_string(),
        tags: vec![
            "license:apache-2.0".to_string(),
            format!("dataset:{}", DUMMY_DATASET_ID),
            "language:en".to_string(),
        ],
        sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
        downloads: 1200,
        likes: 42,
        last_modified: "2026-01-01T00:00:00.000Z".to_string(),
        created_at: "2025-06-01T00:00:00.000Z".to_string(),
        private: false,
        used_storage: 440_000_000,
        card_data: serde_json::from_value(serde_json::json!({
            "license": "apache-2.0",
            "datasets": [DUMMY_DATASET_ID],
            "language": ["en"],
        }))
        .ok(),
        config: ModelConfig {
            model_type: "bert".to_string(),
            architectures: vec!["BertForSequenceClassification".to_string()],
        },
        ..ModelRecord::default()
    }
}

fn dummy_dataset_record() -> DatasetRecord {
    DatasetRecord {
        id: DUMMY_DATASET_ID.to_string(),
        author: "dummy-org".to_string(),
        sha: "89abcdef0123456789abcdef0123456789abcdef".to_string(),
        last_modified: "2025-12-01T00:00:00.000Z".to_string(),
        created_at: "2025-05-01T00:00:00.000Z".to_string(),
        description: "A synthetic corpus for demos.".to_string(),
        downloads: 300,
        likes: 5,
        used_storage: 1_000_000,
        card_data: serde_json::from_value(serde_json::json!({
            "license": "cc-by-4.0",
            "task_categories": ["text-classification"],
        }))
        .ok(),
        ..DatasetRecord::default()
    }
}

/// Build a single comprehensive dummy document with all fields populated.
pub fn build_dummy() -> Result<Vec<DiscoveredBom>, BuildError> {
    let builder = BomBuilder::default();

    let discovery = Discovery {
        id: DUMMY_MODEL_ID.to_string(),
        name: "dummy-model".to_string(),
        discovery_type: "huggingface".to_string(),
        path: "/dummy/path".to_string(),
        evidence: format!("from_pretrained('{}')", DUMMY_MODEL_ID),
        method: "from_pretrained".to_string(),
    };

    let mut bom = builder.build(BuildContext {
        model_id: DUMMY_MODEL_ID.to_string(),
        scan: discovery.clone(),
        hub: Some(dummy_model_record()),
        readme: Some(parse_readme_card(DUMMY_MODEL_README)),
    })?;

    let dataset = builder.build_dataset(DatasetBuildContext {
        dataset_id: DUMMY_DATASET_ID.to_string(),
        scan: Discovery {
            id: DUMMY_DATASET_ID.to_string(),
            name: DUMMY_DATASET_ID.to_string(),
            discovery_type: "dataset".to_string(),
            ..Discovery::default()
        },
        hub: Some(dummy_dataset_record()),
        readme: Some(parse_dataset_readme_card(DUMMY_DATASET_README)),
    })?;
    bom.components.get_or_insert_with(Vec::new).push(dataset);

    add_dependencies(&mut bom);

    Ok(vec![DiscoveredBom { discovery, bom }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibom_common::bom::ComponentType;

    #[test]
    fn test_dummy_document_shape() {
        let results = build_dummy().unwrap();
        assert_eq!(results.len(), 1);
        let bom = &results[0].bom;

        let model = bom.metadata_component().unwrap();
        assert_eq!(model.component_type, ComponentType::MachineLearningModel);
        assert_eq!(model.name, "dummy-model");
        assert!(model.licenses.as_ref().is_some_and(|l| !l.is_empty()));

        let components = bom.components.as_ref().unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].component_type, ComponentType::Data);

        let deps = bom.dependencies.as_ref().unwrap();
        assert_eq!(deps.len(), 2);
        assert!(deps[0].depends_on.as_ref().is_some_and(|d| d.len() == 1));
    }

    #[test]
    fn test_dummy_model_card_populated() {
        let results = build_dummy().unwrap();
        let mp = results[0].bom.model_parameters().unwrap();
        assert_eq!(mp.task.as_deref(), Some("text-classification"));
        assert_eq!(mp.architecture_family.as_deref(), Some("bert"));
        assert!(mp.datasets.as_ref().is_some_and(|d| !d.is_empty()));
    }
}
