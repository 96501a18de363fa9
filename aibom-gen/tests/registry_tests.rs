//! Registry engine tests: source priority, non-overwrite/force semantics,
//! idempotence, and a full fixture where every weighted field is present.

use aibom_common::bom::{Bom, Component, ComponentType, Metadata, ModelCard};
use aibom_gen::completeness;
use aibom_gen::hub::{
    parse_dataset_readme_card, parse_readme_card, DatasetRecord, ModelConfig, ModelRecord,
};
use aibom_gen::metadata::{
    apply::{apply_dataset_from_sources, apply_from_sources, apply_user_value},
    dataset_registry, model_registry, DatasetSource, DatasetTarget, Key, Source, Target,
};
use aibom_gen::scanner::Discovery;

const FULL_MODEL_README: &str = r#"---
license: mit
tags:
  - text-generation
datasets:
  - glue
metrics:
  - accuracy
base_model: org/base
model-index:
  - name: full-model
    results:
      - task:
          type: text-generation
          name: Text Generation
        metrics:
          - type: perplexity
            value: 12.3
---

# Card

- **Developed by:** hf-team
- **Paper [optional]:** https://arxiv.org/abs/1234.5678
- **Demo:** https://example.org/demo

## Direct Use

Generate text.

## Out-of-Scope Use

Medical advice.

## Bias, Risks, and Limitations

Known biases exist.

### Recommendations

Review outputs.

## Environmental Impact

- **Hardware Type:** A100
- **Hours used:** 400
- **Cloud Provider:** AWS
- **Compute Region:** us-east-1
- **Carbon Emitted** *(estimate)*: 149.2 kg eq. CO2

## Model Card Contact

cards@example.org
"#;

const FULL_DATASET_README: &str = r#"---
license: cc-by-4.0
language:
  - en
annotations_creators:
  - crowdsourced
  - expert-generated
configs:
  - config_name: default
    data_files:
      - split: train
        path: data/train.parquet
---

# Dataset Card

## Dataset Description

A benchmark of sentence understanding tasks.

- **Curated by:** NYU
- **Funded by [optional]:** NSF
- **Shared by [optional]:** nyu-mll

## Out-of-Scope Use

Production decisions.

## Personal and Sensitive Information

None collected.

## Dataset Card Contact

datasets@example.org
"#;

fn full_model_source() -> Source {
    Source {
        model_id: "org/model".to_string(),
        scan: Discovery {
            id: "org/model".to_string(),
            name: "org/model".to_string(),
            discovery_type: "model".to_string(),
            path: "train.py".to_string(),
            evidence: "from_pretrained at line 1: x".to_string(),
            method: "from_pretrained".to_string(),
        },
        hub: Some(ModelRecord {
            id: "org/model".to_string(),
            model_id: "org/model".to_string(),
            author: "org".to_string(),
            pipeline_tag: "text-generation".to_string(),
            library_name: "transformers".to_string(),
            tags: vec!["license:mit".to_string(), "dataset:glue".to_string()],
            sha: "ABC123".to_string(),
            downloads: 10,
            likes: 2,
            last_modified: "2026-01-01T00:00:00Z".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            private: false,
            used_storage: 1024,
            card_data: serde_json::from_value(serde_json::json!({
                "license": "mit",
                "language": ["en"],
                "datasets": ["glue"],
            }))
            .ok(),
            config: ModelConfig {
                model_type: "opt".to_string(),
                architectures: vec!["OPTForCausalLM".to_string()],
            },
            ..ModelRecord::default()
        }),
        readme: Some(parse_readme_card(FULL_MODEL_README)),
    }
}

fn build_model_component(src: &Source) -> Component {
    let mut component = Component::new(ComponentType::MachineLearningModel, "");
    component.model_card = Some(ModelCard::default());
    let mut tgt = Target {
        component: &mut component,
        include_evidence_properties: true,
        hub_base_url: "https://huggingface.co/".to_string(),
    };
    for spec in model_registry() {
        apply_from_sources(&spec, src, &mut tgt);
    }
    component
}

fn wrap(component: Component) -> Bom {
    let mut bom = Bom::new();
    bom.metadata = Some(Metadata {
        component: Some(component),
        ..Metadata::default()
    });
    bom
}

#[test]
fn test_every_weighted_model_field_present_on_full_fixture() {
    let src = full_model_source();
    let bom = wrap(build_model_component(&src));

    for spec in model_registry() {
        if spec.weight > 0.0 {
            assert!(
                (spec.present)(&bom),
                "spec {} not present on full fixture",
                spec.key
            );
        }
    }

    let report = completeness::check(&bom);
    assert_eq!(report.score, 1.0, "missing: {:?}", report.missing_optional);
}

#[test]
fn test_registry_is_idempotent() {
    let src = full_model_source();
    let first = build_model_component(&src);

    let mut twice = first.clone();
    {
        let mut tgt = Target {
            component: &mut twice,
            include_evidence_properties: true,
            hub_base_url: "https://huggingface.co/".to_string(),
        };
        for spec in model_registry() {
            apply_from_sources(&spec, &src, &mut tgt);
        }
    }

    assert_eq!(first, twice);
}

#[test]
fn test_scan_name_wins_over_hub_id() {
    let mut src = full_model_source();
    src.scan.name = "local-alias".to_string();
    let component = build_model_component(&src);
    assert_eq!(component.name, "local-alias");
}

#[test]
fn test_hub_id_used_when_scan_name_empty() {
    let mut src = full_model_source();
    src.scan.name = String::new();
    src.hub.as_mut().unwrap().id = "hub/name".to_string();
    let component = build_model_component(&src);
    assert_eq!(component.name, "hub/name");
}

#[test]
fn test_license_priority_card_data_over_tag_over_readme() {
    // cardData wins.
    let src = full_model_source();
    let component = build_model_component(&src);
    let lic = &component.licenses.as_ref().unwrap()[0];
    assert_eq!(lic.license.as_ref().unwrap().name, "mit");

    // Without cardData, the license: tag wins.
    let mut src = full_model_source();
    src.hub.as_mut().unwrap().card_data = None;
    src.hub.as_mut().unwrap().tags = vec!["license:apache-2.0".to_string()];
    let component = build_model_component(&src);
    let lic = &component.licenses.as_ref().unwrap()[0];
    assert_eq!(lic.license.as_ref().unwrap().name, "apache-2.0");

    // Without hub data at all, the README front matter is the fallback.
    let mut src = full_model_source();
    src.hub = None;
    let component = build_model_component(&src);
    let lic = &component.licenses.as_ref().unwrap()[0];
    assert_eq!(lic.license.as_ref().unwrap().name, "mit");
}

#[test]
fn test_non_overwrite_preserves_prior_value_and_force_overwrites() {
    let src = full_model_source();
    let mut component = build_model_component(&src);

    let registry = model_registry();
    let tags_spec = registry
        .iter()
        .find(|s| s.key == Key::ComponentTags)
        .unwrap();

    // A later non-forced apply leaves the earlier tags in place.
    let before = component.tags.clone();
    {
        let mut tgt = Target {
            component: &mut component,
            include_evidence_properties: true,
            hub_base_url: String::new(),
        };
        let mut other = full_model_source();
        other.hub.as_mut().unwrap().tags = vec!["different".to_string()];
        apply_from_sources(tags_spec, &other, &mut tgt);
    }
    assert_eq!(component.tags, before);

    // force=true (user override) replaces them.
    {
        let mut tgt = Target {
            component: &mut component,
            include_evidence_properties: true,
            hub_base_url: String::new(),
        };
        apply_user_value(tags_spec, "override-a, override-b", &mut tgt).unwrap();
    }
    assert_eq!(
        component.tags.as_ref().unwrap(),
        &vec!["override-a".to_string(), "override-b".to_string()]
    );
}

#[test]
fn test_datasets_refs_are_normalized_and_deduped() {
    let src = full_model_source();
    let component = build_model_component(&src);
    let bom = wrap(component);
    let datasets = bom.model_parameters().unwrap().datasets.as_ref().unwrap();
    // cardData "glue" and tag "dataset:glue" collapse into one normalised ref.
    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].reference, "dataset:glue");
}

#[test]
fn test_language_joined_from_card_data_array() {
    let src = full_model_source();
    let component = build_model_component(&src);
    assert_eq!(component.property("huggingface:language"), Some("en"));
}

#[test]
fn test_every_weighted_dataset_field_present_on_full_fixture() {
    let src = DatasetSource {
        dataset_id: "nyu-mll/glue".to_string(),
        scan: Discovery {
            id: "nyu-mll/glue".to_string(),
            name: "nyu-mll/glue".to_string(),
            discovery_type: "dataset".to_string(),
            ..Discovery::default()
        },
        hub: Some(DatasetRecord {
            id: "nyu-mll/glue".to_string(),
            author: "nyu-mll".to_string(),
            sha: "DEF456".to_string(),
            last_modified: "2026-01-01T00:00:00Z".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            description: "GLUE benchmark".to_string(),
            downloads: 5,
            likes: 1,
            used_storage: 2048,
            tags: vec!["language:en".to_string()],
            card_data: serde_json::from_value(serde_json::json!({
                "license": "cc-by-4.0",
                "task_categories": ["text-classification"],
                "tags": ["benchmark"],
            }))
            .ok(),
            ..DatasetRecord::default()
        }),
        readme: Some(parse_dataset_readme_card(FULL_DATASET_README)),
    };

    let mut component = Component::new(ComponentType::Data, "");
    {
        let mut tgt = DatasetTarget {
            component: &mut component,
            include_evidence_properties: true,
            hub_base_url: "https://huggingface.co/".to_string(),
        };
        for spec in dataset_registry() {
            apply_dataset_from_sources(&spec, &src, &mut tgt);
        }
    }

    for spec in dataset_registry() {
        if spec.weight > 0.0 {
            assert!(
                (spec.present)(&component),
                "dataset spec {} not present on full fixture",
                spec.key
            );
        }
    }

    let report = completeness::check_dataset(&component);
    assert_eq!(report.score, 1.0, "missing: {:?}", report.missing_optional);
}
