//! Model-card field specs
//!
//! Populate `modelCard.modelParameters`, `considerations` and
//! `quantitativeAnalysis` on the model entity.

use aibom_common::bom::{DatasetChoice, EnvironmentalConsiderations, EthicalConsideration, PerformanceMetric, Property};

use super::helpers::{
    bom_component, bom_model_parameters, ensure_considerations, ensure_model_card,
    ensure_model_parameters, ensure_quantitative_analysis, extract_datasets,
    normalize_dataset_ref,
};
use super::keys::Key;
use super::parse::{
    parse_comma_list, parse_dataset_refs, parse_ethical_considerations, parse_non_empty_string,
    parse_performance_metrics, parse_properties,
};
use super::value::{FieldError, FieldValue};
use super::FieldSpec;
use crate::hub::markdown::normalize_strings;

pub(super) fn model_card_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            key: Key::ModelCardTask,
            weight: 1.0,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let s = src.hub.as_ref()?.pipeline_tag.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.readme.as_ref()?.task_type.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
            ],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "task"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("task"))?
                    .to_string();
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    if let Some(mp) = &card.model_parameters {
                        if mp.task.as_deref().map(str::trim).filter(|t| !t.is_empty()).is_some() {
                            return Ok(());
                        }
                    }
                }
                ensure_model_parameters(card).task = Some(s);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_model_parameters(bom)
                    .and_then(|mp| mp.task.as_deref())
                    .map(|t| !t.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardArchitectureFamily,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let s = src.hub.as_ref()?.config.model_type.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "architectureFamily"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("architectureFamily"))?
                    .to_string();
                let card = ensure_model_card(tgt.component);
                ensure_model_parameters(card).architecture_family = Some(s);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_model_parameters(bom)
                    .and_then(|mp| mp.architecture_family.as_deref())
                    .map(|t| !t.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardModelArchitecture,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let archs = &src.hub.as_ref()?.config.architectures;
                let s = archs.first()?.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "modelArchitecture"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("modelArchitecture"))?
                    .to_string();
                let card = ensure_model_card(tgt.component);
                ensure_model_parameters(card).model_architecture = Some(s);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_model_parameters(bom)
                    .and_then(|mp| mp.model_architecture.as_deref())
                    .map(|t| !t.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardDatasets,
            weight: 0.5,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let hub = src.hub.as_ref()?;
                    let refs = extract_datasets(hub.card_data.as_ref(), &hub.tags);
                    if refs.is_empty() {
                        return None;
                    }
                    let choices = refs
                        .into_iter()
                        .map(|reference| DatasetChoice { reference })
                        .collect();
                    Some(FieldValue::Datasets(choices))
                }),
                Box::new(|src| {
                    let refs = normalize_strings(src.readme.as_ref()?.datasets.clone());
                    if refs.is_empty() {
                        return None;
                    }
                    let choices = refs
                        .into_iter()
                        .map(|r| DatasetChoice {
                            reference: normalize_dataset_ref(&r),
                        })
                        .collect();
                    Some(FieldValue::Datasets(choices))
                }),
            ],
            parse: Some(Box::new(parse_dataset_refs)),
            apply: Box::new(|tgt, input| {
                let FieldValue::Datasets(choices) = &input.value else {
                    return Err(FieldError::InvalidInput(Key::ModelCardDatasets.to_string()));
                };
                if choices.is_empty() {
                    return Err(FieldError::EmptyValue("datasets"));
                }
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    let already = card
                        .model_parameters
                        .as_ref()
                        .and_then(|mp| mp.datasets.as_ref())
                        .map(|d| !d.is_empty())
                        .unwrap_or(false);
                    if already {
                        return Ok(());
                    }
                }
                ensure_model_parameters(card).datasets = Some(choices.clone());
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_model_parameters(bom)
                    .and_then(|mp| mp.datasets.as_ref())
                    .map(|ds| ds.iter().any(|d| !d.reference.trim().is_empty()))
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardUseCases,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let readme = src.readme.as_ref()?;
                let mut use_cases = Vec::new();
                let direct = readme.direct_use.trim();
                if !direct.is_empty() {
                    use_cases.push(direct.to_string());
                }
                let oos = readme.out_of_scope_use.trim();
                if !oos.is_empty() {
                    use_cases.push(format!("out-of-scope: {}", oos));
                }
                let use_cases = normalize_strings(use_cases);
                (!use_cases.is_empty()).then_some(FieldValue::List(use_cases))
            })],
            parse: Some(Box::new(|v| parse_comma_list(v, "useCases"))),
            apply: Box::new(|tgt, input| {
                let cases = input
                    .value
                    .as_list()
                    .filter(|c| !c.is_empty())
                    .ok_or(FieldError::EmptyValue("useCases"))?
                    .to_vec();
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    let already = card
                        .considerations
                        .as_ref()
                        .and_then(|c| c.use_cases.as_ref())
                        .map(|u| !u.is_empty())
                        .unwrap_or(false);
                    if already {
                        return Ok(());
                    }
                }
                ensure_considerations(card).use_cases = Some(cases);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.model_card.as_ref())
                    .and_then(|mc| mc.considerations.as_ref())
                    .and_then(|c| c.use_cases.as_ref())
                    .map(|u| !u.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardTechnicalLimitations,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let s = src.readme.as_ref()?.bias_risks_limitations.trim();
                (!s.is_empty()).then(|| FieldValue::List(vec![s.to_string()]))
            })],
            parse: Some(Box::new(|v| parse_comma_list(v, "technicalLimitations"))),
            apply: Box::new(|tgt, input| {
                let vals = input
                    .value
                    .as_list()
                    .filter(|v| !v.is_empty())
                    .ok_or(FieldError::EmptyValue("technicalLimitations"))?
                    .to_vec();
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    let already = card
                        .considerations
                        .as_ref()
                        .and_then(|c| c.technical_limitations.as_ref())
                        .map(|t| !t.is_empty())
                        .unwrap_or(false);
                    if already {
                        return Ok(());
                    }
                }
                ensure_considerations(card).technical_limitations = Some(vals);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.model_card.as_ref())
                    .and_then(|mc| mc.considerations.as_ref())
                    .and_then(|c| c.technical_limitations.as_ref())
                    .map(|t| !t.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardEthicalConsiderations,
            weight: 0.25,
            required: false,
            sources: vec![Box::new(|src| {
                let readme = src.readme.as_ref()?;
                let name = readme.bias_risks_limitations.trim();
                let mitigation = readme.bias_recommendations.trim();
                if name.is_empty() && mitigation.is_empty() {
                    return None;
                }
                let name = if name.is_empty() {
                    "bias_risks_limitations"
                } else {
                    name
                };
                Some(FieldValue::Ethics(vec![EthicalConsideration {
                    name: name.to_string(),
                    mitigation_strategy: mitigation.to_string(),
                }]))
            })],
            parse: Some(Box::new(parse_ethical_considerations)),
            apply: Box::new(|tgt, input| {
                let FieldValue::Ethics(ethics) = &input.value else {
                    return Err(FieldError::InvalidInput(
                        Key::ModelCardEthicalConsiderations.to_string(),
                    ));
                };
                if ethics.is_empty() {
                    return Err(FieldError::EmptyValue("ethicalConsiderations"));
                }
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    let already = card
                        .considerations
                        .as_ref()
                        .and_then(|c| c.ethical_considerations.as_ref())
                        .map(|e| !e.is_empty())
                        .unwrap_or(false);
                    if already {
                        return Ok(());
                    }
                }
                ensure_considerations(card).ethical_considerations = Some(ethics.clone());
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.model_card.as_ref())
                    .and_then(|mc| mc.considerations.as_ref())
                    .and_then(|c| c.ethical_considerations.as_ref())
                    .map(|e| !e.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardPerformanceMetrics,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let readme = src.readme.as_ref()?;
                let mut metrics: Vec<PerformanceMetric> = Vec::new();

                for m in &readme.model_index_metrics {
                    let metric_type = m.metric_type.trim();
                    let value = m.value.trim();
                    if metric_type.is_empty() && value.is_empty() {
                        continue;
                    }
                    metrics.push(PerformanceMetric {
                        metric_type: metric_type.to_string(),
                        value: value.to_string(),
                    });
                }

                // Front-matter metric names without values, deduped against
                // the model-index entries.
                for name in &readme.metrics {
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    if metrics.iter().any(|m| m.metric_type == name) {
                        continue;
                    }
                    metrics.push(PerformanceMetric {
                        metric_type: name.to_string(),
                        value: String::new(),
                    });
                }

                // Last resort: the testing-metrics / results sections.
                if metrics.is_empty() {
                    let testing = readme.testing_metrics.trim();
                    let results = readme.results.trim();
                    if !testing.is_empty() || !results.is_empty() {
                        metrics.push(PerformanceMetric {
                            metric_type: if testing.is_empty() {
                                "testing_metrics".to_string()
                            } else {
                                testing.to_string()
                            },
                            value: results.to_string(),
                        });
                    }
                }

                (!metrics.is_empty()).then_some(FieldValue::Metrics(metrics))
            })],
            parse: Some(Box::new(parse_performance_metrics)),
            apply: Box::new(|tgt, input| {
                let FieldValue::Metrics(metrics) = &input.value else {
                    return Err(FieldError::InvalidInput(
                        Key::ModelCardPerformanceMetrics.to_string(),
                    ));
                };
                if metrics.is_empty() {
                    return Err(FieldError::EmptyValue("performanceMetrics"));
                }
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    let already = card
                        .quantitative_analysis
                        .as_ref()
                        .and_then(|qa| qa.performance_metrics.as_ref())
                        .map(|m| !m.is_empty())
                        .unwrap_or(false);
                    if already {
                        return Ok(());
                    }
                }
                ensure_quantitative_analysis(card).performance_metrics = Some(metrics.clone());
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.model_card.as_ref())
                    .and_then(|mc| mc.quantitative_analysis.as_ref())
                    .and_then(|qa| qa.performance_metrics.as_ref())
                    .map(|m| !m.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ModelCardEnvironmentalConsiderations,
            weight: 0.25,
            required: false,
            sources: vec![Box::new(|src| {
                let readme = src.readme.as_ref()?;
                let mut props = Vec::new();
                let mut add = |name: &str, value: &str| {
                    let value = value.trim();
                    if !value.is_empty() {
                        props.push(Property {
                            name: name.to_string(),
                            value: value.to_string(),
                        });
                    }
                };
                add("hardwareType", &readme.environmental_hardware_type);
                add("hoursUsed", &readme.environmental_hours_used);
                add("cloudProvider", &readme.environmental_cloud_provider);
                add("computeRegion", &readme.environmental_compute_region);
                add("carbonEmitted", &readme.environmental_carbon_emitted);
                (!props.is_empty()).then_some(FieldValue::Properties(props))
            })],
            parse: Some(Box::new(parse_properties)),
            apply: Box::new(|tgt, input| {
                let FieldValue::Properties(props) = &input.value else {
                    return Err(FieldError::InvalidInput(
                        Key::ModelCardEnvironmentalConsiderations.to_string(),
                    ));
                };
                if props.is_empty() {
                    return Err(FieldError::EmptyValue("environmentalConsiderations"));
                }
                let card = ensure_model_card(tgt.component);
                if !input.force {
                    let already = card
                        .considerations
                        .as_ref()
                        .and_then(|c| c.environmental_considerations.as_ref())
                        .and_then(|e| e.properties.as_ref())
                        .map(|p| !p.is_empty())
                        .unwrap_or(false);
                    if already {
                        return Ok(());
                    }
                }
                let cons = ensure_considerations(card);
                cons.environmental_considerations
                    .get_or_insert_with(EnvironmentalConsiderations::default)
                    .properties = Some(props.clone());
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.model_card.as_ref())
                    .and_then(|mc| mc.considerations.as_ref())
                    .and_then(|c| c.environmental_considerations.as_ref())
                    .and_then(|e| e.properties.as_ref())
                    .map(|p| !p.is_empty())
                    .unwrap_or(false)
            }),
        },
    ]
}
