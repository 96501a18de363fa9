//! Component-level field specs for the model entity

use aibom_common::bom::{ExternalReference, Hash, LicenseChoice, OrganizationalEntity};

use super::helpers::{bom_component, bom_has_component_name, extract_license};
use super::keys::Key;
use super::parse::{parse_non_empty_string, parse_tags_preserve_empty};
use super::value::{ExternalLinks, FieldError, FieldValue, ScanEvidence};
use super::FieldSpec;
use crate::hub::markdown::normalize_strings;

pub(super) fn component_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec {
            key: Key::ComponentName,
            weight: 1.0,
            required: true,
            sources: vec![
                Box::new(|src| {
                    let s = src.scan.name.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.hub.as_ref()?.id.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.hub.as_ref()?.model_id.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.model_id.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
            ],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "name"))),
            apply: Box::new(|tgt, input| {
                let name = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("name"))?;
                tgt.component.name = name.to_string();
                Ok(())
            }),
            present: Box::new(bom_has_component_name),
        },
        FieldSpec {
            key: Key::ComponentExternalReferences,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let model_id = src.model_id.trim();
                if model_id.is_empty() {
                    return None;
                }
                let mut links = ExternalLinks {
                    id: model_id.to_string(),
                    ..ExternalLinks::default()
                };
                if let Some(readme) = &src.readme {
                    links.paper_url = readme.paper_url.trim().to_string();
                    links.demo_url = readme.demo_url.trim().to_string();
                }
                Some(FieldValue::Links(links))
            })],
            parse: Some(Box::new(|v| {
                parse_non_empty_string(v, "externalReferences")
            })),
            apply: Box::new(|tgt, input| {
                let refs = match &input.value {
                    // User override: a single website URL.
                    FieldValue::Text(url) => {
                        let url = url.trim();
                        if url.is_empty() {
                            return Err(FieldError::EmptyValue("externalReferences"));
                        }
                        vec![ExternalReference {
                            reference_type: "website".to_string(),
                            url: url.to_string(),
                        }]
                    }
                    FieldValue::Links(links) => {
                        let mut base = tgt.hub_base_url.trim().to_string();
                        if base.is_empty() {
                            base = "https://huggingface.co/".to_string();
                        }
                        if !base.ends_with('/') {
                            base.push('/');
                        }
                        let mut refs = vec![ExternalReference {
                            reference_type: "website".to_string(),
                            url: format!("{}{}", base, links.id.trim_start_matches('/')),
                        }];
                        if !links.paper_url.is_empty() {
                            refs.push(ExternalReference {
                                reference_type: "documentation".to_string(),
                                url: links.paper_url.clone(),
                            });
                        }
                        if !links.demo_url.is_empty() {
                            refs.push(ExternalReference {
                                reference_type: "other".to_string(),
                                url: links.demo_url.clone(),
                            });
                        }
                        refs
                    }
                    _ => {
                        return Err(FieldError::InvalidInput(
                            Key::ComponentExternalReferences.to_string(),
                        ))
                    }
                };
                tgt.component.external_references = Some(refs);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.external_references.as_ref())
                    .map(|r| !r.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ComponentTags,
            weight: 0.5,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let tags = normalize_strings(src.hub.as_ref()?.tags.clone());
                    (!tags.is_empty()).then_some(FieldValue::List(tags))
                }),
                Box::new(|src| {
                    let tags = normalize_strings(src.readme.as_ref()?.tags.clone());
                    (!tags.is_empty()).then_some(FieldValue::List(tags))
                }),
            ],
            parse: Some(Box::new(|v| parse_tags_preserve_empty(v, "tags"))),
            apply: Box::new(|tgt, input| {
                let tags = input
                    .value
                    .as_list()
                    .filter(|t| !t.is_empty())
                    .ok_or(FieldError::EmptyValue("tags"))?;
                if !input.force
                    && tgt
                        .component
                        .tags
                        .as_ref()
                        .map(|t| !t.is_empty())
                        .unwrap_or(false)
                {
                    return Ok(());
                }
                tgt.component.tags = Some(tags.to_vec());
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.tags.as_ref())
                    .map(|t| !t.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ComponentLicenses,
            weight: 1.0,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let hub = src.hub.as_ref()?;
                    let lic = extract_license(hub.card_data.as_ref(), &hub.tags);
                    (!lic.is_empty()).then_some(FieldValue::Text(lic))
                }),
                Box::new(|src| {
                    let lic = src.readme.as_ref()?.license.trim();
                    (!lic.is_empty()).then(|| FieldValue::Text(lic.to_string()))
                }),
            ],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "license"))),
            apply: Box::new(|tgt, input| {
                let lic = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("license"))?;
                if !input.force
                    && tgt
                        .component
                        .licenses
                        .as_ref()
                        .map(|l| !l.is_empty())
                        .unwrap_or(false)
                {
                    return Ok(());
                }
                tgt.component.licenses = Some(vec![LicenseChoice::named(lic)]);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.licenses.as_ref())
                    .map(|l| !l.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ComponentHashes,
            weight: 1.0,
            required: false,
            sources: vec![Box::new(|src| {
                let sha = src.hub.as_ref()?.sha.trim();
                (!sha.is_empty()).then(|| FieldValue::Text(sha.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "hash"))),
            apply: Box::new(|tgt, input| {
                let sha = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("hash"))?;
                tgt.component.hashes = Some(vec![Hash::sha1(sha)]);
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.hashes.as_ref())
                    .map(|h| !h.is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ComponentManufacturer,
            weight: 0.5,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let s = src.hub.as_ref()?.author.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.readme.as_ref()?.developed_by.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
            ],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "manufacturer"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("manufacturer"))?;
                if !input.force
                    && tgt
                        .component
                        .manufacturer
                        .as_ref()
                        .map(|m| !m.name.trim().is_empty())
                        .unwrap_or(false)
                {
                    return Ok(());
                }
                tgt.component.manufacturer = Some(OrganizationalEntity {
                    name: s.to_string(),
                });
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.manufacturer.as_ref())
                    .map(|m| !m.name.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        FieldSpec {
            key: Key::ComponentGroup,
            weight: 0.25,
            required: false,
            sources: vec![
                // First path segment of the model id, when namespaced.
                Box::new(|src| {
                    let id = src.model_id.trim();
                    let (ns, _) = id.split_once('/')?;
                    let ns = ns.trim();
                    (!ns.is_empty()).then(|| FieldValue::Text(ns.to_string()))
                }),
                Box::new(|src| {
                    let s = src.hub.as_ref()?.author.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.readme.as_ref()?.developed_by.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
            ],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "group"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("group"))?;
                if !input.force
                    && tgt
                        .component
                        .group
                        .as_ref()
                        .map(|g| !g.trim().is_empty())
                        .unwrap_or(false)
                {
                    return Ok(());
                }
                tgt.component.group = Some(s.to_string());
                Ok(())
            }),
            present: Box::new(|bom| {
                bom_component(bom)
                    .and_then(|c| c.group.as_ref())
                    .map(|g| !g.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
    ]
}

pub(super) fn evidence_fields() -> Vec<FieldSpec> {
    vec![FieldSpec {
        key: Key::Evidence,
        weight: 0.0,
        required: false,
        sources: vec![Box::new(|src| {
            Some(FieldValue::Evidence(ScanEvidence {
                discovery_type: src.scan.discovery_type.clone(),
                evidence: src.scan.evidence.clone(),
                path: src.scan.path.clone(),
            }))
        })],
        parse: None,
        apply: Box::new(|tgt, input| {
            let FieldValue::Evidence(ev) = &input.value else {
                return Err(FieldError::InvalidInput(Key::Evidence.to_string()));
            };
            if !tgt.include_evidence_properties {
                return Ok(());
            }
            tgt.component.set_property("aibomgen.type", &ev.discovery_type);
            tgt.component.set_property("aibomgen.evidence", &ev.evidence);
            tgt.component.set_property("aibomgen.path", &ev.path);
            Ok(())
        }),
        present: Box::new(|_| true),
    }]
}
