//! Dataset field specs
//!
//! Populate dataset entities (`components[]`, type `data`): identity,
//! licensing, description, governance, contents and hub properties.

use aibom_common::bom::{
    AttachedText, DataContents, DataGovernance, ExternalReference, Hash, LicenseChoice,
    OrganizationalEntity, ResponsibleParty,
};

use super::keys::DatasetKey;
use super::parse::{parse_non_empty_string, parse_tags_preserve_empty};
use super::value::{ExternalLinks, FieldError, FieldValue};
use super::DatasetFieldSpec;
use crate::hub::markdown::normalize_strings;

pub(super) fn dataset_fields() -> Vec<DatasetFieldSpec> {
    vec![
        DatasetFieldSpec {
            key: DatasetKey::Name,
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
                    let s = src.dataset_id.trim();
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
            present: Box::new(|comp| !comp.name.trim().is_empty()),
        },
        DatasetFieldSpec {
            key: DatasetKey::ExternalReferences,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let dataset_id = src.dataset_id.trim();
                if dataset_id.is_empty() {
                    return None;
                }
                let mut links = ExternalLinks {
                    id: dataset_id.to_string(),
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
                        // Datasets live under the /datasets/ path on the hub.
                        let mut refs = vec![ExternalReference {
                            reference_type: "website".to_string(),
                            url: format!("{}datasets/{}", base, links.id.trim_start_matches('/')),
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
                            DatasetKey::ExternalReferences.to_string(),
                        ))
                    }
                };
                tgt.component.external_references = Some(refs);
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.external_references
                    .as_ref()
                    .map(|r| !r.is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Tags,
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
            present: Box::new(|comp| {
                comp.tags.as_ref().map(|t| !t.is_empty()).unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Licenses,
            weight: 0.8,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let lic = src.readme.as_ref()?.license.trim();
                    (!lic.is_empty()).then(|| FieldValue::Text(lic.to_string()))
                }),
                Box::new(|src| {
                    let card = src.hub.as_ref()?.card_data.as_ref()?;
                    let lic = card.get("license")?.as_str()?.trim();
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
                tgt.component.licenses = Some(vec![LicenseChoice::named(lic)]);
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.licenses
                    .as_ref()
                    .map(|l| !l.is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Description,
            weight: 0.7,
            required: false,
            sources: vec![
                Box::new(|src| {
                    let s = src.readme.as_ref()?.dataset_description.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
                Box::new(|src| {
                    let s = src.hub.as_ref()?.description.trim();
                    (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
                }),
            ],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "description"))),
            apply: Box::new(|tgt, input| {
                let desc = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("description"))?;
                tgt.component.ensure_data().description = Some(desc.to_string());
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.data_entry()
                    .and_then(|d| d.description.as_deref())
                    .map(|s| !s.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Manufacturer,
            weight: 0.6,
            required: false,
            sources: vec![Box::new(|src| {
                let creators = &src.readme.as_ref()?.annotation_creators;
                let s = creators.first()?.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "manufacturer"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("manufacturer"))?;
                tgt.component.manufacturer = Some(OrganizationalEntity {
                    name: s.to_string(),
                });
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.manufacturer
                    .as_ref()
                    .map(|m| !m.name.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Group,
            weight: 0.4,
            required: false,
            sources: vec![Box::new(|src| {
                let creators = &src.readme.as_ref()?.annotation_creators;
                let s = creators.get(1)?.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "group"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("group"))?;
                tgt.component.group = Some(s.to_string());
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.group
                    .as_ref()
                    .map(|g| !g.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Contents,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let configs = &src.readme.as_ref()?.configs;
                if configs.is_empty() {
                    return None;
                }
                let mut parts = Vec::new();
                for config in configs {
                    for df in &config.data_files {
                        parts.push(format!(
                            "config:{} split:{} path:{}",
                            config.name, df.split, df.path
                        ));
                    }
                }
                (!parts.is_empty()).then_some(FieldValue::List(parts))
            })],
            parse: None,
            apply: Box::new(|tgt, input| {
                let parts = input
                    .value
                    .as_list()
                    .filter(|p| !p.is_empty())
                    .ok_or(FieldError::EmptyValue("contents"))?;
                let data = tgt.component.ensure_data();
                data.contents
                    .get_or_insert_with(DataContents::default)
                    .attachment = Some(AttachedText {
                    content: parts.join("\n"),
                    content_type: Some("text/plain".to_string()),
                });
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.data_entry()
                    .and_then(|d| d.contents.as_ref())
                    .map(|c| c.attachment.is_some())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::SensitiveData,
            weight: 0.6,
            required: false,
            sources: vec![Box::new(|src| {
                let mut items = Vec::new();

                // Tags kept in the card data (hub API)
                if let Some(card) = src.hub.as_ref().and_then(|h| h.card_data.as_ref()) {
                    if let Some(serde_json::Value::Array(tags)) = card.get("tags") {
                        for tag in tags {
                            if let Some(s) = tag.as_str() {
                                items.push(s.to_string());
                            }
                        }
                    }
                }

                if let Some(readme) = &src.readme {
                    let oos = readme.out_of_scope_use.trim();
                    if !oos.is_empty() {
                        items.push(format!("out-of-scope: {}", oos));
                    }
                    let psi = readme.personal_sensitive_info.trim();
                    if !psi.is_empty() {
                        items.push(format!("personal-info: {}", psi));
                    }
                    let brl = readme.bias_risks_limitations.trim();
                    if !brl.is_empty() {
                        items.push(format!("bias-risks: {}", brl));
                    }
                }

                (!items.is_empty()).then_some(FieldValue::List(items))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "sensitive data"))),
            apply: Box::new(|tgt, input| {
                let items = match &input.value {
                    FieldValue::List(items) if !items.is_empty() => items.clone(),
                    FieldValue::Text(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
                    _ => return Err(FieldError::EmptyValue("sensitive data")),
                };
                tgt.component.ensure_data().sensitive_data = Some(items);
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.data_entry()
                    .and_then(|d| d.sensitive_data.as_ref())
                    .map(|s| !s.is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Classification,
            weight: 0.6,
            required: false,
            sources: vec![Box::new(|src| {
                let card = src.hub.as_ref()?.card_data.as_ref()?;
                let cats = card.get("task_categories")?.as_array()?;
                let s = cats.first()?.as_str()?.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "classification"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("classification"))?;
                tgt.component.ensure_data().classification = Some(s.to_string());
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.data_entry()
                    .and_then(|d| d.classification.as_deref())
                    .map(|s| !s.trim().is_empty())
                    .unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Governance,
            weight: 0.7,
            required: false,
            sources: vec![Box::new(|src| {
                // Packed as [custodian, steward, owner]; empty slots stay "".
                let mut custodian = String::new();
                let mut steward = String::new();
                let mut owner = String::new();

                if let Some(hub) = &src.hub {
                    let author = hub.author.trim();
                    if !author.is_empty() {
                        custodian = author.to_string();
                    }
                }
                if let Some(readme) = &src.readme {
                    if custodian.is_empty() {
                        let shared = readme.shared_by.trim();
                        let curated = readme.curated_by.trim();
                        if !shared.is_empty() {
                            custodian = shared.to_string();
                        } else if !curated.is_empty() {
                            custodian = curated.to_string();
                        }
                    }
                    steward = readme.curated_by.trim().to_string();
                    owner = readme.funded_by.trim().to_string();
                }

                if custodian.is_empty() && steward.is_empty() && owner.is_empty() {
                    return None;
                }
                Some(FieldValue::List(vec![custodian, steward, owner]))
            })],
            parse: None,
            apply: Box::new(|tgt, input| {
                let slots = input
                    .value
                    .as_list()
                    .filter(|s| s.len() == 3)
                    .ok_or_else(|| FieldError::InvalidInput(DatasetKey::Governance.to_string()))?;
                let mut governance = DataGovernance::default();
                let mut any = false;
                if !slots[0].is_empty() {
                    governance.custodians =
                        Some(vec![ResponsibleParty::organization_named(&slots[0])]);
                    any = true;
                }
                if !slots[1].is_empty() {
                    governance.stewards =
                        Some(vec![ResponsibleParty::organization_named(&slots[1])]);
                    any = true;
                }
                if !slots[2].is_empty() {
                    governance.owners =
                        Some(vec![ResponsibleParty::organization_named(&slots[2])]);
                    any = true;
                }
                if !any {
                    return Err(FieldError::EmptyValue("governance"));
                }
                tgt.component.ensure_data().governance = Some(governance);
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.data_entry().map(|d| d.governance.is_some()).unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Hashes,
            weight: 0.5,
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
            present: Box::new(|comp| {
                comp.hashes.as_ref().map(|h| !h.is_empty()).unwrap_or(false)
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::CreatedAt,
            weight: 0.3,
            required: false,
            sources: vec![Box::new(|src| {
                let s = src.hub.as_ref()?.created_at.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "createdAt"))),
            apply: Box::new(|tgt, input| {
                let value = input
                    .value
                    .render()
                    .ok_or_else(|| FieldError::InvalidInput(DatasetKey::CreatedAt.to_string()))?;
                tgt.component.set_property("createdAt", &value);
                Ok(())
            }),
            present: Box::new(|comp| comp.has_property("createdAt")),
        },
        DatasetFieldSpec {
            key: DatasetKey::UsedStorage,
            weight: 0.3,
            required: false,
            sources: vec![Box::new(|src| {
                let n = src.hub.as_ref()?.used_storage;
                (n > 0).then_some(FieldValue::Integer(n))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "usedStorage"))),
            apply: Box::new(|tgt, input| {
                let value = input
                    .value
                    .render()
                    .ok_or_else(|| FieldError::InvalidInput(DatasetKey::UsedStorage.to_string()))?;
                tgt.component.set_property("usedStorage", &value);
                Ok(())
            }),
            present: Box::new(|comp| comp.has_property("usedStorage")),
        },
        DatasetFieldSpec {
            key: DatasetKey::LastModified,
            weight: 0.3,
            required: false,
            sources: vec![Box::new(|src| {
                let s = src.hub.as_ref()?.last_modified.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "lastModified"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("lastModified"))?;
                // Tracked as a tag alongside the content tags.
                let tags = tgt.component.tags.get_or_insert_with(Vec::new);
                if !input.force && tags.iter().any(|t| t.starts_with("lastModified:")) {
                    return Ok(());
                }
                tags.retain(|t| !t.starts_with("lastModified:"));
                tags.push(format!("lastModified:{}", s));
                Ok(())
            }),
            present: Box::new(|comp| {
                comp.tags
                    .iter()
                    .flatten()
                    .any(|t| t.starts_with("lastModified:"))
            }),
        },
        DatasetFieldSpec {
            key: DatasetKey::Contact,
            weight: 0.5,
            required: false,
            sources: vec![Box::new(|src| {
                let s = src.readme.as_ref()?.dataset_card_contact.trim();
                (!s.is_empty()).then(|| FieldValue::Text(s.to_string()))
            })],
            parse: Some(Box::new(|v| parse_non_empty_string(v, "contact"))),
            apply: Box::new(|tgt, input| {
                let s = input
                    .value
                    .as_text()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(FieldError::EmptyValue("contact"))?;
                tgt.component.set_property("contact", s);
                Ok(())
            }),
            present: Box::new(|comp| comp.has_property("contact")),
        },
    ]
}
