//! Document meta helpers: serial number, timestamp, tool entry, PURL/BOMRef

use aibom_common::bom::{Bom, Component, ComponentType, Metadata, OrganizationalEntity, Tools};
use chrono::{Local, SecondsFormat};
use uuid::Uuid;

pub const DEFAULT_TOOL_VENDOR: &str = "aibomgen";
pub const DEFAULT_TOOL_NAME: &str = "aibomgen";
pub const DEFAULT_TOOL_VERSION: &str = "v0.0.0";

fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Set a serial number unless one is already present.
pub fn add_meta_serial_number(bom: &mut Bom) {
    if bom.serial_number.is_none() {
        bom.serial_number = Some(format!("urn:uuid:{}", generate_uuid()));
    }
}

/// Now, formatted as RFC 3339 local time (e.g. 2026-01-22T10:41:24+01:00).
pub fn current_timestamp_rfc3339() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Set the timestamp unless one is already present.
pub fn add_meta_timestamp(bom: &mut Bom) {
    let metadata = bom.metadata.get_or_insert_with(Metadata::default);
    if metadata.timestamp.is_none() {
        metadata.timestamp = Some(current_timestamp_rfc3339());
    }
}

/// Append the producing-tool entry under `metadata.tools.components`.
pub fn add_meta_tools(bom: &mut Bom, tool_name: &str, tool_version: &str) {
    let name = if tool_name.is_empty() {
        DEFAULT_TOOL_NAME
    } else {
        tool_name
    };
    let version = if tool_version.is_empty() {
        DEFAULT_TOOL_VERSION
    } else {
        tool_version
    };

    let mut comp = Component::new(ComponentType::Application, name);
    comp.manufacturer = Some(OrganizationalEntity {
        name: DEFAULT_TOOL_VENDOR.to_string(),
    });
    comp.version = Some(version.to_string());

    let metadata = bom.metadata.get_or_insert_with(Metadata::default);
    metadata
        .tools
        .get_or_insert_with(Tools::default)
        .components
        .get_or_insert_with(Vec::new)
        .push(comp);
}

/// Package URL for a hub coordinate.
///
/// Models use `pkg:huggingface/<id>`, datasets the plural
/// `pkg:huggingface/datasets/<id>`; any other kind falls back to
/// `pkg:huggingface/unknown/<id>`. The version (a commit sha) is lowercased.
pub fn generate_purl(kind: &str, id: &str, version: &str) -> String {
    let kind = if kind == "model" || kind == "dataset" {
        kind
    } else {
        "unknown"
    };
    let id = if id.is_empty() { "unknown" } else { id };

    let base = match kind {
        "model" => format!("pkg:huggingface/{}", id),
        "dataset" => format!("pkg:huggingface/datasets/{}", id),
        other => format!("pkg:huggingface/{}/{}", other, id),
    };

    if version.is_empty() {
        base
    } else {
        format!("{}@{}", base, version.to_lowercase())
    }
}

/// Safe-encode `@` and spaces in a purl segment.
pub fn normalize_segment(segment: &str) -> String {
    let mut normalized = String::with_capacity(segment.len());
    for ch in segment.chars() {
        match ch {
            '@' => normalized.push_str("%40"),
            ' ' => normalized.push_str("%20"),
            other => normalized.push(other),
        }
    }
    normalized
}

/// Purl from hub coordinates: each `/`-separated id segment is encoded so
/// the namespace/name slash survives; the sha becomes the version.
pub fn purl_from_coordinates(kind: &str, id: &str, sha: &str) -> String {
    let id = id.trim();
    let norm_id = if id.is_empty() {
        "unknown".to_string()
    } else {
        id.split('/')
            .map(|p| normalize_segment(p.trim()))
            .collect::<Vec<_>>()
            .join("/")
    };
    generate_purl(kind, &norm_id, sha.trim().to_lowercase().as_str())
}

/// Compute a deterministic purl from component metadata and set
/// `Component.purl` unless already present.
pub fn add_component_purl(comp: &mut Component) {
    if comp.purl.is_some() {
        return;
    }

    let kind = match comp.component_type {
        ComponentType::MachineLearningModel => "model",
        ComponentType::Data => "dataset",
        _ => "unknown",
    };

    let sha = comp
        .hashes
        .as_ref()
        .and_then(|h| h.first())
        .map(|h| h.content.as_str())
        .unwrap_or("");

    comp.purl = Some(purl_from_coordinates(kind, &comp.name, sha));
}

/// Set `Component.bom_ref`: the purl when one exists, else a fresh UUID urn.
pub fn add_component_bom_ref(comp: &mut Component) {
    if comp.bom_ref.is_some() {
        return;
    }
    comp.bom_ref = match &comp.purl {
        Some(purl) if !purl.is_empty() => Some(purl.clone()),
        _ => Some(format!("urn:uuid:{}", generate_uuid())),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibom_common::bom::Hash;

    #[test]
    fn test_generate_purl_model() {
        assert_eq!(
            generate_purl("model", "user/repo", "ABC"),
            "pkg:huggingface/user/repo@abc"
        );
    }

    #[test]
    fn test_generate_purl_dataset_no_version() {
        assert_eq!(
            generate_purl("dataset", "owner/ds", ""),
            "pkg:huggingface/datasets/owner/ds"
        );
    }

    #[test]
    fn test_generate_purl_unknown_kind() {
        assert_eq!(
            generate_purl("weird", "id", "1"),
            "pkg:huggingface/unknown/id@1"
        );
    }

    #[test]
    fn test_generate_purl_empty_id() {
        assert_eq!(generate_purl("model", "", ""), "pkg:huggingface/unknown");
    }

    #[test]
    fn test_normalize_segment() {
        assert_eq!(normalize_segment("a b"), "a%20b");
        assert_eq!(normalize_segment("a@b"), "a%40b");
        assert_eq!(normalize_segment("plain"), "plain");
    }

    #[test]
    fn test_purl_from_coordinates_preserves_slash() {
        assert_eq!(
            purl_from_coordinates("model", "a b/c@d", "SHA"),
            "pkg:huggingface/a%20b/c%40d@sha"
        );
    }

    #[test]
    fn test_add_component_purl_uses_first_hash() {
        let mut comp = Component::new(ComponentType::MachineLearningModel, "org/model");
        comp.hashes = Some(vec![Hash::sha1("ABC")]);
        add_component_purl(&mut comp);
        assert_eq!(comp.purl.as_deref(), Some("pkg:huggingface/org/model@abc"));
    }

    #[test]
    fn test_add_component_bom_ref_prefers_purl() {
        let mut comp = Component::new(ComponentType::Data, "owner/ds");
        add_component_purl(&mut comp);
        add_component_bom_ref(&mut comp);
        assert_eq!(
            comp.bom_ref.as_deref(),
            Some("pkg:huggingface/datasets/owner/ds")
        );
    }

    #[test]
    fn test_bom_ref_falls_back_to_uuid_urn() {
        let mut comp = Component::new(ComponentType::Application, "tool");
        comp.purl = Some(String::new());
        add_component_bom_ref(&mut comp);
        assert!(comp.bom_ref.as_deref().unwrap().starts_with("urn:uuid:"));
    }

    #[test]
    fn test_serial_number_not_overwritten() {
        let mut bom = Bom::new();
        bom.serial_number = Some("urn:uuid:fixed".into());
        add_meta_serial_number(&mut bom);
        assert_eq!(bom.serial_number.as_deref(), Some("urn:uuid:fixed"));
    }
}
