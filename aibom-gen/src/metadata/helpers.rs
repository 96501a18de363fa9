//! Extraction helpers shared by the field specs

use std::collections::{HashMap, HashSet};

use aibom_common::bom::{
    Bom, Component, ModelCard, ModelParameters, Considerations, QuantitativeAnalysis,
};

pub type CardData = HashMap<String, serde_json::Value>;

/// License: `cardData.license` (string) wins over the first `license:` tag.
pub fn extract_license(card_data: Option<&CardData>, tags: &[String]) -> String {
    if let Some(card) = card_data {
        if let Some(serde_json::Value::String(s)) = card.get("license") {
            let s = s.trim();
            if !s.is_empty() {
                return s.to_string();
            }
        }
    }
    for tag in tags {
        let tag = tag.trim();
        if let Some(rest) = tag.strip_prefix("license:") {
            return rest.trim().to_string();
        }
    }
    String::new()
}

/// Language: `cardData.language` as a string or comma-joined array.
pub fn extract_language(card_data: Option<&CardData>) -> String {
    let Some(value) = card_data.and_then(|c| c.get("language")) else {
        return String::new();
    };
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            parts.join(",")
        }
        _ => String::new(),
    }
}

/// Datasets: union of `cardData.datasets` (string or array) with `dataset:`
/// tags, normalised so every entry carries a prefix, deduped in first-seen
/// order.
pub fn extract_datasets(card_data: Option<&CardData>, tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    let mut add = |raw: &str| {
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        let normalized = if raw.contains(':') {
            raw.to_string()
        } else {
            format!("dataset:{}", raw)
        };
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    };

    if let Some(value) = card_data.and_then(|c| c.get("datasets")) {
        match value {
            serde_json::Value::String(s) => add(s),
            serde_json::Value::Array(items) => {
                for item in items {
                    if let Some(s) = item.as_str() {
                        add(s);
                    }
                }
            }
            _ => {}
        }
    }

    for tag in tags {
        let tag = tag.trim();
        if tag.starts_with("dataset:") {
            add(tag);
        }
    }

    out
}

/// Prefix a README dataset reference with `dataset:` unless already present.
pub fn normalize_dataset_ref(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        return String::new();
    }
    if s.starts_with("dataset:") {
        return s.to_string();
    }
    format!("dataset:{}", s)
}

pub fn ensure_model_card(component: &mut Component) -> &mut ModelCard {
    component.model_card.get_or_insert_with(ModelCard::default)
}

pub fn ensure_model_parameters(card: &mut ModelCard) -> &mut ModelParameters {
    card.model_parameters
        .get_or_insert_with(ModelParameters::default)
}

pub fn ensure_considerations(card: &mut ModelCard) -> &mut Considerations {
    card.considerations
        .get_or_insert_with(Considerations::default)
}

pub fn ensure_quantitative_analysis(card: &mut ModelCard) -> &mut QuantitativeAnalysis {
    card.quantitative_analysis
        .get_or_insert_with(QuantitativeAnalysis::default)
}

pub fn bom_component(bom: &Bom) -> Option<&Component> {
    bom.metadata_component()
}

pub fn bom_has_component_name(bom: &Bom) -> bool {
    bom.metadata_component()
        .map(|c| !c.name.trim().is_empty())
        .unwrap_or(false)
}

pub fn bom_model_parameters(bom: &Bom) -> Option<&ModelParameters> {
    bom.model_parameters()
}
