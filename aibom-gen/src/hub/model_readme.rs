//! Model README (model card) fetching and parsing
//!
//! Hub model cards carry a YAML front-matter block followed by templated
//! Markdown sections. Both are parsed: front matter for structured fields
//! (license, tags, datasets, metrics, base_model, model-index), the body by
//! regex for the template's sections and bullets. Sections that only hold
//! the `[More Information Needed]` placeholder are treated as absent.

use super::client::{HubClient, HubError};
use super::markdown::{
    extract_bullet_value, extract_section, non_placeholder, parse_model_index, split_front_matter,
    string_from, string_list_from, FrontMatter, ModelIndexMetric,
};

/// Metadata extracted from a hub model README.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReadmeCard {
    pub raw: String,
    pub front_matter: FrontMatter,
    pub body: String,

    // Common front matter fields
    pub license: String,
    pub tags: Vec<String>,
    pub datasets: Vec<String>,
    pub metrics: Vec<String>,
    pub base_model: String,

    // Extracted from the Markdown body (template-based)
    pub developed_by: String,
    pub paper_url: String,
    pub demo_url: String,
    pub direct_use: String,
    pub out_of_scope_use: String,
    pub bias_risks_limitations: String,
    pub bias_recommendations: String,
    pub model_card_contact: String,

    // Environmental Impact bullets
    pub environmental_hardware_type: String,
    pub environmental_hours_used: String,
    pub environmental_cloud_provider: String,
    pub environmental_compute_region: String,
    pub environmental_carbon_emitted: String,

    // From model-index (if present)
    pub task_type: String,
    pub task_name: String,
    pub model_index_metrics: Vec<ModelIndexMetric>,

    // Quantitative Analysis sections
    pub testing_metrics: String,
    pub results: String,
}

/// Parse a raw README document into a card.
pub fn parse_readme_card(raw: &str) -> ModelReadmeCard {
    let raw = raw.replace("\r\n", "\n");
    let (fm, body) = split_front_matter(&raw);

    let mut card = ModelReadmeCard {
        raw: raw.clone(),
        body: body.clone(),
        ..ModelReadmeCard::default()
    };

    // Front matter fields (best effort)
    card.license = string_from(fm.get("license")).trim().to_string();
    card.tags = string_list_from(fm.get("tags"));
    card.datasets = string_list_from(fm.get("datasets"));
    card.metrics = string_list_from(fm.get("metrics"));
    card.base_model = string_from(fm.get("base_model")).trim().to_string();

    if let Some(mi) = fm.get("model-index") {
        if let Some(result) = parse_model_index(mi) {
            card.task_type = result.task_type;
            card.task_name = result.task_name;
            card.model_index_metrics = result.metrics;
        }
    }

    // Markdown extraction (template-based)
    card.developed_by = extract_bullet_value(&body, "Developed by");
    card.paper_url = extract_bullet_value(&body, "Paper");
    card.demo_url = extract_bullet_value(&body, "Demo");
    card.direct_use = non_placeholder(extract_section(&body, "Direct Use"));
    card.out_of_scope_use = non_placeholder(extract_section(&body, "Out-of-Scope Use"));
    card.bias_risks_limitations =
        non_placeholder(extract_section(&body, "Bias, Risks, and Limitations"));
    card.bias_recommendations = non_placeholder(extract_section(&body, "Recommendations"));
    card.model_card_contact = non_placeholder(extract_section(&body, "Model Card Contact"));

    // Quantitative Analysis sections
    card.testing_metrics = non_placeholder(extract_section(&body, "Metrics"));
    card.results = non_placeholder(extract_section(&body, "Results"));

    // Environmental Impact
    card.environmental_hardware_type = extract_bullet_value(&body, "Hardware Type");
    card.environmental_hours_used = extract_bullet_value(&body, "Hours used");
    card.environmental_cloud_provider = extract_bullet_value(&body, "Cloud Provider");
    card.environmental_compute_region = extract_bullet_value(&body, "Compute Region");
    card.environmental_carbon_emitted = extract_bullet_value(&body, "Carbon Emitted");

    card.front_matter = fm;
    card
}

impl HubClient {
    /// Fetch and parse the README for a model repo.
    ///
    /// Tries `/{id}/resolve/main/README.md` and falls back to the `master`
    /// ref on any error; the first successful response wins.
    pub async fn fetch_model_readme(&self, model_id: &str) -> Result<ModelReadmeCard, HubError> {
        let trimmed = model_id.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(HubError::NotFound);
        }

        let mut last_err = None;
        for reference in ["main", "master"] {
            let path = format!("/{}/resolve/{}/README.md", trimmed, reference);
            match self.get_raw(&path).await {
                Ok(raw) => return Ok(parse_readme_card(&raw)),
                Err(e) => last_err = Some(e),
            }
        }
        let err = last_err.unwrap_or(HubError::NotFound);
        tracing::debug!(model_id = %trimmed, error = %err, "readme fetch failed");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"---
license: mit
tags:
  - text-generation
datasets:
  - glue
  - owner/corpus
metrics:
  - accuracy
base_model: org/base
model-index:
  - name: sample
    results:
      - task:
          type: text-generation
          name: Text Generation
        metrics:
          - type: perplexity
            value: 12.3
---

# Model Card

- **Developed by:** hf-team
- **Paper [optional]:** https://arxiv.org/abs/1234.5678
- **Demo:** https://example.org/demo

## Direct Use

Generate text.

## Out-of-Scope Use

[More Information Needed]

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

    #[test]
    fn test_parse_front_matter_fields() {
        let card = parse_readme_card(SAMPLE);
        assert_eq!(card.license, "mit");
        assert_eq!(card.tags, vec!["text-generation"]);
        assert_eq!(card.datasets, vec!["glue", "owner/corpus"]);
        assert_eq!(card.metrics, vec!["accuracy"]);
        assert_eq!(card.base_model, "org/base");
    }

    #[test]
    fn test_parse_model_index_result() {
        let card = parse_readme_card(SAMPLE);
        assert_eq!(card.task_type, "text-generation");
        assert_eq!(card.task_name, "Text Generation");
        assert_eq!(card.model_index_metrics.len(), 1);
        assert_eq!(card.model_index_metrics[0].metric_type, "perplexity");
        assert_eq!(card.model_index_metrics[0].value, "12.3");
    }

    #[test]
    fn test_parse_body_bullets_and_sections() {
        let card = parse_readme_card(SAMPLE);
        assert_eq!(card.developed_by, "hf-team");
        assert_eq!(card.paper_url, "https://arxiv.org/abs/1234.5678");
        assert_eq!(card.demo_url, "https://example.org/demo");
        assert_eq!(card.direct_use, "Generate text.");
        assert_eq!(card.bias_risks_limitations, "Known biases exist.");
        assert_eq!(card.bias_recommendations, "Review outputs.");
        assert_eq!(card.model_card_contact, "cards@example.org");
    }

    #[test]
    fn test_placeholder_section_is_absent() {
        let card = parse_readme_card(SAMPLE);
        assert_eq!(card.out_of_scope_use, "");
    }

    #[test]
    fn test_environmental_bullets() {
        let card = parse_readme_card(SAMPLE);
        assert_eq!(card.environmental_hardware_type, "A100");
        assert_eq!(card.environmental_hours_used, "400");
        assert_eq!(card.environmental_cloud_provider, "AWS");
        assert_eq!(card.environmental_compute_region, "us-east-1");
        assert_eq!(card.environmental_carbon_emitted, "149.2 kg eq. CO2");
    }

    #[test]
    fn test_parse_without_front_matter() {
        let card = parse_readme_card("# Model\n\n## Direct Use\n\nClassify text.\n");
        assert!(card.front_matter.is_empty());
        assert_eq!(card.license, "");
        assert_eq!(card.direct_use, "Classify text.");
    }
}
