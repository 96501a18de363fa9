//! Dataset README (dataset card) fetching and parsing
//!
//! Analog of the model card parser for dataset repos; adds curated/funded/
//! shared-by bullets and the configs-with-data-files list.

use super::client::{HubClient, HubError};
use super::markdown::{
    extract_bullet_value, extract_section, non_placeholder, parse_dataset_configs,
    split_front_matter, string_from, string_list_from, DatasetConfig, FrontMatter,
};

/// Metadata extracted from a hub dataset README.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetReadmeCard {
    pub raw: String,
    pub front_matter: FrontMatter,
    pub body: String,

    // Front matter fields
    pub license: String,
    pub tags: Vec<String>,
    pub language: Vec<String>,
    pub annotation_creators: Vec<String>,

    /// Configs with data-file splits
    pub configs: Vec<DatasetConfig>,

    // Markdown body fields
    pub dataset_description: String,
    pub curated_by: String,
    pub funded_by: String,
    pub shared_by: String,
    pub repository_url: String,
    pub paper_url: String,
    pub demo_url: String,
    pub out_of_scope_use: String,
    pub personal_sensitive_info: String,
    pub bias_risks_limitations: String,
    pub dataset_card_contact: String,
}

/// Parse a raw dataset README into a card.
pub fn parse_dataset_readme_card(raw: &str) -> DatasetReadmeCard {
    let raw = raw.replace("\r\n", "\n");
    let (fm, body) = split_front_matter(&raw);

    let mut card = DatasetReadmeCard {
        raw: raw.clone(),
        body: body.clone(),
        ..DatasetReadmeCard::default()
    };

    card.license = string_from(fm.get("license")).trim().to_string();
    card.tags = string_list_from(fm.get("tags"));
    card.language = string_list_from(fm.get("language"));
    card.annotation_creators = string_list_from(fm.get("annotations_creators"));

    if let Some(cfgs) = fm.get("configs") {
        card.configs = parse_dataset_configs(cfgs);
    }

    card.dataset_description = non_placeholder(extract_section(&body, "Dataset Description"));
    card.curated_by = extract_bullet_value(&body, "Curated by");
    card.funded_by = extract_bullet_value(&body, "Funded by");
    card.shared_by = extract_bullet_value(&body, "Shared by");
    card.repository_url = extract_bullet_value(&body, "Repository");
    card.paper_url = extract_bullet_value(&body, "Paper");
    card.demo_url = extract_bullet_value(&body, "Demo");
    card.out_of_scope_use = non_placeholder(extract_section(&body, "Out-of-Scope Use"));
    card.personal_sensitive_info =
        non_placeholder(extract_section(&body, "Personal and Sensitive Information"));
    card.bias_risks_limitations =
        non_placeholder(extract_section(&body, "Bias, Risks, and Limitations"));
    card.dataset_card_contact = non_placeholder(extract_section(&body, "Dataset Card Contact"));

    card.front_matter = fm;
    card
}

impl HubClient {
    /// Fetch and parse the README for a dataset repo.
    ///
    /// Datasets resolve under `/datasets/{id}/resolve/{ref}/README.md`;
    /// `main` is tried before `master`.
    pub async fn fetch_dataset_readme(
        &self,
        dataset_id: &str,
    ) -> Result<DatasetReadmeCard, HubError> {
        let trimmed = dataset_id.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(HubError::NotFound);
        }

        let mut last_err = None;
        for reference in ["main", "master"] {
            let path = format!("/datasets/{}/resolve/{}/README.md", trimmed, reference);
            match self.get_raw(&path).await {
                Ok(raw) => return Ok(parse_dataset_readme_card(&raw)),
                Err(e) => last_err = Some(e),
            }
        }
        let err = last_err.unwrap_or(HubError::NotFound);
        tracing::debug!(dataset_id = %trimmed, error = %err, "dataset readme fetch failed");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"---
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
      - split: validation
        path: data/validation.parquet
---

# Dataset Card

## Dataset Description

A benchmark of sentence understanding tasks.

- **Curated by:** NYU
- **Funded by [optional]:** NSF
- **Shared by [optional]:** nyu-mll
- **Repository:** https://example.org/repo
- **Paper:** https://arxiv.org/abs/1804.07461

## Out-of-Scope Use

Not for production decisions.

## Personal and Sensitive Information

No PII collected.

## Dataset Card Contact

datasets@example.org
"#;

    #[test]
    fn test_parse_front_matter() {
        let card = parse_dataset_readme_card(SAMPLE);
        assert_eq!(card.license, "cc-by-4.0");
        assert_eq!(card.language, vec!["en"]);
        assert_eq!(
            card.annotation_creators,
            vec!["crowdsourced", "expert-generated"]
        );
        assert_eq!(card.configs.len(), 1);
        assert_eq!(card.configs[0].data_files.len(), 2);
    }

    #[test]
    fn test_parse_body_fields() {
        let card = parse_dataset_readme_card(SAMPLE);
        assert!(card
            .dataset_description
            .starts_with("A benchmark of sentence understanding tasks."));
        assert_eq!(card.curated_by, "NYU");
        assert_eq!(card.funded_by, "NSF");
        assert_eq!(card.shared_by, "nyu-mll");
        assert_eq!(card.paper_url, "https://arxiv.org/abs/1804.07461");
        assert_eq!(card.out_of_scope_use, "Not for production decisions.");
        assert_eq!(card.personal_sensitive_info, "No PII collected.");
        assert_eq!(card.dataset_card_contact, "datasets@example.org");
    }
}
