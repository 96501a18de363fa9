//! Markdown extraction helpers
//!
//! Shared between the model and dataset README parsers: YAML front-matter
//! splitting (lax — unknown keys ignored, parse failure yields an empty map
//! plus the full raw body), `##`/`###` section extraction, bullet value
//! extraction, model-index results, and dataset config lists.

use std::collections::HashMap;

use regex::Regex;

pub type FrontMatter = HashMap<String, serde_yaml::Value>;

/// Split a README into its YAML front matter and Markdown body.
///
/// Only a document that begins with a `---` line followed by a terminating
/// `---` at the start of a line is treated as carrying front matter. When
/// the YAML fails to parse, the full raw text is returned as the body so
/// callers can still regex-parse it.
pub fn split_front_matter(raw: &str) -> (FrontMatter, String) {
    let raw = raw.trim();
    let Some(rest) = raw.strip_prefix("---\n") else {
        return (FrontMatter::new(), raw.to_string());
    };

    // Find the second '---' marker at the start of a line; a file-ending
    // marker without trailing newline also closes the block.
    let idx = match rest.find("\n---\n") {
        Some(i) => i,
        None => match rest.find("\n---") {
            Some(i) => i,
            None => return (FrontMatter::new(), raw.to_string()),
        },
    };

    let yaml = &rest[..idx];
    let mut body = &rest[idx..];
    body = body
        .strip_prefix("\n---\n")
        .or_else(|| body.strip_prefix("\n---"))
        .unwrap_or(body);
    let body = body.trim().to_string();

    match serde_yaml::from_str::<FrontMatter>(yaml) {
        Ok(map) => (map, body),
        Err(_) => (FrontMatter::new(), raw.to_string()),
    }
}

/// Best-effort scalar-to-string conversion.
pub fn string_from(value: Option<&serde_yaml::Value>) -> String {
    match value {
        None => String::new(),
        Some(serde_yaml::Value::Null) => String::new(),
        Some(serde_yaml::Value::String(s)) => s.clone(),
        Some(serde_yaml::Value::Bool(b)) => b.to_string(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(_) => String::new(),
    }
}

/// Best-effort list-of-strings conversion; scalars become single-element
/// lists, entries are trimmed, empties dropped, duplicates removed.
pub fn string_list_from(value: Option<&serde_yaml::Value>) -> Vec<String> {
    let items = match value {
        None | Some(serde_yaml::Value::Null) => Vec::new(),
        Some(serde_yaml::Value::Sequence(seq)) => seq
            .iter()
            .map(|v| string_from(Some(v)))
            .collect(),
        Some(other) => vec![string_from(Some(other))],
    };
    normalize_strings(items)
}

/// Trim, drop empties, dedupe preserving first-seen order.
pub fn normalize_strings(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().to_string();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Task and metrics parsed from the front matter `model-index`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelIndexResult {
    pub task_type: String,
    pub task_name: String,
    pub metrics: Vec<ModelIndexMetric>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelIndexMetric {
    pub metric_type: String,
    pub value: String,
}

/// Parse the first result of the first `model-index` entry. Metrics empty in
/// both fields are dropped.
pub fn parse_model_index(mi: &serde_yaml::Value) -> Option<ModelIndexResult> {
    let list = mi.as_sequence()?;
    let first = list.first()?.as_mapping()?;
    let results = first.get(serde_yaml::Value::from("results"))?.as_sequence()?;
    let res = results.first()?.as_mapping()?;

    let mut out = ModelIndexResult::default();
    if let Some(task) = res
        .get(serde_yaml::Value::from("task"))
        .and_then(|t| t.as_mapping())
    {
        out.task_type = string_from(task.get(serde_yaml::Value::from("type")))
            .trim()
            .to_string();
        out.task_name = string_from(task.get(serde_yaml::Value::from("name")))
            .trim()
            .to_string();
    }

    if let Some(metrics) = res
        .get(serde_yaml::Value::from("metrics"))
        .and_then(|m| m.as_sequence())
    {
        for m in metrics {
            let Some(mm) = m.as_mapping() else { continue };
            let metric_type = string_from(mm.get(serde_yaml::Value::from("type")))
                .trim()
                .to_string();
            let value = string_from(mm.get(serde_yaml::Value::from("value")))
                .trim()
                .to_string();
            if metric_type.is_empty() && value.is_empty() {
                continue;
            }
            out.metrics.push(ModelIndexMetric { metric_type, value });
        }
    }

    Some(out)
}

/// Capture the body of a `##` or `###` heading equal to `heading`, up to the
/// next heading of any level.
pub fn extract_section(markdown: &str, heading: &str) -> String {
    let markdown = markdown.replace("\r\n", "\n");
    let heading_re = Regex::new(&format!(r"^#{{2,3}}\s+{}\s*$", regex::escape(heading)))
        .expect("invalid heading pattern");
    let next_heading_re = Regex::new(r"^#+\s+.+$").expect("invalid heading pattern");

    let mut found = false;
    let mut buf: Vec<&str> = Vec::new();
    for line in markdown.lines() {
        if !found {
            if heading_re.is_match(line) {
                found = true;
            }
            continue;
        }
        if next_heading_re.is_match(line) {
            break;
        }
        buf.push(line);
    }
    buf.join("\n").trim().to_string()
}

/// Extract values like:
///
/// ```text
/// - **Paper [optional]:** https://...
/// - **Developed by:** org
/// - **Carbon Emitted** *(additional text)*: 149.2 kg eq. CO2
/// ```
///
/// Supports optional bracketed qualifiers in the label and text between the
/// label and the colon: both `**Label:**` (colon inside) and `**Label** text:`
/// (colon outside).
pub fn extract_bullet_value(markdown: &str, label: &str) -> String {
    let pat = format!(
        r"(?m)^-\s+\*\*{}(?:\s*\[[^\]]+\])?(?::\*\*|\*\*[^:\n]*:)\s*(.+?)\s*$",
        regex::escape(label)
    );
    let re = Regex::new(&pat).expect("invalid bullet pattern");
    re.captures(markdown)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// True for empty bodies and the model-card template placeholder.
pub fn is_placeholder(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.contains("[More Information Needed]")
}

/// Blank out placeholder sections so they count as absent downstream.
pub fn non_placeholder(s: String) -> String {
    if is_placeholder(&s) {
        String::new()
    } else {
        s
    }
}

/// Dataset configuration with data-file splits, from front matter `configs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetConfig {
    pub name: String,
    pub data_files: Vec<DatasetDataFile>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetDataFile {
    pub split: String,
    pub path: String,
}

/// Parse front-matter `configs`: a list of `{config_name, data_files:
/// [{split, path}]}`. Entries empty in every field are dropped.
pub fn parse_dataset_configs(cfgs: &serde_yaml::Value) -> Vec<DatasetConfig> {
    let mut result = Vec::new();
    let Some(list) = cfgs.as_sequence() else {
        return result;
    };

    for item in list {
        let Some(map) = item.as_mapping() else { continue };
        let mut cfg = DatasetConfig {
            name: string_from(map.get(serde_yaml::Value::from("config_name")))
                .trim()
                .to_string(),
            data_files: Vec::new(),
        };

        if let Some(files) = map
            .get(serde_yaml::Value::from("data_files"))
            .and_then(|v| v.as_sequence())
        {
            for file in files {
                let Some(fm) = file.as_mapping() else { continue };
                let df = DatasetDataFile {
                    split: string_from(fm.get(serde_yaml::Value::from("split")))
                        .trim()
                        .to_string(),
                    path: string_from(fm.get(serde_yaml::Value::from("path")))
                        .trim()
                        .to_string(),
                };
                if !df.split.is_empty() || !df.path.is_empty() {
                    cfg.data_files.push(df);
                }
            }
        }

        if !cfg.name.is_empty() || !cfg.data_files.is_empty() {
            result.push(cfg);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_front_matter_basic() {
        let raw = "---\nlicense: mit\ntags:\n  - nlp\n---\n\n# Model\nBody text.";
        let (fm, body) = split_front_matter(raw);
        assert_eq!(string_from(fm.get("license")), "mit");
        assert_eq!(string_list_from(fm.get("tags")), vec!["nlp"]);
        assert!(body.starts_with("# Model"));
    }

    #[test]
    fn test_split_front_matter_absent() {
        let raw = "# Just a readme\nNo metadata here.";
        let (fm, body) = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_front_matter_unterminated() {
        let raw = "---\nlicense: mit\nno closing marker";
        let (fm, body) = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_front_matter_invalid_yaml_keeps_raw_body() {
        let raw = "---\n: [ not yaml\n---\nBody.";
        let (fm, body) = split_front_matter(raw);
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_string_list_from_scalar() {
        let v: serde_yaml::Value = serde_yaml::from_str("glue").unwrap();
        assert_eq!(string_list_from(Some(&v)), vec!["glue"]);
    }

    #[test]
    fn test_normalize_strings_dedupes() {
        let out = normalize_strings(vec![
            " a ".into(),
            "".into(),
            "b".into(),
            "a".into(),
        ]);
        assert_eq!(out, vec!["a", "b"]);
    }

    #[test]
    fn test_extract_section() {
        let body = "## Direct Use\n\nUse it for text generation.\n\n### Details\nskip";
        assert_eq!(
            extract_section(body, "Direct Use"),
            "Use it for text generation."
        );
    }

    #[test]
    fn test_extract_section_stops_at_any_heading() {
        let body = "### Recommendations\nline one\nline two\n# Top\nafter";
        assert_eq!(
            extract_section(body, "Recommendations"),
            "line one\nline two"
        );
    }

    #[test]
    fn test_extract_section_missing() {
        assert_eq!(extract_section("## Other\nx", "Direct Use"), "");
    }

    #[test]
    fn test_extract_bullet_colon_inside() {
        let body = "- **Developed by:** hf-team\n- **Paper [optional]:** https://arxiv.org/abs/1";
        assert_eq!(extract_bullet_value(body, "Developed by"), "hf-team");
        assert_eq!(
            extract_bullet_value(body, "Paper"),
            "https://arxiv.org/abs/1"
        );
    }

    #[test]
    fn test_extract_bullet_colon_outside() {
        let body = "- **Carbon Emitted** *(estimate)*: 149.2 kg eq. CO2";
        assert_eq!(
            extract_bullet_value(body, "Carbon Emitted"),
            "149.2 kg eq. CO2"
        );
    }

    #[test]
    fn test_parse_model_index() {
        let yaml = r#"
- name: my-model
  results:
    - task:
        type: text-classification
        name: Text Classification
      metrics:
        - type: accuracy
          value: 0.91
        - type: ""
          value: ""
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let result = parse_model_index(&value).unwrap();
        assert_eq!(result.task_type, "text-classification");
        assert_eq!(result.task_name, "Text Classification");
        assert_eq!(result.metrics.len(), 1);
        assert_eq!(result.metrics[0].metric_type, "accuracy");
        assert_eq!(result.metrics[0].value, "0.91");
    }

    #[test]
    fn test_parse_dataset_configs() {
        let yaml = r#"
- config_name: default
  data_files:
    - split: train
      path: data/train-*
    - split: test
      path: data/test-*
- config_name: ""
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let configs = parse_dataset_configs(&value);
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "default");
        assert_eq!(configs[0].data_files.len(), 2);
        assert_eq!(configs[0].data_files[0].split, "train");
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("[More Information Needed]"));
        assert!(is_placeholder("x [More Information Needed] y"));
        assert!(!is_placeholder("Use for inference."));
    }
}
