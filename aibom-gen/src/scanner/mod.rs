//! Source scanner
//!
//! Walks a directory tree, classifies files by extension/basename, applies
//! the language-specific rule sets and returns deduplicated discoveries of
//! hub model references.
//!
//! Two phases: a serial walk collecting candidate paths (directories in the
//! exclusion set are pruned), then a parallel per-file scan over the rayon
//! pool. Per-file read errors yield no hits; walk errors abort the scan.

pub mod rules;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use self::rules::{
    DetectionRule, CODE_RULES, HF_ID_SLASH, JSON_RULES, JS_RULES, MD_FRONTMATTER_RULES,
    SHELL_RULES, YAML_RULES,
};

/// Scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(String),
}

/// One detected hub reference in project sources.
///
/// Immutable after creation; duplicates are merged by `(type, id)` with
/// evidence strings concatenated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub discovery_type: String,
    pub path: String,
    pub evidence: String,
    pub method: String,
}

/// File categories mapped to rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileClass {
    Unknown,
    Python,
    Notebook,
    Yaml,
    Json,
    Markdown,
    Shell,
    Js,
}

fn classify_file(ext: &str, name: &str) -> FileClass {
    match ext {
        "py" => return FileClass::Python,
        "ipynb" => return FileClass::Notebook,
        "yaml" | "yml" => return FileClass::Yaml,
        "json" => return FileClass::Json,
        "md" | "rst" => return FileClass::Markdown,
        "sh" | "bash" | "zsh" => return FileClass::Shell,
        "js" | "ts" | "mjs" | "cjs" | "jsx" | "tsx" => return FileClass::Js,
        _ => {}
    }
    // Name-based matches (no useful extension).
    if name == "dockerfile"
        || name.starts_with("dockerfile.")
        || name.starts_with("docker-compose")
        || name == "containerfile"
    {
        return FileClass::Shell;
    }
    FileClass::Unknown
}

/// Directories skipped entirely during the walk.
fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        ".git"
            | ".hg"
            | ".svn"
            | "node_modules"
            | "__pycache__"
            | ".venv"
            | "venv"
            | "env"
            | ".env"
            | ".tox"
            | "dist"
            | "build"
            | "_build"
            | "site-packages"
            | ".mypy_cache"
            | ".pytest_cache"
            | ".ruff_cache"
    )
}

/// Walk `root` and return deduplicated discoveries of hub model references.
pub fn scan(root: &Path) -> Result<Vec<Discovery>, ScanError> {
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    // Phase 1: serial walk collecting candidate files.
    let mut paths: Vec<PathBuf> = Vec::new();
    let walker = WalkDir::new(root).follow_links(false).into_iter().filter_entry(|e| {
        if e.file_type().is_dir() && e.depth() > 0 {
            let name = e.file_name().to_string_lossy();
            return !should_skip_dir(&name);
        }
        true
    });
    for entry in walker {
        let entry = entry.map_err(|e| ScanError::Walk(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        let ext = extension_lower(&name);
        if classify_file(&ext, &name) != FileClass::Unknown {
            paths.push(entry.into_path());
        }
    }

    if paths.is_empty() {
        return Ok(Vec::new());
    }
    tracing::debug!(candidates = paths.len(), "scan walk complete");

    // Phase 2: parallel per-file scan. Each worker reads one file at a time;
    // rayon bounds the fan-out at the pool width.
    let results: Vec<Discovery> = paths.par_iter().flat_map_iter(|p| scan_file(p)).collect();

    let deduped = dedupe(results);
    tracing::debug!(discoveries = deduped.len(), "scan complete");
    Ok(deduped)
}

fn extension_lower(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Dispatch a single file to the scanner for its class.
fn scan_file(path: &Path) -> Vec<Discovery> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let ext = extension_lower(&name);

    match classify_file(&ext, &name) {
        FileClass::Python => scan_lines(path, &CODE_RULES, true),
        FileClass::Notebook => scan_notebook(path),
        FileClass::Yaml => scan_lines(path, &YAML_RULES, false),
        FileClass::Json => scan_lines(path, &JSON_RULES, false),
        FileClass::Markdown => scan_markdown(path),
        FileClass::Shell => scan_lines(path, &SHELL_RULES, false),
        FileClass::Js => scan_lines(path, &JS_RULES, false),
        FileClass::Unknown => Vec::new(),
    }
}

fn read_lossy(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Scan a file line by line with the given rules.
///
/// When `multi_line` is set, a line whose predecessor ends (after
/// right-trimming) with `(` is also matched as the concatenation of both
/// lines, reported at the predecessor's line number. Captures two-line call
/// expressions such as:
///
/// ```text
/// model = AutoModel.from_pretrained(
///     "org/model")
/// ```
fn scan_lines(path: &Path, rules: &[DetectionRule], multi_line: bool) -> Vec<Discovery> {
    let Some(content) = read_lossy(path) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    let mut prev_line = String::new();
    let mut prev_num = 0usize;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        apply_rules(&mut results, rules, line, line_num, path);

        if multi_line && prev_line.trim_end_matches([' ', '\t']).ends_with('(') {
            let combined = format!("{}{}", prev_line, line.trim());
            apply_rules(&mut results, rules, &combined, prev_num, path);
        }
        prev_line = line.to_string();
        prev_num = line_num;
    }
    results
}

/// Test one text string against all rules and append any plausible hits.
fn apply_rules(
    results: &mut Vec<Discovery>,
    rules: &[DetectionRule],
    text: &str,
    line_num: usize,
    path: &Path,
) {
    for rule in rules {
        for caps in rule.pattern.captures_iter(text) {
            let Some(m) = caps.get(rule.group) else {
                continue;
            };
            let model_id = m.as_str();
            if !is_plausible_model_id(model_id) {
                continue;
            }
            results.push(Discovery {
                id: model_id.to_string(),
                name: model_id.to_string(),
                discovery_type: "model".to_string(),
                path: path.display().to_string(),
                evidence: format!("{} at line {}: {}", rule.method, line_num, text.trim()),
                method: rule.method.to_string(),
            });
        }
    }
}

/// Minimal representation of a .ipynb file.
#[derive(Deserialize)]
struct NotebookFormat {
    #[serde(default)]
    cells: Vec<NotebookCell>,
}

#[derive(Deserialize)]
struct NotebookCell {
    #[serde(default)]
    cell_type: String,
    #[serde(default)]
    source: serde_json::Value,
}

/// Parse a Jupyter notebook and scan code cells as Python, markdown cells
/// with the front-matter rules.
fn scan_notebook(path: &Path) -> Vec<Discovery> {
    let Some(content) = read_lossy(path) else {
        return Vec::new();
    };

    let nb: NotebookFormat = match serde_json::from_str(&content) {
        Ok(nb) => nb,
        // Fall back to a raw line scan with code rules if parse fails.
        Err(_) => return scan_lines(path, &CODE_RULES, true),
    };

    let mut results = Vec::new();
    for cell in &nb.cells {
        let rules: &[DetectionRule] = match cell.cell_type.as_str() {
            "code" => &CODE_RULES,
            "markdown" => &MD_FRONTMATTER_RULES,
            _ => continue,
        };

        let mut line_num = 0usize;
        let mut prev_line = String::new();
        let mut prev_num = 0usize;
        for entry in unmarshal_source(&cell.source) {
            for subline in entry.split('\n') {
                line_num += 1;
                apply_rules(&mut results, rules, subline, line_num, path);
                if prev_line.trim_end_matches([' ', '\t']).ends_with('(') {
                    let combined = format!("{}{}", prev_line, subline.trim());
                    apply_rules(&mut results, rules, &combined, prev_num, path);
                }
                prev_line = subline.to_string();
                prev_num = line_num;
            }
        }
    }
    results
}

/// Notebook cell "source" is either a JSON string or an array of strings.
fn unmarshal_source(raw: &serde_json::Value) -> Vec<String> {
    match raw {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

static INLINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({HF_ID_SLASH})\b")).expect("invalid inline pattern"));

/// Scan a Markdown file in two passes: the front-matter rules on the YAML
/// block between leading `---` delimiters (if present), then a generic
/// `org/model` inline search over the body.
fn scan_markdown(path: &Path) -> Vec<Discovery> {
    let Some(content) = read_lossy(path) else {
        return Vec::new();
    };

    let mut results = Vec::new();
    let mut in_frontmatter = false;
    let mut first_line = true;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        if first_line {
            first_line = false;
            if trimmed == "---" {
                in_frontmatter = true;
                continue;
            }
        }

        if in_frontmatter {
            if trimmed == "---" || trimmed == "..." {
                in_frontmatter = false;
                continue;
            }
            apply_rules(&mut results, &MD_FRONTMATTER_RULES, line, line_num, path);
            continue;
        }

        // Body of the document: inline org/model references in prose.
        for caps in INLINE_PATTERN.captures_iter(line) {
            let Some(m) = caps.get(1) else { continue };
            let model_id = m.as_str();
            if !is_plausible_model_id(model_id) {
                continue;
            }
            results.push(Discovery {
                id: model_id.to_string(),
                name: model_id.to_string(),
                discovery_type: "model".to_string(),
                path: path.display().to_string(),
                evidence: format!("markdown_inline at line {}: {}", line_num, line.trim()),
                method: "markdown_inline".to_string(),
            });
        }
    }
    results
}

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+").expect("invalid version pattern"));

/// Basic sanity checks to reject obvious noise.
pub fn is_plausible_model_id(id: &str) -> bool {
    if id.is_empty() || id.len() < 2 || id.len() > 200 {
        return false;
    }
    // Reject pure version strings like "1.0", "3.14".
    if VERSION_RE.is_match(id)
        && !id.chars().any(|c| c.is_ascii_alphabetic() || c == '_' || c == '-')
    {
        return false;
    }
    // Reject common local paths.
    if id.starts_with("./") || id.starts_with("../") || id.starts_with('/') {
        return false;
    }
    true
}

/// Merge discoveries with identical `(type, id)` in first-seen order.
///
/// The first occurrence's method wins; distinct evidence strings are joined
/// with ". " so every sighting stays visible.
pub fn dedupe(discoveries: Vec<Discovery>) -> Vec<Discovery> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut out: Vec<Discovery> = Vec::new();

    for d in discoveries {
        let key = (d.discovery_type.clone(), d.id.clone());
        match index.get(&key) {
            Some(&i) => {
                let existing = &mut out[i];
                if !existing.evidence.contains(&d.evidence) {
                    existing.evidence.push_str(". ");
                    existing.evidence.push_str(&d.evidence);
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(d);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify_file("py", "train.py"), FileClass::Python);
        assert_eq!(classify_file("ipynb", "demo.ipynb"), FileClass::Notebook);
        assert_eq!(classify_file("yml", "config.yml"), FileClass::Yaml);
        assert_eq!(classify_file("rst", "readme.rst"), FileClass::Markdown);
        assert_eq!(classify_file("tsx", "app.tsx"), FileClass::Js);
        assert_eq!(classify_file("rs", "main.rs"), FileClass::Unknown);
    }

    #[test]
    fn test_classify_by_basename() {
        assert_eq!(classify_file("", "dockerfile"), FileClass::Shell);
        assert_eq!(classify_file("gpu", "dockerfile.gpu"), FileClass::Shell);
        assert_eq!(classify_file("yml", "docker-compose.yml"), FileClass::Yaml);
        assert_eq!(classify_file("txt", "requirements.txt"), FileClass::Unknown);
    }

    #[test]
    fn test_skip_dirs() {
        assert!(should_skip_dir(".git"));
        assert!(should_skip_dir("node_modules"));
        assert!(should_skip_dir("__pycache__"));
        assert!(should_skip_dir(".venv"));
        assert!(!should_skip_dir("src"));
    }

    #[test]
    fn test_plausibility_filter() {
        assert!(!is_plausible_model_id(""));
        assert!(!is_plausible_model_id("x"));
        assert!(!is_plausible_model_id("1.0"));
        assert!(!is_plausible_model_id("3.14"));
        assert!(!is_plausible_model_id("./foo"));
        assert!(!is_plausible_model_id("../foo"));
        assert!(!is_plausible_model_id("/abs"));
        assert!(!is_plausible_model_id(&"a".repeat(201)));

        assert!(is_plausible_model_id("org/model"));
        assert!(is_plausible_model_id("bert-base-uncased"));
        assert!(is_plausible_model_id("opt-1.3b"));
    }

    #[test]
    fn test_dedupe_merges_evidence() {
        let d = |id: &str, ev: &str, method: &str| Discovery {
            id: id.into(),
            name: id.into(),
            discovery_type: "model".into(),
            path: "a.py".into(),
            evidence: ev.into(),
            method: method.into(),
        };
        let merged = dedupe(vec![
            d("org/m", "from_pretrained at line 1: x", "from_pretrained"),
            d("org/m", "pipeline_positional at line 9: y", "pipeline_positional"),
            d("other/m", "from_pretrained at line 3: z", "from_pretrained"),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].method, "from_pretrained");
        assert!(merged[0].evidence.contains("line 1"));
        assert!(merged[0].evidence.contains("line 9"));
    }

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        let d = |id: &str| Discovery {
            id: id.into(),
            name: id.into(),
            discovery_type: "model".into(),
            ..Discovery::default()
        };
        let merged = dedupe(vec![d("b/b"), d("a/a"), d("b/b")]);
        assert_eq!(merged[0].id, "b/b");
        assert_eq!(merged[1].id, "a/a");
    }

    #[test]
    fn test_duplicate_evidence_not_repeated() {
        let d = Discovery {
            id: "org/m".into(),
            name: "org/m".into(),
            discovery_type: "model".into(),
            path: "a.py".into(),
            evidence: "from_pretrained at line 1: x".into(),
            method: "from_pretrained".into(),
        };
        let merged = dedupe(vec![d.clone(), d.clone()]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].evidence, "from_pretrained at line 1: x");
    }
}
