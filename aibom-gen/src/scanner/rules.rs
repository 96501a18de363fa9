//! Detection rule sets
//!
//! Each rule pairs a named detection method with a compiled pattern and the
//! capture group holding the model ID. Rule sets are built once and shared;
//! they are immutable afterwards.
//!
//! Python rules cover the major Hugging Face entry points across
//! transformers, diffusers, huggingface_hub, sentence-transformers, peft,
//! langchain and evaluate, in both positional and keyword form. The
//! YAML/JSON/Markdown/shell/JS rules require the `namespace/name` form to
//! reduce false positives on generic keys.

use once_cell::sync::Lazy;
use regex::Regex;

/// One detection method: name, pattern, capture group of the model ID.
pub struct DetectionRule {
    pub method: &'static str,
    pub pattern: Regex,
    pub group: usize,
}

impl DetectionRule {
    fn new(method: &'static str, pattern: String) -> Self {
        DetectionRule {
            method,
            pattern: Regex::new(&pattern).expect("invalid detection rule pattern"),
            group: 1,
        }
    }
}

// HF model ID syntax: optional "org/" prefix followed by identifier segments.
// Segment characters: letters, digits, hyphen, underscore, dot.
pub const HF_ID: &str = r"[A-Za-z0-9][A-Za-z0-9_.-]*(?:/[A-Za-z0-9][A-Za-z0-9_.-]*)?";
pub const HF_ID_SLASH: &str = r"[A-Za-z0-9][A-Za-z0-9_.-]*/[A-Za-z0-9][A-Za-z0-9_.-]*";

// Single or double quote.
const Q: &str = r#"["']"#;

/// Rules applied to Python source lines (.py, extracted notebook cells).
pub static CODE_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    vec![
        // Generic positional: .from_pretrained("model-id"). Covers AutoModel,
        // AutoTokenizer, DiffusionPipeline, PeftModel, ORTModel*, etc.
        DetectionRule::new(
            "from_pretrained",
            format!(r"\.from_pretrained\(\s*{Q}({HF_ID}){Q}"),
        ),
        // Keyword form: from_pretrained(pretrained_model_name_or_path="model-id")
        DetectionRule::new(
            "from_pretrained_kwarg",
            format!(r"\.from_pretrained\([^)]*?pretrained_model_name_or_path\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        // transformers pipeline - positional second argument (the model)
        DetectionRule::new(
            "pipeline_positional",
            format!(r#"\bpipeline\(\s*{Q}[^"']+{Q}\s*,\s*{Q}({HF_ID}){Q}"#),
        ),
        // transformers pipeline - named model kwarg
        DetectionRule::new(
            "pipeline_model_kwarg",
            format!(r"\bpipeline\([^)]*?\bmodel\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        // huggingface_hub.hf_hub_download - positional repo_id
        DetectionRule::new(
            "hf_hub_download",
            format!(r"\bhf_hub_download\(\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "hf_hub_download_kwarg",
            format!(r"\bhf_hub_download\([^)]*?\brepo_id\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "snapshot_download",
            format!(r"\bsnapshot_download\(\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "snapshot_download_kwarg",
            format!(r"\bsnapshot_download\([^)]*?\brepo_id\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "InferenceClient",
            format!(r"\bInferenceClient\(\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "InferenceClient_model_kwarg",
            format!(r"\bInferenceClient\([^)]*?\bmodel\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        // older huggingface_hub.InferenceApi - positional
        DetectionRule::new(
            "InferenceApi",
            format!(r"\bInferenceApi\(\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "SentenceTransformer",
            format!(r"\bSentenceTransformer\(\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "CrossEncoder",
            format!(r"\bCrossEncoder\(\s*{Q}({HF_ID}){Q}"),
        ),
        // langchain entry points
        DetectionRule::new(
            "HuggingFaceHub_repo_id",
            format!(r"\bHuggingFaceHub\([^)]*?\brepo_id\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "HuggingFaceEndpoint_repo_id",
            format!(r"\bHuggingFaceEndpoint\([^)]*?\brepo_id\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        DetectionRule::new(
            "HuggingFacePipeline_from_model_id",
            format!(r"\bHuggingFacePipeline\.from_model_id\([^)]*?\bmodel_id\s*=\s*{Q}({HF_ID}){Q}"),
        ),
        // evaluate.load - require org/model; built-in metric names look like "accuracy"
        DetectionRule::new(
            "evaluate_load",
            format!(r"\bevaluate\.load\(\s*{Q}({HF_ID_SLASH}){Q}"),
        ),
        // Generic kwargs - require org/model to avoid false positives
        DetectionRule::new(
            "model_kwarg_slash",
            format!(r"\bmodel\s*=\s*{Q}({HF_ID_SLASH}){Q}"),
        ),
        DetectionRule::new(
            "repo_id_kwarg_slash",
            format!(r"\brepo_id\s*=\s*{Q}({HF_ID_SLASH}){Q}"),
        ),
        DetectionRule::new(
            "model_id_kwarg_slash",
            format!(r"\bmodel_id\s*=\s*{Q}({HF_ID_SLASH}){Q}"),
        ),
    ]
});

/// Rules applied to YAML config files (.yaml, .yml).
///
/// Keys cover HF Trainer, Accelerate, TRL, Axolotl, LLaMA-Factory configs.
pub static YAML_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    let key_alt = "(?:model_name_or_path\
        |pretrained_model_name_or_path\
        |model_name\
        |model_checkpoint\
        |base_model\
        |base_model_name_or_path\
        |model_id\
        |model\
        |repo_id\
        |hub_model_id\
        |teacher_model_name_or_path\
        |student_model_name_or_path\
        |foundation_model\
        |lm_model)";
    vec![DetectionRule::new(
        "yaml_model_field",
        format!(r#"^\s*{key_alt}\s*:\s*["']?({HF_ID_SLASH})["']?\s*(?:#.*)?$"#),
    )]
});

/// Rules applied to JSON files.
pub static JSON_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    vec![
        // HF config.json: "_name_or_path" stores the original model ID
        // (may be single-segment)
        DetectionRule::new(
            "json_name_or_path",
            format!(r#""_name_or_path"\s*:\s*"({HF_ID})""#),
        ),
        // adapter_config.json / training configs
        DetectionRule::new(
            "json_model_name_or_path",
            format!(r#""model_name_or_path"\s*:\s*"({HF_ID_SLASH})""#),
        ),
        DetectionRule::new(
            "json_base_model",
            format!(r#""base_model"\s*:\s*"({HF_ID_SLASH})""#),
        ),
        DetectionRule::new(
            "json_model_field",
            format!(r#""model"\s*:\s*"({HF_ID_SLASH})""#),
        ),
        DetectionRule::new(
            "json_repo_id",
            format!(r#""repo_id"\s*:\s*"({HF_ID_SLASH})""#),
        ),
    ]
});

/// Rules applied to Markdown YAML front-matter sections.
pub static MD_FRONTMATTER_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    let key_alt = "(?:model|base_model|model_id|model_name|model_name_or_path|widget_model)";
    vec![DetectionRule::new(
        "markdown_frontmatter_model",
        format!(r#"^\s*{key_alt}\s*:\s*["']?({HF_ID_SLASH})["']?\s*(?:#.*)?$"#),
    )]
});

/// Rules applied to shell scripts and Dockerfiles.
pub static SHELL_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    vec![
        // huggingface-cli download org/model
        DetectionRule::new(
            "hf_cli_download",
            format!(r#"huggingface-cli\s+download\s+["']?({HF_ID_SLASH})["']?"#),
        ),
        // ENV/ARG model assignments:
        //   MODEL_NAME=org/model  |  export HF_MODEL="org/model"
        DetectionRule::new(
            "shell_model_env",
            format!(
                r#"(?:MODEL(?:_NAME|_ID|_PATH)?|HF_MODEL(?:_ID)?|HUGGINGFACE_MODEL)\s*=\s*["']?({HF_ID_SLASH})["']?"#
            ),
        ),
    ]
});

/// Rules applied to JavaScript / TypeScript.
pub static JS_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    vec![
        // @xenova/transformers or @huggingface/transformers pipeline:
        //   await pipeline("task", "org/model")
        DetectionRule::new(
            "js_pipeline_positional",
            format!(r#"\bpipeline\(\s*["'][^"']+["']\s*,\s*["']({HF_ID})["']"#),
        ),
        DetectionRule::new(
            "js_from_pretrained",
            format!(r#"\.from_pretrained\(\s*["']({HF_ID})["']"#),
        ),
        // @huggingface/inference: hf.textGeneration({ model: "org/model" })
        DetectionRule::new(
            "js_model_field",
            format!(r#"\bmodel\s*:\s*["']({HF_ID_SLASH})["']"#),
        ),
    ]
});
