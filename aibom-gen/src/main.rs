//! aibomgen - AI Bill of Materials generator
//!
//! Command surface: scan a source tree for hub model references, generate
//! enriched AIBOM documents (from a scan or from explicit model ids),
//! validate and score existing documents, apply field overrides, and emit
//! a dummy document for demos.
//!
//! Exit codes: 0 on success, 1 on validation failure, 2 on I/O and input
//! errors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use aibom_common::bom::SpecVersion;
use aibom_common::bomio::{self, OutputFormat};
use aibom_common::{Error, Result};
use aibom_gen::generator::{self, DiscoveredBom, GenerateOptions, ProgressEvent};
use aibom_gen::{completeness, config, enrich, scanner, validator};

#[derive(Parser)]
#[command(
    name = "aibomgen",
    version,
    about = "Generate AI Bills of Materials from Hugging Face model usage"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a directory for hub model references
    Scan {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print discoveries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate AIBOM documents from a scan or from model ids
    Generate {
        /// Directory to scan for model references
        #[arg(long, conflicts_with = "model_ids")]
        input: Option<PathBuf>,
        /// Hub model id (repeatable)
        #[arg(long = "model-id", value_name = "ID")]
        model_ids: Vec<String>,
        /// Output path
        #[arg(long, short, default_value = "aibom.json")]
        output: PathBuf,
        /// Output format: auto, json or xml
        #[arg(long, default_value = "auto")]
        format: String,
        /// CycloneDX spec version to declare (e.g. 1.6)
        #[arg(long)]
        spec: Option<String>,
        /// Hub access token (falls back to HF_TOKEN, then the config file)
        #[arg(long)]
        token: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Hub base URL override
        #[arg(long)]
        base_url: Option<String>,
        /// Drop the aibomgen.* evidence properties from the output
        #[arg(long)]
        no_evidence: bool,
    },

    /// Validate an AIBOM document
    Validate {
        file: PathBuf,
        /// Treat missing required fields and low scores as errors
        #[arg(long)]
        strict: bool,
        /// Minimum completeness score in strict mode (0.0 - 1.0)
        #[arg(long, default_value_t = 0.0)]
        min_score: f64,
        /// Input format: auto, json or xml
        #[arg(long, default_value = "auto")]
        format: String,
    },

    /// Report completeness of an AIBOM document
    Completeness {
        file: PathBuf,
        /// Input format: auto, json or xml
        #[arg(long, default_value = "auto")]
        format: String,
    },

    /// Apply field overrides to an AIBOM document
    Enrich {
        file: PathBuf,
        /// Field override as KEY=VALUE (repeatable); keys are logical
        /// document paths as printed by the completeness report
        #[arg(long = "set", value_name = "KEY=VALUE")]
        sets: Vec<String>,
        /// Output path (defaults to rewriting the input file)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write a fully populated dummy document (no network)
    Dummy {
        /// Output path
        #[arg(long, short, default_value = "aibom-dummy.json")]
        output: PathBuf,
        /// Output format: auto, json or xml
        #[arg(long, default_value = "auto")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Scan { path, json } => run_scan(&path, json),
        Command::Generate {
            input,
            model_ids,
            output,
            format,
            spec,
            token,
            timeout,
            base_url,
            no_evidence,
        } => {
            run_generate(
                input, model_ids, output, &format, spec, token, timeout, base_url, no_evidence,
            )
            .await
        }
        Command::Validate {
            file,
            strict,
            min_score,
            format,
        } => run_validate(&file, strict, min_score, &format),
        Command::Completeness { file, format } => run_completeness(&file, &format),
        Command::Enrich { file, sets, output } => run_enrich(&file, &sets, output),
        Command::Dummy { output, format } => run_dummy(&output, &format),
    }
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    OutputFormat::parse(s)
        .ok_or_else(|| Error::InvalidInput(format!("invalid format {:?} (expected auto|json|xml)", s)))
}

fn parse_spec(s: Option<&str>) -> Result<Option<SpecVersion>> {
    match s {
        None => Ok(None),
        Some(s) => SpecVersion::parse(s)
            .map(Some)
            .ok_or_else(|| Error::InvalidInput(format!("unsupported CycloneDX spec version: {:?}", s))),
    }
}

fn run_scan(path: &Path, json: bool) -> Result<ExitCode> {
    let discoveries = scanner::scan(path).map_err(|e| Error::InvalidInput(e.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&discoveries).map_err(|e| Error::Parse(e.to_string()))?);
    } else {
        for d in &discoveries {
            println!("{}\t{}\t{}", d.id, d.method, d.path);
        }
        let models = discoveries
            .iter()
            .filter(|d| d.discovery_type == "model")
            .count();
        info!(
            "detected {} components (models: {})",
            discoveries.len(),
            models
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::too_many_arguments)]
async fn run_generate(
    input: Option<PathBuf>,
    model_ids: Vec<String>,
    output: PathBuf,
    format: &str,
    spec: Option<String>,
    token: Option<String>,
    timeout: Option<u64>,
    base_url: Option<String>,
    no_evidence: bool,
) -> Result<ExitCode> {
    let format = parse_format(format)?;
    let spec = parse_spec(spec.as_deref())?;

    let file_config = config::TomlConfig::load_default();
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping after the current model");
                cancel.cancel();
            }
        });
    }

    let opts = GenerateOptions {
        hub_token: config::resolve_token(token.as_deref(), &file_config),
        timeout: config::resolve_timeout(timeout, &file_config),
        hub_base_url: config::resolve_base_url(base_url.as_deref(), &file_config),
        include_evidence_properties: !no_evidence,
        on_progress: Some(Box::new(progress_line)),
        cancel,
    };

    let results = if !model_ids.is_empty() {
        generator::build_from_model_ids(&model_ids, opts)
            .await
            .map_err(|e| Error::Internal(e.to_string()))?
    } else {
        let root = input.unwrap_or_else(|| PathBuf::from("."));
        let discoveries =
            scanner::scan(&root).map_err(|e| Error::InvalidInput(e.to_string()))?;
        if discoveries.is_empty() {
            warn!("no model references found under {}", root.display());
            return Ok(ExitCode::SUCCESS);
        }
        info!("scan found {} model reference(s)", discoveries.len());
        generator::build_per_discovery(&discoveries, opts)
            .await
            .map_err(|e| Error::Internal(e.to_string()))?
    };

    if results.is_empty() {
        warn!("no documents generated");
        return Ok(ExitCode::SUCCESS);
    }

    write_results(&results, &output, format, spec)?;
    Ok(ExitCode::SUCCESS)
}

fn progress_line(event: ProgressEvent) {
    match event {
        ProgressEvent::FetchStart {
            model_id,
            index,
            total,
        } => info!("[{}/{}] fetching {}", index + 1, total, model_id),
        ProgressEvent::ModelComplete { model_id, datasets } => {
            info!("{} complete ({} dataset(s))", model_id, datasets)
        }
        ProgressEvent::Error { model_id, message } => warn!("{}: {}", model_id, message),
        ProgressEvent::DatasetComplete {
            dataset_id,
            model_id: _,
        } => info!("  dataset {} added", dataset_id),
        _ => {}
    }
}

/// Write one document per result. A single result lands at `output`; with
/// several, an index is inserted before the extension.
fn write_results(
    results: &[DiscoveredBom],
    output: &Path,
    format: OutputFormat,
    spec: Option<SpecVersion>,
) -> Result<()> {
    if results.len() == 1 {
        bomio::write_bom(&results[0].bom, output, format, spec)?;
        info!("wrote {}", output.display());
        return Ok(());
    }

    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "aibom".to_string());
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "json".to_string());
    let dir = output.parent().unwrap_or_else(|| Path::new("."));

    for (i, result) in results.iter().enumerate() {
        let path = dir.join(format!("{}-{}.{}", stem, i + 1, ext));
        bomio::write_bom(&result.bom, &path, format, spec)?;
        info!("wrote {} ({})", path.display(), result.discovery.id);
    }
    Ok(())
}

fn run_validate(file: &Path, strict: bool, min_score: f64, format: &str) -> Result<ExitCode> {
    let format = parse_format(format)?;
    let bom = bomio::read_bom(file, format)?;

    let opts = validator::ValidationOptions {
        strict_mode: strict,
        min_completeness_score: min_score,
        check_model_card: true,
    };
    let result = validator::validate(&bom, &opts);

    println!("{}", result.summary());
    for err in &result.errors {
        println!("error: {}", err);
    }
    for warning in &result.warnings {
        println!("warning: {}", warning);
    }

    if result.valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn run_completeness(file: &Path, format: &str) -> Result<ExitCode> {
    let format = parse_format(format)?;
    let bom = bomio::read_bom(file, format)?;
    let report = completeness::check(&bom);

    println!(
        "{}: score {:.1}% ({}/{} fields)",
        if report.model_id.is_empty() {
            "(unknown)"
        } else {
            &report.model_id
        },
        report.score * 100.0,
        report.passed,
        report.total
    );
    if !report.missing_required.is_empty() {
        let keys: Vec<String> = report.missing_required.iter().map(|k| k.to_string()).collect();
        println!("missing required: {}", keys.join(", "));
    }
    if !report.missing_optional.is_empty() {
        let keys: Vec<String> = report.missing_optional.iter().map(|k| k.to_string()).collect();
        println!("missing optional: {}", keys.join(", "));
    }
    for (name, ds) in &report.dataset_reports {
        println!(
            "dataset {}: score {:.1}% ({}/{} fields)",
            name,
            ds.score * 100.0,
            ds.passed,
            ds.total
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_enrich(file: &Path, sets: &[String], output: Option<PathBuf>) -> Result<ExitCode> {
    if sets.is_empty() {
        return Err(Error::InvalidInput(
            "no overrides given (use --set KEY=VALUE)".to_string(),
        ));
    }
    let overrides = enrich::parse_overrides(sets)?;
    let mut bom = bomio::read_bom(file, OutputFormat::Auto)?;

    let outcome = enrich::apply_overrides(&mut bom, &overrides)?;
    println!(
        "applied {} override(s); completeness {:.1}% -> {:.1}%",
        outcome.applied.len(),
        outcome.score_before * 100.0,
        outcome.score_after * 100.0
    );

    let target = output.unwrap_or_else(|| file.to_path_buf());
    bomio::write_bom(&bom, &target, OutputFormat::Auto, None)?;
    info!("wrote {}", target.display());
    Ok(ExitCode::SUCCESS)
}

fn run_dummy(output: &Path, format: &str) -> Result<ExitCode> {
    let format = parse_format(format)?;
    let results = generator::build_dummy().map_err(|e| Error::Internal(e.to_string()))?;
    bomio::write_bom(&results[0].bom, output, format, None)?;
    info!("wrote {}", output.display());
    Ok(ExitCode::SUCCESS)
}
