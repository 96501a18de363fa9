//! BOM file I/O
//!
//! Reads and writes AIBOM documents. Format resolution: an explicit
//! `json`/`xml` must agree with the output path's extension when one is
//! present; `auto` infers from the extension and, on read, falls back to
//! sniffing the first non-whitespace byte.
//!
//! This serialiser emits pretty JSON. `xml` stays a recognised format value
//! but is rejected with a typed error at this boundary.

use std::fs;
use std::path::Path;

use crate::bom::{Bom, SpecVersion};
use crate::error::{Error, Result};

/// Requested document encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Auto,
    Json,
    Xml,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<OutputFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Some(OutputFormat::Auto),
            "json" => Some(OutputFormat::Json),
            "xml" => Some(OutputFormat::Xml),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OutputFormat::Auto => "auto",
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        })
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Resolve `auto` against a file path, leaving explicit formats unchanged.
fn resolve(format: OutputFormat, path: &Path) -> OutputFormat {
    if format != OutputFormat::Auto {
        return format;
    }
    if extension_of(path) == "xml" {
        OutputFormat::Xml
    } else {
        OutputFormat::Json
    }
}

/// Fail fast when an explicit format contradicts the path extension.
fn check_extension(format: OutputFormat, path: &Path) -> Result<()> {
    let ext = extension_of(path);
    if ext.is_empty() {
        return Ok(());
    }
    let matches = match format {
        OutputFormat::Json => ext == "json",
        OutputFormat::Xml => ext == "xml",
        OutputFormat::Auto => true,
    };
    if !matches {
        return Err(Error::InvalidInput(format!(
            "output path extension {:?} does not match format {:?}",
            ext,
            format.to_string()
        )));
    }
    Ok(())
}

/// Read a BOM from a file.
pub fn read_bom(path: &Path, format: OutputFormat) -> Result<Bom> {
    let raw = fs::read_to_string(path)?;
    let mut actual = resolve(format, path);
    if format == OutputFormat::Auto && extension_of(path).is_empty() {
        // No extension to go by; sniff the content.
        let trimmed = raw.trim_start();
        actual = if trimmed.starts_with('<') {
            OutputFormat::Xml
        } else {
            OutputFormat::Json
        };
    }
    match actual {
        OutputFormat::Json | OutputFormat::Auto => serde_json::from_str(&raw)
            .map_err(|e| Error::Parse(format!("decode {}: {}", path.display(), e))),
        OutputFormat::Xml => Err(Error::InvalidInput(
            "xml input is not supported by this serialiser".to_string(),
        )),
    }
}

/// Write a BOM to a file, creating parent directories as needed.
///
/// When `spec` is set the declared specVersion is stamped on the document
/// before encoding.
pub fn write_bom(
    bom: &Bom,
    path: &Path,
    format: OutputFormat,
    spec: Option<SpecVersion>,
) -> Result<()> {
    check_extension(format, path)?;
    let actual = resolve(format, path);
    if actual == OutputFormat::Xml {
        return Err(Error::InvalidInput(
            "xml output is not supported by this serialiser".to_string(),
        ));
    }

    let mut doc = bom.clone();
    if let Some(sv) = spec {
        doc.spec_version = Some(sv);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let encoded = serde_json::to_string_pretty(&doc)
        .map_err(|e| Error::Parse(format!("encode: {}", e)))?;
    fs::write(path, encoded)?;
    tracing::debug!(path = %path.display(), "wrote BOM");
    Ok(())
}
