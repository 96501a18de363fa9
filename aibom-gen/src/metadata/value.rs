//! Tagged-variant field values
//!
//! Field specs read heterogeneous values out of their sources (strings,
//! string lists, integers, booleans, structured refs). `FieldValue` is the
//! type-safe container moved from a source into an apply; the narrow
//! accessors return `None` when the variant does not match.

use aibom_common::bom::{DatasetChoice, EthicalConsideration, PerformanceMetric, Property};
use thiserror::Error;

/// Per-spec failure. Local to one field: logged, never aborts a build.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("{0} value is empty")]
    EmptyValue(&'static str),

    #[error("invalid input for {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// External reference coordinates collected for one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalLinks {
    /// Hub identifier; resolves to the website reference.
    pub id: String,
    pub paper_url: String,
    pub demo_url: String,
}

/// Evidence captured by the scanner for one discovery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanEvidence {
    pub discovery_type: String,
    pub evidence: String,
    pub path: String,
}

/// One value flowing from a source into an apply.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Integer(i64),
    Flag(bool),
    Links(ExternalLinks),
    Datasets(Vec<DatasetChoice>),
    Metrics(Vec<PerformanceMetric>),
    Ethics(Vec<EthicalConsideration>),
    Properties(Vec<Property>),
    Evidence(ScanEvidence),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Render a scalar variant as a property value string.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.trim().to_string()),
            FieldValue::Integer(n) => Some(n.to_string()),
            FieldValue::Flag(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Input handed to a spec's apply: the value plus whether an existing target
/// value may be overwritten. Only user overrides set `force`.
#[derive(Debug, Clone)]
pub struct ApplyInput {
    pub value: FieldValue,
    pub force: bool,
}
