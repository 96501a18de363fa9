//! Parsers for user-provided override values
//!
//! Turn the string a user supplies for a field into the typed value its
//! spec's apply expects. Comma-separated lists; `name:value` pairs for
//! metrics, ethics and properties.

use aibom_common::bom::{DatasetChoice, EthicalConsideration, PerformanceMetric, Property};

use super::value::{FieldError, FieldValue};

pub fn parse_non_empty_string(value: &str, field: &'static str) -> Result<FieldValue, FieldError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(FieldError::EmptyValue(field));
    }
    Ok(FieldValue::Text(s.to_string()))
}

/// Comma list that keeps empty entries (tags may legitimately be blank-ish).
pub fn parse_tags_preserve_empty(
    value: &str,
    field: &'static str,
) -> Result<FieldValue, FieldError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(FieldError::EmptyValue(field));
    }
    let parts: Vec<String> = s.split(',').map(|p| p.trim().to_string()).collect();
    Ok(FieldValue::List(parts))
}

/// Comma list; empty entries dropped.
pub fn parse_comma_list(value: &str, field: &'static str) -> Result<FieldValue, FieldError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(FieldError::EmptyValue(field));
    }
    let out: Vec<String> = s
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if out.is_empty() {
        return Err(FieldError::Other(format!("no valid {} found", field)));
    }
    Ok(FieldValue::List(out))
}

pub fn parse_dataset_refs(value: &str) -> Result<FieldValue, FieldError> {
    let FieldValue::List(refs) = parse_comma_list(value, "datasets")? else {
        unreachable!()
    };
    let choices: Vec<DatasetChoice> = refs
        .into_iter()
        .map(|reference| DatasetChoice { reference })
        .collect();
    if choices.is_empty() {
        return Err(FieldError::Other("no valid dataset references found".into()));
    }
    Ok(FieldValue::Datasets(choices))
}

/// `name[:mitigation]` pairs, comma-separated.
pub fn parse_ethical_considerations(value: &str) -> Result<FieldValue, FieldError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(FieldError::EmptyValue("ethicalConsiderations"));
    }
    let mut ethics = Vec::new();
    for item in s.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        match item.split_once(':') {
            Some((name, mitigation)) => {
                let name = name.trim();
                if !name.is_empty() {
                    ethics.push(EthicalConsideration {
                        name: name.to_string(),
                        mitigation_strategy: mitigation.trim().to_string(),
                    });
                }
            }
            None => ethics.push(EthicalConsideration {
                name: item.to_string(),
                mitigation_strategy: String::new(),
            }),
        }
    }
    if ethics.is_empty() {
        return Err(FieldError::Other(
            "no valid ethical considerations found".into(),
        ));
    }
    Ok(FieldValue::Ethics(ethics))
}

/// `type[:value]` pairs, comma-separated.
pub fn parse_performance_metrics(value: &str) -> Result<FieldValue, FieldError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(FieldError::EmptyValue("performanceMetrics"));
    }
    let mut metrics = Vec::new();
    for pair in s.split(',') {
        let pair = pair.trim();
        match pair.split_once(':') {
            Some((metric_type, value)) => {
                let metric_type = metric_type.trim();
                if !metric_type.is_empty() {
                    metrics.push(PerformanceMetric {
                        metric_type: metric_type.to_string(),
                        value: value.trim().to_string(),
                    });
                }
            }
            None => {
                if !pair.is_empty() {
                    metrics.push(PerformanceMetric {
                        metric_type: pair.to_string(),
                        value: String::new(),
                    });
                }
            }
        }
    }
    if metrics.is_empty() {
        return Err(FieldError::Other("no valid performance metrics found".into()));
    }
    Ok(FieldValue::Metrics(metrics))
}

/// `name:value` pairs, comma-separated; both sides required.
pub fn parse_properties(value: &str) -> Result<FieldValue, FieldError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(FieldError::EmptyValue("environmentalConsiderations"));
    }
    let mut props = Vec::new();
    for pair in s.split(',') {
        if let Some((name, val)) = pair.trim().split_once(':') {
            let name = name.trim();
            let val = val.trim();
            if !name.is_empty() && !val.is_empty() {
                props.push(Property {
                    name: name.to_string(),
                    value: val.to_string(),
                });
            }
        }
    }
    if props.is_empty() {
        return Err(FieldError::Other(
            "no valid key:value pairs found in environmentalConsiderations".into(),
        ));
    }
    Ok(FieldValue::Properties(props))
}
