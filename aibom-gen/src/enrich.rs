//! User-driven enrichment
//!
//! Applies user-supplied `key=value` overrides onto a built document
//! through each spec's `parse` + `apply` with `force = true`, so existing
//! values are overwritten. Keys address fields by their logical document
//! path (the same strings completeness reports print); unknown keys are
//! errors.

use aibom_common::bom::Bom;
use aibom_common::{Error, Result};

use crate::builder::BuilderOptions;
use crate::completeness;
use crate::metadata::{apply::apply_user_value, model_registry, Target};

/// Result of one enrichment pass.
#[derive(Debug, Clone, Default)]
pub struct EnrichOutcome {
    /// Keys that were applied, in input order.
    pub applied: Vec<String>,
    pub score_before: f64,
    pub score_after: f64,
}

/// Parse `key=value` pairs from CLI-style arguments.
pub fn parse_overrides(pairs: &[String]) -> Result<Vec<(String, String)>> {
    let mut out = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(Error::InvalidInput(format!(
                "expected key=value, got {:?}",
                pair
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidInput(format!("empty key in {:?}", pair)));
        }
        out.push((key.to_string(), value.trim().to_string()));
    }
    Ok(out)
}

/// Apply overrides to the model entity of `bom`.
pub fn apply_overrides(bom: &mut Bom, overrides: &[(String, String)]) -> Result<EnrichOutcome> {
    let score_before = completeness::check(bom).score;

    let registry = model_registry();
    let opts = BuilderOptions::default();

    {
        let component = bom
            .metadata
            .as_mut()
            .and_then(|m| m.component.as_mut())
            .ok_or_else(|| Error::InvalidInput("BOM has no metadata.component".to_string()))?;

        let mut tgt = Target {
            component,
            include_evidence_properties: false,
            hub_base_url: opts.hub_base_url.clone(),
        };

        for (key, value) in overrides {
            let spec = registry
                .iter()
                .find(|s| s.key.as_str() == key)
                .ok_or_else(|| Error::InvalidInput(format!("unknown field key: {}", key)))?;
            apply_user_value(spec, value, &mut tgt)
                .map_err(|e| Error::InvalidInput(format!("{}: {}", key, e)))?;
            tracing::info!(key = %key, "override applied");
        }
    }

    let score_after = completeness::check(bom).score;

    Ok(EnrichOutcome {
        applied: overrides.iter().map(|(k, _)| k.clone()).collect(),
        score_before,
        score_after,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BomBuilder, BuildContext};
    use crate::scanner::Discovery;

    fn sparse_bom() -> Bom {
        BomBuilder::default()
            .build(BuildContext {
                model_id: "org/model".into(),
                scan: Discovery::default(),
                hub: None,
                readme: None,
            })
            .unwrap()
    }

    #[test]
    fn test_parse_overrides() {
        let pairs = parse_overrides(&[
            "BOM.metadata.component.licenses=mit".to_string(),
            "BOM.metadata.component.group = org ".to_string(),
        ])
        .unwrap();
        assert_eq!(pairs[0].1, "mit");
        assert_eq!(pairs[1].0, "BOM.metadata.component.group");
        assert_eq!(pairs[1].1, "org");

        assert!(parse_overrides(&["no-equals".to_string()]).is_err());
        assert!(parse_overrides(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_apply_overrides_raises_score() {
        let mut bom = sparse_bom();
        let outcome = apply_overrides(
            &mut bom,
            &[
                (
                    "BOM.metadata.component.licenses".to_string(),
                    "mit".to_string(),
                ),
                (
                    "BOM.metadata.component.modelCard.modelParameters.task".to_string(),
                    "text-generation".to_string(),
                ),
            ],
        )
        .unwrap();

        assert!(outcome.score_after > outcome.score_before);
        let comp = bom.metadata_component().unwrap();
        assert!(comp.licenses.as_ref().is_some_and(|l| !l.is_empty()));
        assert_eq!(
            bom.model_parameters().unwrap().task.as_deref(),
            Some("text-generation")
        );
    }

    #[test]
    fn test_force_overwrites_existing_value() {
        let mut bom = sparse_bom();
        apply_overrides(
            &mut bom,
            &[(
                "BOM.metadata.component.licenses".to_string(),
                "mit".to_string(),
            )],
        )
        .unwrap();
        apply_overrides(
            &mut bom,
            &[(
                "BOM.metadata.component.licenses".to_string(),
                "apache-2.0".to_string(),
            )],
        )
        .unwrap();

        let comp = bom.metadata_component().unwrap();
        let lic = &comp.licenses.as_ref().unwrap()[0];
        assert_eq!(lic.license.as_ref().unwrap().name, "apache-2.0");
    }

    #[test]
    fn test_unknown_key_is_error() {
        let mut bom = sparse_bom();
        let err = apply_overrides(&mut bom, &[("nope".to_string(), "x".to_string())]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
