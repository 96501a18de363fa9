//! Dependency graph wiring
//!
//! The model entity lists every admitted dataset entity under `dependsOn`;
//! each dataset appears as a node with no outgoing edges. Entities without
//! a BOMRef are never admitted to the graph.

use aibom_common::bom::{Bom, ComponentType, Dependency};

/// Build the dependency graph for a finished document.
///
/// No-op when the model entity carries no BOMRef.
pub fn add_dependencies(bom: &mut Bom) {
    let Some(model_ref) = bom
        .metadata_component()
        .and_then(|c| c.bom_ref.clone())
        .filter(|r| !r.is_empty())
    else {
        return;
    };

    let dataset_refs: Vec<String> = bom
        .components
        .iter()
        .flatten()
        .filter(|c| c.component_type == ComponentType::Data)
        .filter_map(|c| c.bom_ref.clone())
        .filter(|r| !r.is_empty())
        .collect();

    let mut deps = Vec::with_capacity(1 + dataset_refs.len());
    deps.push(Dependency {
        reference: model_ref,
        depends_on: (!dataset_refs.is_empty()).then(|| dataset_refs.clone()),
    });
    for ds in dataset_refs {
        deps.push(Dependency {
            reference: ds,
            depends_on: None,
        });
    }

    bom.dependencies = Some(deps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use aibom_common::bom::{Component, Metadata};

    fn bom_with_model_ref(model_ref: Option<&str>) -> Bom {
        let mut model = Component::new(ComponentType::MachineLearningModel, "org/model");
        model.bom_ref = model_ref.map(str::to_string);
        let mut bom = Bom::new();
        bom.metadata = Some(Metadata {
            component: Some(model),
            ..Metadata::default()
        });
        bom
    }

    fn dataset(bom_ref: Option<&str>) -> Component {
        let mut c = Component::new(ComponentType::Data, "ds");
        c.bom_ref = bom_ref.map(str::to_string);
        c
    }

    #[test]
    fn test_model_depends_on_datasets() {
        let mut bom = bom_with_model_ref(Some("pkg:huggingface/org/model"));
        bom.components = Some(vec![dataset(Some("pkg:huggingface/datasets/a/b"))]);

        add_dependencies(&mut bom);

        let deps = bom.dependencies.as_ref().unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].reference, "pkg:huggingface/org/model");
        assert_eq!(
            deps[0].depends_on.as_ref().unwrap(),
            &vec!["pkg:huggingface/datasets/a/b".to_string()]
        );
        assert_eq!(deps[1].reference, "pkg:huggingface/datasets/a/b");
        assert!(deps[1].depends_on.is_none());
    }

    #[test]
    fn test_dependency_closure() {
        let mut bom = bom_with_model_ref(Some("pkg:huggingface/org/model"));
        bom.components = Some(vec![
            dataset(Some("pkg:huggingface/datasets/a/b")),
            dataset(Some("pkg:huggingface/datasets/c/d")),
        ]);

        add_dependencies(&mut bom);

        let deps = bom.dependencies.as_ref().unwrap();
        let nodes: Vec<&str> = deps.iter().map(|d| d.reference.as_str()).collect();
        for listed in deps[0].depends_on.as_ref().unwrap() {
            assert!(nodes.contains(&listed.as_str()));
        }
    }

    #[test]
    fn test_empty_dataset_refs_are_dropped() {
        let mut bom = bom_with_model_ref(Some("pkg:huggingface/org/model"));
        bom.components = Some(vec![dataset(None), dataset(Some(""))]);

        add_dependencies(&mut bom);

        let deps = bom.dependencies.as_ref().unwrap();
        assert_eq!(deps.len(), 1);
        assert!(deps[0].depends_on.is_none());
    }

    #[test]
    fn test_no_model_ref_emits_nothing() {
        let mut bom = bom_with_model_ref(None);
        add_dependencies(&mut bom);
        assert!(bom.dependencies.is_none());
    }
}
