//! Orchestrator integration tests against a stub hub

use std::sync::{Arc, Mutex};

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aibom_common::bom::ComponentType;
use aibom_gen::generator::{
    build_from_model_ids, build_per_discovery, GenerateOptions, ProgressEvent,
};
use aibom_gen::scanner::Discovery;

fn opts_for(server: &MockServer) -> GenerateOptions {
    GenerateOptions {
        hub_base_url: server.uri(),
        ..GenerateOptions::default()
    }
}

async fn mount_model(server: &MockServer, id: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/models/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_model_readme(server: &MockServer, id: &str, content: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/resolve/main/README.md", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_generate_from_model_id_with_dataset() {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "org/model",
        json!({
            "id": "org/model",
            "pipeline_tag": "text-generation",
            "sha": "ABC",
            "tags": ["license:mit", "dataset:glue"],
        }),
    )
    .await;
    mount_model_readme(
        &server,
        "org/model",
        "---\nlicense: mit\n---\n\n# Card\n\n- **Developed by:** hf-team\n",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/datasets/glue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "glue",
            "author": "nyu-mll",
        })))
        .mount(&server)
        .await;

    let results = build_from_model_ids(&["org/model".to_string()], opts_for(&server))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    let bom = &results[0].bom;

    let model = bom.metadata_component().unwrap();
    assert_eq!(model.name, "org/model");
    assert_eq!(model.purl.as_deref(), Some("pkg:huggingface/org/model@abc"));

    let refs = model.external_references.as_ref().unwrap();
    assert_eq!(refs[0].reference_type, "website");
    assert_eq!(refs[0].url, format!("{}/org/model", server.uri()));

    let license = &model.licenses.as_ref().unwrap()[0];
    assert_eq!(license.license.as_ref().unwrap().name, "mit");
    assert_eq!(
        model.manufacturer.as_ref().map(|m| m.name.as_str()),
        Some("hf-team")
    );

    // The GLUE dataset is admitted as a data component with a dependency edge.
    let components = bom.components.as_ref().unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].component_type, ComponentType::Data);
    assert_eq!(components[0].name, "glue");

    let deps = bom.dependencies.as_ref().unwrap();
    assert_eq!(deps[0].reference, "pkg:huggingface/org/model@abc");
    assert_eq!(
        deps[0].depends_on.as_ref().unwrap(),
        &vec!["pkg:huggingface/datasets/glue".to_string()]
    );
    assert_eq!(deps[1].reference, "pkg:huggingface/datasets/glue");
}

#[tokio::test]
async fn test_empty_model_id_list() {
    let server = MockServer::start().await;
    let results = build_from_model_ids(&[], opts_for(&server)).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_blank_model_ids_are_skipped() {
    let server = MockServer::start().await;
    let results = build_from_model_ids(&["   ".to_string()], opts_for(&server))
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_model_not_found_still_builds_document() {
    let server = MockServer::start().await;
    // No mocks mounted: every request 404s.
    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let opts = GenerateOptions {
        hub_base_url: server.uri(),
        on_progress: Some(Box::new(move |e| sink.lock().unwrap().push(e))),
        ..GenerateOptions::default()
    };

    let results = build_from_model_ids(&["org/missing".to_string()], opts)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);

    let model = results[0].bom.metadata_component().unwrap();
    assert_eq!(model.name, "org/missing");
    assert!(model.licenses.is_none());

    let events = events.lock().unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::Error { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, ProgressEvent::ModelComplete { datasets: 0, .. })));
}

#[tokio::test]
async fn test_unreachable_dataset_is_skipped_silently() {
    let server = MockServer::start().await;
    mount_model(
        &server,
        "org/model",
        json!({
            "id": "org/model",
            "cardData": {"datasets": ["org/gone"]},
        }),
    )
    .await;

    let results = build_from_model_ids(&["org/model".to_string()], opts_for(&server))
        .await
        .unwrap();
    let bom = &results[0].bom;

    // The reference survives in the model card, but no component appears.
    let mp = bom.model_parameters().unwrap();
    assert_eq!(mp.datasets.as_ref().unwrap()[0].reference, "dataset:org/gone");
    assert!(bom.components.is_none());

    // And the dependency graph holds only the model node.
    let deps = bom.dependencies.as_ref().unwrap();
    assert_eq!(deps.len(), 1);
    assert!(deps[0].depends_on.is_none());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models/org/private"))
        .and(header("authorization", "Bearer hf_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "org/private",
            "private": true,
        })))
        .mount(&server)
        .await;

    let opts = GenerateOptions {
        hub_base_url: server.uri(),
        hub_token: "hf_secret".to_string(),
        ..GenerateOptions::default()
    };
    let results = build_from_model_ids(&["org/private".to_string()], opts)
        .await
        .unwrap();

    let model = results[0].bom.metadata_component().unwrap();
    // The record only decodes when the token matched the mock.
    assert_eq!(model.property("huggingface:private"), Some("true"));
}

#[tokio::test]
async fn test_readme_master_fallback() {
    let server = MockServer::start().await;
    mount_model(&server, "org/old", json!({"id": "org/old"})).await;
    Mock::given(method("GET"))
        .and(path("/org/old/resolve/master/README.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("# Card\n\n- **Developed by:** old-team\n"),
        )
        .mount(&server)
        .await;

    let results = build_from_model_ids(&["org/old".to_string()], opts_for(&server))
        .await
        .unwrap();
    let model = results[0].bom.metadata_component().unwrap();
    assert_eq!(
        model.manufacturer.as_ref().map(|m| m.name.as_str()),
        Some("old-team")
    );
}

#[tokio::test]
async fn test_build_per_discovery_keeps_input_order_and_evidence() {
    let server = MockServer::start().await;
    mount_model(&server, "org/a", json!({"id": "org/a"})).await;
    mount_model(&server, "org/b", json!({"id": "org/b"})).await;

    let discoveries = vec![
        Discovery {
            id: "org/b".into(),
            name: "org/b".into(),
            discovery_type: "model".into(),
            path: "b.py".into(),
            evidence: "from_pretrained at line 3: b".into(),
            method: "from_pretrained".into(),
        },
        Discovery {
            id: "org/a".into(),
            name: "org/a".into(),
            discovery_type: "model".into(),
            path: "a.py".into(),
            evidence: "from_pretrained at line 1: a".into(),
            method: "from_pretrained".into(),
        },
    ];

    let results = build_per_discovery(&discoveries, opts_for(&server))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].discovery.id, "org/b");
    assert_eq!(results[1].discovery.id, "org/a");

    // Evidence properties are on by default.
    let model = results[0].bom.metadata_component().unwrap();
    assert_eq!(model.property("aibomgen.path"), Some("b.py"));
    assert_eq!(
        model.property("aibomgen.evidence"),
        Some("from_pretrained at line 3: b")
    );
}

#[tokio::test]
async fn test_evidence_properties_can_be_disabled() {
    let server = MockServer::start().await;
    mount_model(&server, "org/a", json!({"id": "org/a"})).await;

    let discoveries = vec![Discovery {
        id: "org/a".into(),
        name: "org/a".into(),
        discovery_type: "model".into(),
        path: "a.py".into(),
        evidence: "from_pretrained at line 1: a".into(),
        method: "from_pretrained".into(),
    }];

    let opts = GenerateOptions {
        hub_base_url: server.uri(),
        include_evidence_properties: false,
        ..GenerateOptions::default()
    };
    let results = build_per_discovery(&discoveries, opts).await.unwrap();
    let model = results[0].bom.metadata_component().unwrap();
    assert_eq!(model.property("aibomgen.path"), None);
    assert_eq!(model.property("aibomgen.evidence"), None);
}

#[tokio::test]
async fn test_progress_event_order_for_one_model() {
    let server = MockServer::start().await;
    mount_model(&server, "org/model", json!({"id": "org/model"})).await;
    mount_model_readme(&server, "org/model", "# Card\n").await;

    let events: Arc<Mutex<Vec<ProgressEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let opts = GenerateOptions {
        hub_base_url: server.uri(),
        on_progress: Some(Box::new(move |e| sink.lock().unwrap().push(e))),
        ..GenerateOptions::default()
    };

    build_from_model_ids(&["org/model".to_string()], opts)
        .await
        .unwrap();

    let events = events.lock().unwrap();
    assert!(matches!(
        events.first(),
        Some(ProgressEvent::FetchStart { index: 0, total: 1, .. })
    ));
    let build_start = events
        .iter()
        .position(|e| matches!(e, ProgressEvent::BuildStart { .. }))
        .unwrap();
    let api_done = events
        .iter()
        .position(|e| matches!(e, ProgressEvent::FetchApiComplete { .. }))
        .unwrap();
    assert!(api_done < build_start);
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::ModelComplete { .. })
    ));
}
