//! Enrichment orchestrator
//!
//! For each input (a scanner discovery or a bare model id): fetch the hub
//! record and README concurrently, build the model document, fetch and
//! build one entity per referenced dataset (one recursive hop), wire the
//! dependency graph, and emit progress events along the way.
//!
//! One model never fails the run: fetch and build failures surface as
//! progress events and the offending input is skipped or produces a
//! document with missing fields. Output order matches input order.
//! Cancellation stops iterating at the next model boundary; documents
//! completed so far are returned.

pub mod dummy;
pub mod progress;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use aibom_common::bom::Bom;

use crate::builder::{add_dependencies, BomBuilder, BuildContext, BuilderOptions, DatasetBuildContext};
use crate::hub::{HubClient, HubError, ModelReadmeCard, ModelRecord};
use crate::scanner::Discovery;

pub use dummy::build_dummy;
pub use progress::{ProgressCallback, ProgressEvent};

/// One generated document, paired with the discovery that produced it.
#[derive(Debug, Clone)]
pub struct DiscoveredBom {
    pub discovery: Discovery,
    pub bom: Bom,
}

/// Options for one generation run.
pub struct GenerateOptions {
    pub hub_token: String,
    /// Per-request deadline; zero falls back to the 10 s default.
    pub timeout: Duration,
    pub hub_base_url: String,
    pub include_evidence_properties: bool,
    pub on_progress: Option<ProgressCallback>,
    pub cancel: CancellationToken,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            hub_token: String::new(),
            timeout: Duration::from_secs(10),
            hub_base_url: String::new(),
            include_evidence_properties: true,
            on_progress: None,
            cancel: CancellationToken::new(),
        }
    }
}

struct Run {
    client: HubClient,
    builder: BomBuilder,
    progress: ProgressCallback,
    cancel: CancellationToken,
}

impl Run {
    fn new(opts: GenerateOptions) -> Result<Self, HubError> {
        let timeout = if opts.timeout.is_zero() {
            Duration::from_secs(10)
        } else {
            opts.timeout
        };
        let client = HubClient::new(&opts.hub_base_url, &opts.hub_token, timeout)?;
        let builder = BomBuilder::new(BuilderOptions {
            include_evidence_properties: opts.include_evidence_properties,
            hub_base_url: format!("{}/", client.base_url()),
        });
        let progress = opts.on_progress.unwrap_or_else(|| Box::new(|_| {}));
        Ok(Run {
            client,
            builder,
            progress,
            cancel: opts.cancel,
        })
    }

    fn emit(&self, event: ProgressEvent) {
        (self.progress)(event);
    }

    /// Fetch, build and enrich one model. Returns `None` when the build is
    /// rejected (the error was already reported through progress).
    async fn process_model(
        &self,
        model_id: &str,
        discovery: Discovery,
        index: usize,
        total: usize,
    ) -> Option<DiscoveredBom> {
        self.emit(ProgressEvent::FetchStart {
            model_id: model_id.to_string(),
            index,
            total,
        });

        // API record and README may fail independently; either failure
        // yields an absent bundle, not an abort.
        let (hub, readme) = tokio::select! {
            _ = self.cancel.cancelled() => return None,
            fetched = async {
                tokio::join!(
                    self.client.fetch_model(model_id),
                    self.client.fetch_model_readme(model_id),
                )
            } => fetched,
        };

        let hub = match hub {
            Ok(record) => {
                self.emit(ProgressEvent::FetchApiComplete {
                    model_id: model_id.to_string(),
                });
                Some(record)
            }
            Err(e) => {
                tracing::warn!(model_id = %model_id, error = %e, "model API fetch failed");
                self.emit(ProgressEvent::Error {
                    model_id: model_id.to_string(),
                    message: format!("API fetch failed: {}", e),
                });
                None
            }
        };

        let readme = match readme {
            Ok(card) => {
                self.emit(ProgressEvent::FetchReadmeComplete {
                    model_id: model_id.to_string(),
                });
                Some(card)
            }
            Err(e) => {
                tracing::debug!(model_id = %model_id, error = %e, "readme fetch failed");
                None
            }
        };

        self.emit(ProgressEvent::BuildStart {
            model_id: model_id.to_string(),
        });

        let dataset_ids = extract_datasets_from_model(hub.as_ref(), readme.as_ref());

        let mut bom = match self.builder.build(BuildContext {
            model_id: model_id.to_string(),
            scan: discovery.clone(),
            hub,
            readme,
        }) {
            Ok(bom) => bom,
            Err(e) => {
                self.emit(ProgressEvent::Error {
                    model_id: model_id.to_string(),
                    message: format!("document build failed: {}", e),
                });
                return None;
            }
        };

        self.emit(ProgressEvent::BuildComplete {
            model_id: model_id.to_string(),
        });

        let dataset_count = self.build_dataset_components(&mut bom, &dataset_ids, model_id).await;

        add_dependencies(&mut bom);

        self.emit(ProgressEvent::ModelComplete {
            model_id: model_id.to_string(),
            datasets: dataset_count,
        });

        Some(DiscoveredBom { discovery, bom })
    }

    /// Fetch and build dataset entities, appending the admitted ones to
    /// `components[]`. Dataset references that fail to fetch are skipped
    /// silently; the reference stays in the model's training metadata.
    async fn build_dataset_components(
        &self,
        bom: &mut Bom,
        dataset_ids: &[String],
        model_id: &str,
    ) -> usize {
        let mut count = 0;
        for dataset_id in dataset_ids {
            if self.cancel.is_cancelled() {
                break;
            }
            self.emit(ProgressEvent::DatasetStart {
                model_id: model_id.to_string(),
                dataset_id: dataset_id.clone(),
            });

            let record = match self.client.fetch_dataset(dataset_id).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(dataset_id = %dataset_id, error = %e, "dataset fetch failed, skipping");
                    continue;
                }
            };
            let readme = self.client.fetch_dataset_readme(dataset_id).await.ok();

            let component = match self.builder.build_dataset(DatasetBuildContext {
                dataset_id: dataset_id.clone(),
                scan: Discovery {
                    id: dataset_id.clone(),
                    name: dataset_id.clone(),
                    discovery_type: "dataset".to_string(),
                    ..Discovery::default()
                },
                hub: Some(record),
                readme,
            }) {
                Ok(component) => component,
                Err(e) => {
                    tracing::debug!(dataset_id = %dataset_id, error = %e, "dataset build failed, skipping");
                    continue;
                }
            };

            bom.components.get_or_insert_with(Vec::new).push(component);
            count += 1;

            self.emit(ProgressEvent::DatasetComplete {
                model_id: model_id.to_string(),
                dataset_id: dataset_id.clone(),
            });
        }
        count
    }
}

/// Generate one document per hub model id, in input order.
pub async fn build_from_model_ids(
    model_ids: &[String],
    opts: GenerateOptions,
) -> Result<Vec<DiscoveredBom>, HubError> {
    let run = Run::new(opts)?;
    let mut results = Vec::with_capacity(model_ids.len());

    for (index, model_id) in model_ids.iter().enumerate() {
        let model_id = model_id.trim();
        if model_id.is_empty() {
            continue;
        }
        if run.cancel.is_cancelled() {
            break;
        }

        let discovery = Discovery {
            id: model_id.to_string(),
            name: model_id.to_string(),
            discovery_type: "huggingface".to_string(),
            path: String::new(),
            evidence: format!("from model-id: {}", model_id),
            method: String::new(),
        };

        if let Some(result) = run
            .process_model(model_id, discovery, index, model_ids.len())
            .await
        {
            results.push(result);
        }
    }

    Ok(results)
}

/// Generate one document per scanner discovery, in input order.
pub async fn build_per_discovery(
    discoveries: &[Discovery],
    opts: GenerateOptions,
) -> Result<Vec<DiscoveredBom>, HubError> {
    let run = Run::new(opts)?;
    let mut results = Vec::with_capacity(discoveries.len());

    for (index, discovery) in discoveries.iter().enumerate() {
        if run.cancel.is_cancelled() {
            break;
        }

        let mut model_id = discovery.id.trim();
        if model_id.is_empty() {
            model_id = discovery.name.trim();
        }

        if let Some(result) = run
            .process_model(model_id, discovery.clone(), index, discoveries.len())
            .await
        {
            results.push(result);
        }
    }

    Ok(results)
}

/// Dataset ids referenced by a model's training metadata: the union of
/// `cardData.datasets` (string or array), `dataset:`-prefixed hub tags
/// (prefix stripped) and the README front-matter datasets, deduped in
/// first-seen order.
pub fn extract_datasets_from_model(
    hub: Option<&ModelRecord>,
    readme: Option<&ModelReadmeCard>,
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    let mut add = |raw: &str| {
        let raw = raw.trim();
        if raw.is_empty() {
            return;
        }
        if seen.insert(raw.to_string()) {
            out.push(raw.to_string());
        }
    };

    if let Some(record) = hub {
        if let Some(card) = &record.card_data {
            match card.get("datasets") {
                Some(serde_json::Value::String(s)) => add(s),
                Some(serde_json::Value::Array(items)) => {
                    for item in items {
                        if let Some(s) = item.as_str() {
                            add(s);
                        }
                    }
                }
                _ => {}
            }
        }
        for tag in &record.tags {
            if let Some(rest) = tag.trim().strip_prefix("dataset:") {
                add(rest);
            }
        }
    }

    if let Some(card) = readme {
        for dataset_id in &card.datasets {
            add(dataset_id);
        }
    }

    out
}
