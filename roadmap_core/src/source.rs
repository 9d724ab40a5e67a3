//! Gap-item and dependency sources, and the service that plans from them.
//!
//! The sources stand in for the gap-analysis store and the dependency
//! relation table. [`PlanningService`] fetches from both, runs the planner
//! and folds any failure into a [`PlanResponse`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::is_json;
use crate::error::{PlanningError, Result};
use crate::planner::{validate_request, Planner};
use crate::types::{
    DependencyEdge, DependencySnapshot, GapItem, PlanRequest, PlanResponse, PlanResult,
};

/// Supplies the gap items of an analysis.
#[async_trait]
pub trait GapItemSource: Send + Sync {
    /// Lists every gap item of the analysis.
    async fn list_items(&self, analysis_id: &str) -> Result<Vec<GapItem>>;
}

/// Supplies dependency edges between gap items.
#[async_trait]
pub trait DependencySource: Send + Sync {
    /// Lists edges whose dependent item is among `ids`.
    async fn list_edges(&self, ids: &[String]) -> Result<DependencySnapshot>;
}

/// A gap analysis held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    /// Analysis identifier
    pub analysis_id: String,
    /// Gap items
    pub items: Vec<GapItem>,
    /// Dependency edges
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
    /// Pre-computed topological order, if the producer has one
    #[serde(default)]
    pub topological_order: Option<Vec<String>>,
    /// Pre-computed cycle flag, if the producer has one
    #[serde(default)]
    pub has_cycle: Option<bool>,
}

impl AnalysisDocument {
    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a document file; `.json` is read as JSON, anything else as YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let document = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::debug!(
            "Loaded analysis {} from {} ({} items, {} edges)",
            document.analysis_id,
            path.display(),
            document.items.len(),
            document.dependencies.len()
        );
        Ok(document)
    }
}

#[async_trait]
impl GapItemSource for AnalysisDocument {
    async fn list_items(&self, analysis_id: &str) -> Result<Vec<GapItem>> {
        if self.analysis_id != analysis_id {
            return Err(PlanningError::AnalysisNotFound(analysis_id.to_string()));
        }
        Ok(self.items.clone())
    }
}

#[async_trait]
impl DependencySource for AnalysisDocument {
    async fn list_edges(&self, ids: &[String]) -> Result<DependencySnapshot> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let edges = self
            .dependencies
            .iter()
            .filter(|edge| wanted.contains(edge.from_id.as_str()))
            .cloned()
            .collect();

        Ok(DependencySnapshot {
            edges,
            topological_order: self.topological_order.clone(),
            has_cycle: self.has_cycle,
        })
    }
}

/// Runs planning requests against a pair of sources.
pub struct PlanningService {
    planner: Planner,
    items: Arc<dyn GapItemSource>,
    dependencies: Arc<dyn DependencySource>,
}

impl PlanningService {
    /// Creates a service over separate item and dependency sources.
    pub fn new(
        planner: Planner,
        items: Arc<dyn GapItemSource>,
        dependencies: Arc<dyn DependencySource>,
    ) -> Self {
        Self {
            planner,
            items,
            dependencies,
        }
    }

    /// Creates a service over a single document serving both roles.
    pub fn from_document(planner: Planner, document: AnalysisDocument) -> Self {
        let document = Arc::new(document);
        Self::new(planner, document.clone(), document)
    }

    /// Returns the planner in use.
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Fetches inputs and builds a plan.
    ///
    /// Request ranges are checked before either source is consulted.
    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResult> {
        validate_request(request)?;

        let items = self.items.list_items(&request.analysis_id).await?;
        let limit = self.planner.config().max_items;
        if items.len() > limit {
            return Err(PlanningError::TooManyItems {
                count: items.len(),
                limit,
            });
        }

        let snapshot = if request.include_dependencies {
            let ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
            self.dependencies.list_edges(&ids).await?
        } else {
            DependencySnapshot::default()
        };

        self.planner.create_plan(request, &items, &snapshot)
    }

    /// Like [`plan`](Self::plan), but folds failures into a structured response.
    pub async fn create_plan(&self, request: &PlanRequest) -> PlanResponse {
        let result = self.plan(request).await;
        if let Err(e) = &result {
            tracing::warn!("Planning failed for analysis {}: {}", request.analysis_id, e);
        }
        PlanResponse::from_result(result)
    }
}
