//! Command-line interface for the roadmap planner.
//!
//! Loads an analysis document (YAML or JSON) from disk, runs the planning
//! engine and prints JSON to stdout. Logs go to stderr.
//!
//! # Examples
//!
//! Plan an analysis over twelve months with three people:
//!
//! ```bash
//! $ roadmap plan --input analysis.yaml --timeline-months 12 --resources 3
//! ```
//!
//! Show the dependency summary only:
//!
//! ```bash
//! $ roadmap graph --input analysis.yaml
//! ```
//!
//! Show per-item effort estimates:
//!
//! ```bash
//! $ roadmap estimate --input analysis.yaml
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use roadmap_core::{
    AnalysisDocument, DependencySnapshot, PlanRequest, Planner, PlannerConfig, PlanningService,
    PrioritizationStrategy,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// CLI arguments for the planner.
#[derive(Parser, Debug)]
#[command(name = "roadmap", version, about = "Phased remediation roadmap planner")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Planner configuration file (YAML, or JSON by extension)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub action: Action,
}

/// Actions available via CLI.
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Build a full phased plan
    Plan {
        /// Analysis document (YAML, or JSON by extension)
        #[arg(short, long)]
        input: PathBuf,

        /// Analysis to plan; defaults to the document's own id
        #[arg(long)]
        analysis_id: Option<String>,

        /// Planning horizon in months (1-36)
        #[arg(short, long, default_value_t = 12)]
        timeline_months: u32,

        /// People available per phase (1-100)
        #[arg(short, long, default_value_t = 1)]
        resources: u32,

        /// risk_based, quick_wins, dependencies_first or balanced
        #[arg(short, long, default_value_t = PrioritizationStrategy::Balanced)]
        strategy: PrioritizationStrategy,

        /// Months per phase (1-6)
        #[arg(short, long, default_value_t = 3)]
        phase_duration: u32,

        /// Ignore dependency edges
        #[arg(long)]
        no_dependencies: bool,

        /// Skip milestone generation
        #[arg(long)]
        no_milestones: bool,

        /// Calendar date of month 1 (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Write the response here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the dependency graph summary
    Graph {
        /// Analysis document (YAML, or JSON by extension)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show per-item effort estimates
    Estimate {
        /// Analysis document (YAML, or JSON by extension)
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Result of one CLI invocation.
#[derive(Debug)]
pub struct Outcome {
    /// JSON body to print or write
    pub body: Value,
    /// Where to write the body; stdout when absent
    pub output: Option<PathBuf>,
    /// Whether the command succeeded
    pub success: bool,
}

/// Entry point for the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    roadmap_core::init();

    let outcome = execute(cli).await?;
    let rendered = serde_json::to_string_pretty(&outcome.body)?;

    match &outcome.output {
        Some(path) => {
            tokio::fs::write(path, rendered + "\n")
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote plan to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = if verbose {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs a parsed command without touching stdout.
pub async fn execute(cli: Cli) -> anyhow::Result<Outcome> {
    let planner = load_planner(cli.config.as_deref()).await?;

    match cli.action {
        Action::Plan {
            input,
            analysis_id,
            timeline_months,
            resources,
            strategy,
            phase_duration,
            no_dependencies,
            no_milestones,
            start_date,
            output,
        } => {
            let document = load_document(&input).await?;
            let analysis_id = analysis_id.unwrap_or_else(|| document.analysis_id.clone());

            let mut request = PlanRequest::new(analysis_id, timeline_months, resources)
                .with_strategy(strategy)
                .with_phase_duration(phase_duration)
                .with_dependencies(!no_dependencies)
                .with_milestones(!no_milestones);
            if let Some(date) = start_date {
                request = request.with_start_date(date);
            }

            let service = PlanningService::from_document(planner, document);
            let response = service.create_plan(&request).await;
            if !response.success {
                tracing::error!("{}", response.message);
            }

            Ok(Outcome {
                success: response.success,
                body: serde_json::to_value(&response)?,
                output,
            })
        }

        Action::Graph { input } => {
            let document = load_document(&input).await?;
            let snapshot = DependencySnapshot {
                edges: document.dependencies,
                topological_order: document.topological_order,
                has_cycle: document.has_cycle,
            };
            let summary = planner
                .analyze_dependencies(&document.items, &snapshot)
                .context("Dependency analysis failed")?;

            Ok(Outcome {
                body: serde_json::to_value(&summary)?,
                output: None,
                success: true,
            })
        }

        Action::Estimate { input } => {
            let document = load_document(&input).await?;
            let estimates = planner.estimate(&document.items);
            let total: u64 = estimates.iter().map(|(_, hours)| u64::from(*hours)).sum();
            let items: Vec<Value> = estimates
                .into_iter()
                .map(|(item_id, effort_hours)| json!({ "item_id": item_id, "effort_hours": effort_hours }))
                .collect();

            Ok(Outcome {
                body: json!({
                    "analysis_id": document.analysis_id,
                    "items": items,
                    "total_effort_hours": total,
                    "estimated_cost": total as f64 * planner.config().hourly_rate,
                }),
                output: None,
                success: true,
            })
        }
    }
}

async fn load_planner(path: Option<&Path>) -> anyhow::Result<Planner> {
    let config = match path {
        Some(path) => PlannerConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlannerConfig::default(),
    };
    Ok(Planner::new(config)?)
}

async fn load_document(path: &Path) -> anyhow::Result<AnalysisDocument> {
    AnalysisDocument::load(path)
        .await
        .with_context(|| format!("Failed to load analysis {}", path.display()))
}
