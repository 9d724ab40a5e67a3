//! Core types for roadmap planning.
//!
//! Gap items and dependency edges come in from the gap-analysis and
//! dependency sources; phases, phase items and the plan result go out to
//! whatever persists or renders them.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::allocation::ResourceAllocation;
use crate::graph::DependencyGraphSummary;
use crate::milestones::Milestone;
use crate::recommend::Recommendations;

/// Current implementation state of a gap item.
///
/// Accepts the snake_case wire values as well as the display forms used by
/// assessment spreadsheets ("Not Implemented", ...). Anything else is
/// [`ImplementationStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationStatus {
    /// Nothing in place yet
    #[serde(alias = "Not Implemented", alias = "not-implemented")]
    NotImplemented,
    /// Some controls exist
    #[serde(alias = "Partially Implemented", alias = "partially-implemented")]
    PartiallyImplemented,
    /// Most controls exist
    #[serde(alias = "Largely Implemented", alias = "largely-implemented")]
    LargelyImplemented,
    /// Fully in place, maintenance only
    #[serde(alias = "Fully Implemented", alias = "fully-implemented")]
    FullyImplemented,
    /// Unrecognised status value
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImplementationStatus::NotImplemented => "Not Implemented",
            ImplementationStatus::PartiallyImplemented => "Partially Implemented",
            ImplementationStatus::LargelyImplemented => "Largely Implemented",
            ImplementationStatus::FullyImplemented => "Fully Implemented",
            ImplementationStatus::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

/// NIST CSF 2.0 core function owning a gap item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CsfFunction {
    /// GV
    Govern,
    /// ID
    Identify,
    /// PR
    Protect,
    /// DE
    Detect,
    /// RS
    Respond,
    /// RC
    Recover,
}

impl CsfFunction {
    /// All functions in framework order.
    pub const ALL: [CsfFunction; 6] = [
        CsfFunction::Govern,
        CsfFunction::Identify,
        CsfFunction::Protect,
        CsfFunction::Detect,
        CsfFunction::Respond,
        CsfFunction::Recover,
    ];

    /// Two-letter function code.
    pub fn code(&self) -> &'static str {
        match self {
            CsfFunction::Govern => "GV",
            CsfFunction::Identify => "ID",
            CsfFunction::Protect => "PR",
            CsfFunction::Detect => "DE",
            CsfFunction::Respond => "RS",
            CsfFunction::Recover => "RC",
        }
    }

    /// Upper-case function name.
    pub fn full_name(&self) -> &'static str {
        match self {
            CsfFunction::Govern => "GOVERN",
            CsfFunction::Identify => "IDENTIFY",
            CsfFunction::Protect => "PROTECT",
            CsfFunction::Detect => "DETECT",
            CsfFunction::Respond => "RESPOND",
            CsfFunction::Recover => "RECOVER",
        }
    }
}

impl FromStr for CsfFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        CsfFunction::ALL
            .into_iter()
            .find(|f| f.code() == upper || f.full_name() == upper)
            .ok_or_else(|| format!("Invalid CSF function: {}", s))
    }
}

fn subcategory_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([A-Z]{2})\.[A-Z]{2}(?:-\d{2})?$").ok())
        .as_ref()
}

fn default_risk_score() -> f64 {
    5.0
}

fn default_effort_score() -> f64 {
    5.0
}

fn default_gap_score() -> f64 {
    0.0
}

fn score_or<'de, D>(deserializer: D, default: fn() -> f64) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default))
}

fn gap_score_or_default<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    score_or(deserializer, default_gap_score)
}

fn risk_score_or_default<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    score_or(deserializer, default_risk_score)
}

fn effort_score_or_default<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    score_or(deserializer, default_effort_score)
}

/// Normalises a function code or name: a recognised CSF code or name maps to
/// its two-letter code, anything else is upper-cased. Blank input is `None`.
pub fn normalize_function_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(match raw.parse::<CsfFunction>() {
        Ok(function) => function.code().to_string(),
        Err(_) => raw.to_ascii_uppercase(),
    })
}

/// One remediation candidate from a gap analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapItem {
    /// Stable identifier, typically a CSF subcategory code such as `GV.OC-01`
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Current implementation state (missing estimates at the fallback rate)
    #[serde(default)]
    pub current_implementation: Option<ImplementationStatus>,
    /// Current maturity level (0-5), informational
    #[serde(default)]
    pub current_maturity: Option<f64>,
    /// Target maturity level (0-5), informational
    #[serde(default)]
    pub target_maturity: Option<f64>,
    /// Size of the gap, 0-100 (higher = larger gap); absent or null is 0
    #[serde(default = "default_gap_score", deserialize_with = "gap_score_or_default")]
    pub gap_score: f64,
    /// Risk, 0-10; absent or null is 5
    #[serde(default = "default_risk_score", deserialize_with = "risk_score_or_default")]
    pub risk_score: f64,
    /// Effort, 0-10 (higher = more effort); absent or null is 5
    #[serde(default = "default_effort_score", deserialize_with = "effort_score_or_default")]
    pub effort_score: f64,
    /// Externally supplied rank, carried through to the phase item
    #[serde(default)]
    pub priority_rank: Option<u32>,
    /// Owning function code or name, used for the effort multiplier
    #[serde(default)]
    pub owner_function: Option<String>,
}

impl GapItem {
    /// Creates an item with neutral scores and no implementation state.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_implementation: None,
            current_maturity: None,
            target_maturity: None,
            gap_score: default_gap_score(),
            risk_score: default_risk_score(),
            effort_score: default_effort_score(),
            priority_rank: None,
            owner_function: None,
        }
    }

    /// Sets the implementation state.
    pub fn with_status(mut self, status: ImplementationStatus) -> Self {
        self.current_implementation = Some(status);
        self
    }

    /// Sets gap, risk and effort scores.
    pub fn with_scores(mut self, gap_score: f64, risk_score: f64, effort_score: f64) -> Self {
        self.gap_score = gap_score;
        self.risk_score = risk_score;
        self.effort_score = effort_score;
        self
    }

    /// Sets the owning function.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner_function = Some(owner.into());
        self
    }

    /// Sets the external priority rank.
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.priority_rank = Some(rank);
        self
    }

    /// Resolves the owning function code used for multiplier lookup.
    ///
    /// An explicit `owner_function` wins; a recognised CSF code or name is
    /// normalised to its two-letter code, anything else is upper-cased as is.
    /// Without one, the code is taken from a subcategory-style id.
    pub fn function_code(&self) -> Option<String> {
        if let Some(owner) = self.owner_function.as_deref() {
            return normalize_function_code(owner);
        }

        subcategory_pattern()
            .and_then(|re| re.captures(&self.id))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// `from_id` depends on `to_id`; `to_id` must be scheduled first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Dependent item
    pub from_id: String,
    /// Prerequisite item
    pub to_id: String,
}

impl DependencyEdge {
    /// Creates an edge meaning `from` depends on `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_id: from.into(),
            to_id: to.into(),
        }
    }
}

/// What a dependency source hands back for a set of items.
///
/// The order and cycle flag are optional; when an order is present the
/// engine uses it instead of computing its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySnapshot {
    /// Dependency edges
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
    /// Pre-computed topological order
    #[serde(default)]
    pub topological_order: Option<Vec<String>>,
    /// Pre-computed cycle flag
    #[serde(default)]
    pub has_cycle: Option<bool>,
}

impl DependencySnapshot {
    /// A snapshot carrying only edges.
    pub fn from_edges(edges: Vec<DependencyEdge>) -> Self {
        Self {
            edges,
            topological_order: None,
            has_cycle: None,
        }
    }
}

/// Ordering strategy for the prioritization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrioritizationStrategy {
    /// Highest risk first
    RiskBased,
    /// Lowest effort first, larger gaps breaking ties
    QuickWins,
    /// Topological order of the dependency graph
    DependenciesFirst,
    /// Weighted risk/effort/gap composite
    #[default]
    Balanced,
}

impl PrioritizationStrategy {
    /// Wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrioritizationStrategy::RiskBased => "risk_based",
            PrioritizationStrategy::QuickWins => "quick_wins",
            PrioritizationStrategy::DependenciesFirst => "dependencies_first",
            PrioritizationStrategy::Balanced => "balanced",
        }
    }
}

impl fmt::Display for PrioritizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PrioritizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "risk_based" => Ok(PrioritizationStrategy::RiskBased),
            "quick_wins" => Ok(PrioritizationStrategy::QuickWins),
            "dependencies_first" => Ok(PrioritizationStrategy::DependenciesFirst),
            "balanced" => Ok(PrioritizationStrategy::Balanced),
            other => Err(format!("Unknown prioritization strategy: {}", other)),
        }
    }
}

fn default_phase_duration() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

/// Parameters of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Gap analysis the items come from
    pub analysis_id: String,
    /// Plan length in months (1-36)
    pub timeline_months: u32,
    /// Headcount available per month (1-100)
    pub available_resources: u32,
    /// Ordering strategy
    #[serde(default)]
    pub prioritization_strategy: PrioritizationStrategy,
    /// Months per phase (1-6)
    #[serde(default = "default_phase_duration")]
    pub phase_duration: u32,
    /// Consult dependency edges when ordering and scheduling
    #[serde(default = "default_true")]
    pub include_dependencies: bool,
    /// Emit milestones
    #[serde(default = "default_true")]
    pub include_milestones: bool,
    /// First day of month 1, for calendar dates on phases and milestones
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl PlanRequest {
    /// Creates a request with default strategy, phase length and flags.
    pub fn new(analysis_id: impl Into<String>, timeline_months: u32, available_resources: u32) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            timeline_months,
            available_resources,
            prioritization_strategy: PrioritizationStrategy::default(),
            phase_duration: default_phase_duration(),
            include_dependencies: true,
            include_milestones: true,
            start_date: None,
        }
    }

    /// Sets the strategy.
    pub fn with_strategy(mut self, strategy: PrioritizationStrategy) -> Self {
        self.prioritization_strategy = strategy;
        self
    }

    /// Sets the phase length in months.
    pub fn with_phase_duration(mut self, months: u32) -> Self {
        self.phase_duration = months;
        self
    }

    /// Sets whether dependency edges are consulted.
    pub fn with_dependencies(mut self, include: bool) -> Self {
        self.include_dependencies = include;
        self
    }

    /// Sets whether milestones are emitted.
    pub fn with_milestones(mut self, include: bool) -> Self {
        self.include_milestones = include;
        self
    }

    /// Sets the calendar start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }
}

/// Lifecycle state of phases and phase items. Plans are always created pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Not started
    #[default]
    Pending,
    /// Underway
    InProgress,
    /// Done
    Completed,
}

/// A gap item placed into a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseItem {
    /// Gap item id
    pub item_id: String,
    /// Gap item name
    pub name: String,
    /// Estimated effort in hours
    pub effort_hours: u32,
    /// Ids this item depends on
    pub dependencies: Vec<String>,
    /// Risk score carried from the gap item
    pub risk_score: f64,
    /// External rank carried from the gap item
    pub priority_rank: Option<u32>,
    /// Pushed the phase past its capacity when forced into the last phase
    pub over_capacity: bool,
    /// Shares the last phase with a prerequisite, since no later phase exists
    #[serde(default)]
    pub forced_by_dependency: bool,
    /// Always pending on creation
    pub status: WorkStatus,
}

/// A time-boxed window of the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// 1-based, contiguous
    pub number: u32,
    /// Positional phase name
    pub name: String,
    /// First month, inclusive
    pub start_month: u32,
    /// Last month, inclusive
    pub end_month: u32,
    /// Calendar start, when the request has a start date
    pub start_date: Option<NaiveDate>,
    /// Calendar end, when the request has a start date
    pub end_date: Option<NaiveDate>,
    /// Sum of contained items' effort
    pub effort_hours: u32,
    /// Effort the phase can absorb before overflowing
    pub capacity_hours: u32,
    /// Globally available resources
    pub resource_count: u32,
    /// Scheduled items in placement order
    pub items: Vec<PhaseItem>,
    /// Always pending on creation
    pub status: WorkStatus,
}

impl Phase {
    /// Number of months the phase spans, at least 1.
    pub fn duration_months(&self) -> u32 {
        self.end_month.saturating_sub(self.start_month).saturating_add(1)
    }

    /// Whether the phase holds more effort than its capacity.
    pub fn is_over_capacity(&self) -> bool {
        self.effort_hours > self.capacity_hours
    }
}

/// The full output of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// Gap analysis the plan was built from
    pub analysis_id: String,
    /// Strategy used to order items
    pub strategy: PrioritizationStrategy,
    /// Plan length in months
    pub timeline_months: u32,
    /// Headcount the plan assumes
    pub available_resources: u32,
    /// Months per phase
    pub phase_duration: u32,
    /// Phases in order
    pub phases: Vec<Phase>,
    /// Sum over phases
    pub total_effort_hours: u64,
    /// `total_effort_hours * hourly_rate`
    pub estimated_cost: f64,
    /// Present when dependencies were included
    pub dependency_graph: Option<DependencyGraphSummary>,
    /// One entry per phase
    pub resource_allocation: Vec<ResourceAllocation>,
    /// Present when milestones were requested
    pub milestones: Option<Vec<Milestone>>,
    /// Categorised advice
    pub recommendations: Recommendations,
}

impl PlanResult {
    /// Phase number holding the given item, if any.
    pub fn phase_of(&self, item_id: &str) -> Option<u32> {
        self.phases
            .iter()
            .find(|phase| phase.items.iter().any(|item| item.item_id == item_id))
            .map(|phase| phase.number)
    }

    /// Total number of scheduled items.
    pub fn item_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.items.len()).sum()
    }
}

/// Structured outcome of a planning request.
///
/// Failures carry `success = false` and a message, never a partial plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Whether a plan was produced
    pub success: bool,
    /// Summary or failure reason
    pub message: String,
    /// The plan, on success
    pub plan: Option<PlanResult>,
}

impl PlanResponse {
    /// Wraps a planning outcome.
    pub fn from_result(result: crate::Result<PlanResult>) -> Self {
        match result {
            Ok(plan) => Self {
                success: true,
                message: format!(
                    "Created {} phase plan with {} items ({} hours)",
                    plan.phases.len(),
                    plan.item_count(),
                    plan.total_effort_hours
                ),
                plan: Some(plan),
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
                plan: None,
            },
        }
    }
}
