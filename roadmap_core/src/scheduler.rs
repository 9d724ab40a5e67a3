//! Capacity-bounded phase scheduling.
//!
//! Phase slots are laid out up front from the timeline, then prioritized
//! items are folded into them one at a time. Placement is greedy and never
//! revisits an earlier decision:
//!
//! 1. An item may not share a phase with an already placed prerequisite, so
//!    its earliest phase is one past the latest such prerequisite.
//! 2. From there, the first phase with room takes it.
//! 3. If no phase has room, the last phase takes it anyway and the item is
//!    marked `over_capacity`.
//! 4. If a prerequisite already sits in the last phase, there is no later
//!    phase to move to. The item joins the last phase and is marked
//!    `forced_by_dependency`; `over_capacity` is set only if it does not fit.

use std::collections::HashMap;

use chrono::{Months, NaiveDate};

use crate::config::PlannerConfig;
use crate::estimate::estimate_effort;
use crate::graph::DependencyGraph;
use crate::types::{GapItem, Phase, PhaseItem, PlanRequest, WorkStatus};

/// Timeline parameters the scheduler lays phases out from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseLayout {
    /// Plan length in months
    pub timeline_months: u32,
    /// Months per phase
    pub phase_duration: u32,
    /// Headcount per month
    pub available_resources: u32,
    /// First day of month 1
    pub start_date: Option<NaiveDate>,
}

impl From<&PlanRequest> for PhaseLayout {
    fn from(request: &PlanRequest) -> Self {
        Self {
            timeline_months: request.timeline_months,
            phase_duration: request.phase_duration,
            available_resources: request.available_resources,
            start_date: request.start_date,
        }
    }
}

impl PhaseLayout {
    /// `ceil(timeline_months / phase_duration)`
    pub fn phase_count(&self) -> u32 {
        if self.phase_duration == 0 {
            return 0;
        }
        self.timeline_months.div_ceil(self.phase_duration)
    }

    /// Effort hours one phase can absorb.
    pub fn capacity_hours(&self, monthly_hours_per_resource: u32) -> u32 {
        self.available_resources
            .saturating_mul(self.phase_duration)
            .saturating_mul(monthly_hours_per_resource)
    }

    /// Empty phase slots covering `[1, timeline_months]` without gaps or overlap.
    pub fn slots(&self, monthly_hours_per_resource: u32) -> Vec<PhaseSlot> {
        let count = self.phase_count();
        let capacity_hours = self.capacity_hours(monthly_hours_per_resource);

        (0..count)
            .map(|i| {
                let start_month = i * self.phase_duration + 1;
                let end_month = ((i + 1) * self.phase_duration).min(self.timeline_months);
                PhaseSlot {
                    number: i + 1,
                    name: phase_name(i as usize, count as usize),
                    start_month,
                    end_month,
                    capacity_hours,
                }
            })
            .collect()
    }
}

/// An empty phase window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseSlot {
    /// 1-based phase number
    pub number: u32,
    /// Positional name
    pub name: String,
    /// First month, inclusive
    pub start_month: u32,
    /// Last month, inclusive
    pub end_month: u32,
    /// Effort hours the phase can absorb
    pub capacity_hours: u32,
}

/// Positional phase name for a 0-based index.
pub fn phase_name(index: usize, phase_count: usize) -> String {
    if index == 0 {
        "Foundation & Quick Wins".to_string()
    } else if index == 1 {
        "Core Implementation".to_string()
    } else if index + 1 == phase_count {
        "Optimization & Maturity".to_string()
    } else if index + 2 == phase_count {
        "Advanced Controls".to_string()
    } else {
        format!("Phase {}: Capability Building", index + 1)
    }
}

/// First calendar day of a 1-based plan month.
pub fn month_start_date(start: NaiveDate, month: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(month.saturating_sub(1)))
}

/// Last calendar day of a 1-based plan month.
pub fn month_end_date(start: NaiveDate, month: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(month))?.pred_opt()
}

/// Running state of the fold over prioritized items.
struct Placement {
    loads: Vec<u32>,
    items: Vec<Vec<PhaseItem>>,
    placed: HashMap<String, usize>,
}

impl Placement {
    fn new(phase_count: usize) -> Self {
        Self {
            loads: vec![0; phase_count],
            items: vec![Vec::new(); phase_count],
            placed: HashMap::new(),
        }
    }

    fn place(
        mut self,
        item: &GapItem,
        slots: &[PhaseSlot],
        graph: &DependencyGraph,
        config: &PlannerConfig,
    ) -> Self {
        let last = slots.len() - 1;
        let effort = estimate_effort(item, config);
        let dependencies = graph.dependencies_of(&item.id);

        let min_phase = dependencies
            .iter()
            .filter_map(|dep| self.placed.get(dep))
            .map(|&phase| phase + 1)
            .max()
            .unwrap_or(0);

        let fits = (min_phase..slots.len())
            .find(|&i| self.loads[i].saturating_add(effort) <= slots[i].capacity_hours);

        let (index, over_capacity, forced_by_dependency) = match fits {
            Some(i) => (i, false, false),
            None if min_phase > last => {
                let over_capacity =
                    self.loads[last].saturating_add(effort) > slots[last].capacity_hours;
                tracing::warn!(
                    "{} depends on an item in the last phase; placing it in phase {} as well",
                    item.id,
                    slots[last].number
                );
                (last, over_capacity, true)
            }
            None => {
                tracing::warn!(
                    "No phase has room for {} ({} hours); placing in phase {}",
                    item.id,
                    effort,
                    slots[last].number
                );
                (last, true, false)
            }
        };

        tracing::debug!(
            "Placed {} ({} hours, min phase {}) in phase {}",
            item.id,
            effort,
            min_phase + 1,
            index + 1
        );

        self.loads[index] = self.loads[index].saturating_add(effort);
        self.items[index].push(PhaseItem {
            item_id: item.id.clone(),
            name: item.name.clone(),
            effort_hours: effort,
            dependencies,
            risk_score: item.risk_score,
            priority_rank: item.priority_rank,
            over_capacity,
            forced_by_dependency,
            status: WorkStatus::Pending,
        });
        self.placed.insert(item.id.clone(), index);
        self
    }
}

/// Partitions prioritized items into phases.
///
/// Every item lands in exactly one phase. Returns no phases only when the
/// layout itself has none (zero timeline or phase length), which request
/// validation rules out.
pub fn schedule(
    ordered: &[GapItem],
    layout: &PhaseLayout,
    graph: &DependencyGraph,
    config: &PlannerConfig,
) -> Vec<Phase> {
    let slots = layout.slots(config.monthly_hours_per_resource);
    if slots.is_empty() {
        return Vec::new();
    }

    let placement = ordered
        .iter()
        .fold(Placement::new(slots.len()), |state, item| {
            state.place(item, &slots, graph, config)
        });

    slots
        .into_iter()
        .zip(placement.loads)
        .zip(placement.items)
        .map(|((slot, effort_hours), items)| Phase {
            number: slot.number,
            name: slot.name,
            start_month: slot.start_month,
            end_month: slot.end_month,
            start_date: layout
                .start_date
                .and_then(|start| month_start_date(start, slot.start_month)),
            end_date: layout
                .start_date
                .and_then(|start| month_end_date(start, slot.end_month)),
            effort_hours,
            capacity_hours: slot.capacity_hours,
            resource_count: layout.available_resources,
            items,
            status: WorkStatus::Pending,
        })
        .collect()
}
