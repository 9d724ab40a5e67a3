//! Roadmap milestones.
//!
//! Milestone text is fixed; only the timing follows the phase layout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scheduler::month_end_date;
use crate::types::Phase;

/// A checkpoint on the roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone name
    pub name: String,
    /// Plan month the milestone falls due
    pub target_month: u32,
    /// Phase closing at the milestone
    pub phase_number: u32,
    /// Calendar due date, when the plan has a start date
    pub target_date: Option<NaiveDate>,
    /// What must hold for the milestone to count as met
    pub success_criteria: Vec<String>,
    /// What the milestone hands over
    pub deliverables: Vec<String>,
}

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|line| line.to_string()).collect()
}

fn foundation(phase: &Phase) -> Milestone {
    Milestone {
        name: "Foundation Complete".to_string(),
        target_month: phase.end_month,
        phase_number: phase.number,
        target_date: None,
        success_criteria: lines(&[
            "Governance structure established",
            "Critical gaps addressed",
            "Quick wins implemented",
        ]),
        deliverables: lines(&[
            "Security policies documented",
            "Risk register established",
            "Initial controls deployed",
        ]),
    }
}

fn core_operational(phase: &Phase) -> Milestone {
    Milestone {
        name: "Core Capabilities Operational".to_string(),
        target_month: phase.end_month,
        phase_number: phase.number,
        target_date: None,
        success_criteria: lines(&[
            "Core security controls operational",
            "Detection capabilities enhanced",
            "Response procedures tested",
        ]),
        deliverables: lines(&[
            "Security monitoring in place",
            "Incident response plan tested",
            "Access controls implemented",
        ]),
    }
}

fn target_achieved(timeline_months: u32, phase_number: u32) -> Milestone {
    Milestone {
        name: "Target Maturity Achieved".to_string(),
        target_month: timeline_months,
        phase_number,
        target_date: None,
        success_criteria: lines(&[
            "All planned controls implemented",
            "Target maturity levels reached",
            "Continuous improvement process established",
        ]),
        deliverables: lines(&[
            "Full control implementation",
            "Maturity assessment report",
            "Continuous monitoring program",
        ]),
    }
}

/// Derives milestones from the phase layout.
///
/// "Foundation Complete" closes phase 1. "Core Capabilities Operational"
/// closes the phase at 0-based index `floor(n / 2)` when that index lies
/// strictly between 0 and `n`. "Target Maturity Achieved" falls on the last
/// month of the timeline and is always present.
pub fn generate_milestones(
    phases: &[Phase],
    timeline_months: u32,
    start_date: Option<NaiveDate>,
) -> Vec<Milestone> {
    let mut milestones = Vec::new();

    if let Some(first) = phases.first() {
        milestones.push(foundation(first));
    }

    let middle = phases.len() / 2;
    if middle > 0 && middle < phases.len() {
        milestones.push(core_operational(&phases[middle]));
    }

    let last_phase = phases.last().map(|phase| phase.number).unwrap_or(1);
    milestones.push(target_achieved(timeline_months, last_phase));

    if let Some(start) = start_date {
        for milestone in &mut milestones {
            milestone.target_date = month_end_date(start, milestone.target_month);
        }
    }

    milestones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::PhaseLayout;
    use crate::types::WorkStatus;

    fn phases(timeline_months: u32, phase_duration: u32) -> Vec<Phase> {
        let layout = PhaseLayout {
            timeline_months,
            phase_duration,
            available_resources: 1,
            start_date: None,
        };
        layout
            .slots(160)
            .into_iter()
            .map(|slot| Phase {
                number: slot.number,
                name: slot.name,
                start_month: slot.start_month,
                end_month: slot.end_month,
                start_date: None,
                end_date: None,
                effort_hours: 0,
                capacity_hours: slot.capacity_hours,
                resource_count: 1,
                items: Vec::new(),
                status: WorkStatus::Pending,
            })
            .collect()
    }

    fn names(milestones: &[Milestone]) -> Vec<&str> {
        milestones.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_single_phase_has_no_middle_milestone() {
        let milestones = generate_milestones(&phases(3, 3), 3, None);
        assert_eq!(names(&milestones), ["Foundation Complete", "Target Maturity Achieved"]);
        assert_eq!(milestones[0].target_month, 3);
        assert_eq!(milestones[1].target_month, 3);
    }

    #[test]
    fn test_four_phases() {
        let milestones = generate_milestones(&phases(12, 3), 12, None);
        assert_eq!(
            names(&milestones),
            ["Foundation Complete", "Core Capabilities Operational", "Target Maturity Achieved"]
        );
        assert_eq!(milestones[0].target_month, 3);
        // index 2 -> phase 3, months 7-9
        assert_eq!(milestones[1].phase_number, 3);
        assert_eq!(milestones[1].target_month, 9);
        assert_eq!(milestones[2].target_month, 12);
        assert_eq!(milestones[2].phase_number, 4);
    }

    #[test]
    fn test_fixed_text() {
        let milestones = generate_milestones(&phases(6, 3), 6, None);
        assert_eq!(milestones[0].success_criteria.len(), 3);
        assert_eq!(milestones[0].deliverables[1], "Risk register established");
    }

    #[test]
    fn test_target_dates_from_start() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let milestones = generate_milestones(&phases(12, 3), 12, Some(start));
        assert_eq!(milestones[0].target_date, NaiveDate::from_ymd_opt(2026, 4, 30));
        assert_eq!(milestones[2].target_date, NaiveDate::from_ymd_opt(2027, 1, 31));
    }
}
