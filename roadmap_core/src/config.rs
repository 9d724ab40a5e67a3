//! Planner configuration.
//!
//! Named constants the engine works against: hours per resource-month, the
//! hourly cost rate, per-function effort multipliers and the utilization
//! thresholds. Loadable from YAML or JSON.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, Result};
use crate::types::normalize_function_code;

/// Configuration for a [`Planner`](crate::planner::Planner).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Working hours one resource contributes per month (default: 160)
    pub monthly_hours_per_resource: u32,
    /// Cost per effort hour (default: 150.0)
    pub hourly_rate: f64,
    /// Effort multiplier by function code; unlisted codes use 1.0
    pub domain_multipliers: IndexMap<String, f64>,
    /// Workload above this percentage is flagged as high utilization (default: 80)
    pub high_utilization_percent: u32,
    /// Workload above this percentage is flagged as insufficient resources (default: 100)
    pub over_capacity_percent: u32,
    /// Timelines shorter than this are flagged as aggressive (default: 12)
    pub aggressive_timeline_months: u32,
    /// Phases with more items than this are flagged as overloaded (default: 20)
    pub max_items_per_phase: usize,
    /// Largest item set accepted by the planning service (default: 10 000)
    pub max_items: usize,
    /// Largest edge set accepted by the planning service (default: 100 000)
    pub max_edges: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let mut domain_multipliers = IndexMap::new();
        domain_multipliers.insert("GV".to_string(), 1.2);
        domain_multipliers.insert("DE".to_string(), 1.3);
        domain_multipliers.insert("RS".to_string(), 0.9);

        Self {
            monthly_hours_per_resource: 160,
            hourly_rate: 150.0,
            domain_multipliers,
            high_utilization_percent: 80,
            over_capacity_percent: 100,
            aggressive_timeline_months: 12,
            max_items_per_phase: 20,
            max_items: 10_000,
            max_edges: 100_000,
        }
    }
}

impl PlannerConfig {
    /// Effort multiplier for a function code, 1.0 when unlisted.
    ///
    /// Keys match case-insensitively and by full function name, so `gv`,
    /// `GV` and `govern` all name the same multiplier.
    pub fn multiplier_for(&self, code: Option<&str>) -> f64 {
        let Some(code) = code.and_then(normalize_function_code) else {
            return 1.0;
        };
        self.domain_multipliers
            .iter()
            .find(|(key, _)| normalize_function_code(key).as_deref() == Some(code.as_str()))
            .map(|(_, multiplier)| *multiplier)
            .unwrap_or(1.0)
    }

    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.monthly_hours_per_resource == 0 {
            return Err(PlanningError::InvalidConfig(
                "monthly_hours_per_resource must be greater than zero".to_string(),
            ));
        }
        if !self.hourly_rate.is_finite() || self.hourly_rate < 0.0 {
            return Err(PlanningError::InvalidConfig(format!(
                "hourly_rate must be a non-negative number, got {}",
                self.hourly_rate
            )));
        }
        let mut codes = HashSet::with_capacity(self.domain_multipliers.len());
        for (code, multiplier) in &self.domain_multipliers {
            let Some(normalized) = normalize_function_code(code) else {
                return Err(PlanningError::InvalidConfig(
                    "multiplier keys must not be blank".to_string(),
                ));
            };
            if !codes.insert(normalized.clone()) {
                return Err(PlanningError::InvalidConfig(format!(
                    "multiplier for {} is listed more than once",
                    normalized
                )));
            }
            if !multiplier.is_finite() || *multiplier < 0.0 {
                return Err(PlanningError::InvalidConfig(format!(
                    "multiplier for {} must be a non-negative number, got {}",
                    code, multiplier
                )));
            }
        }
        if self.high_utilization_percent > self.over_capacity_percent {
            return Err(PlanningError::InvalidConfig(format!(
                "high_utilization_percent ({}) exceeds over_capacity_percent ({})",
                self.high_utilization_percent, self.over_capacity_percent
            )));
        }
        Ok(())
    }

    /// Parses and validates a YAML configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PlannerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file; `.json` is read as JSON, anything else as YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::estimate_effort;
    use crate::types::{GapItem, ImplementationStatus};

    #[test]
    fn test_default_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monthly_hours_per_resource, 160);
        assert_eq!(config.multiplier_for(Some("DE")), 1.3);
        assert_eq!(config.multiplier_for(Some("PR")), 1.0);
        assert_eq!(config.multiplier_for(None), 1.0);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PlannerConfig::from_yaml_str("hourly_rate: 200.0\n").unwrap();
        assert_eq!(config.hourly_rate, 200.0);
        assert_eq!(config.monthly_hours_per_resource, 160);
        assert_eq!(config.domain_multipliers.len(), 3);
    }

    #[test]
    fn test_yaml_replaces_multipliers() {
        let yaml = "domain_multipliers:\n  PR: 1.1\n";
        let config = PlannerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.multiplier_for(Some("PR")), 1.1);
        assert_eq!(config.multiplier_for(Some("GV")), 1.0);
    }

    #[test]
    fn test_lowercase_and_named_keys_apply() {
        let config = PlannerConfig::from_yaml_str("domain_multipliers:\n  gv: 2.0\n  Detect: 1.5\n").unwrap();
        assert_eq!(config.multiplier_for(Some("GV")), 2.0);
        assert_eq!(config.multiplier_for(Some("DE")), 1.5);
        assert_eq!(config.multiplier_for(Some("govern")), 2.0);

        let item = GapItem::new("GV.OC-01", "Organizational context")
            .with_status(ImplementationStatus::NotImplemented);
        assert_eq!(estimate_effort(&item, &config), 160);
    }

    #[test]
    fn test_rejects_keys_naming_same_function() {
        let err = PlannerConfig::from_yaml_str("domain_multipliers:\n  GV: 1.2\n  govern: 2.0\n")
            .unwrap_err();
        assert!(matches!(err, PlanningError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_monthly_hours() {
        let err = PlannerConfig::from_json_str(r#"{"monthly_hours_per_resource": 0}"#).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = PlannerConfig {
            high_utilization_percent: 120,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        tokio::fs::write(&path, r#"{"hourly_rate": 95.5}"#).await.unwrap();

        let config = PlannerConfig::load(&path).await.unwrap();
        assert_eq!(config.hourly_rate, 95.5);
    }
}
