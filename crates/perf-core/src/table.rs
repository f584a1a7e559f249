//! Precomputed metrics for every (solution, scenario) pair.

use std::collections::BTreeMap;

use contracts::{Comparison, PerformanceMetrics, ScenarioConfig, BASELINE_SOLUTION_ID};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::SolutionCatalog;
use crate::comparison::assemble_comparison;
use crate::simulator::simulate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRow {
    pub solution_id: String,
    #[serde(flatten)]
    pub scenario: ScenarioConfig,
    pub metrics: PerformanceMetrics,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
    index: BTreeMap<String, BTreeMap<ScenarioConfig, usize>>,
}

impl MetricsTable {
    /// Simulates every catalog solution under every scenario. Rows come out
    /// baseline first, then in catalog order, each over `ScenarioConfig::all()`.
    pub fn build(catalog: &SolutionCatalog) -> Self {
        let keys: Vec<(&str, ScenarioConfig)> = catalog
            .solution_ids()
            .into_iter()
            .flat_map(|id| ScenarioConfig::all().map(move |scenario| (id, scenario)))
            .collect();

        let rows = keys
            .par_iter()
            .map(|(solution_id, scenario)| MetricsRow {
                solution_id: solution_id.to_string(),
                scenario: *scenario,
                metrics: simulate(catalog, solution_id, scenario),
            })
            .collect();

        Self::from_rows(rows)
    }

    /// Later rows win when the same key appears twice.
    pub fn from_rows(rows: Vec<MetricsRow>) -> Self {
        let mut index: BTreeMap<String, BTreeMap<ScenarioConfig, usize>> = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            index
                .entry(row.solution_id.clone())
                .or_default()
                .insert(row.scenario, idx);
        }
        Self { rows, index }
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, solution_id: &str, scenario: &ScenarioConfig) -> Option<&PerformanceMetrics> {
        self.index
            .get(solution_id)
            .and_then(|by_scenario| by_scenario.get(scenario))
            .map(|&idx| &self.rows[idx].metrics)
    }

    /// Comparison from the solution's row and the baseline row of the same
    /// scenario, if both are present.
    pub fn comparison(&self, solution_id: &str, scenario: &ScenarioConfig) -> Option<Comparison> {
        let baseline = self.get(BASELINE_SOLUTION_ID, scenario)?;
        let optimized = self.get(solution_id, scenario)?;
        Some(assemble_comparison(*baseline, *optimized))
    }
}

#[cfg(test)]
mod tests {
    use contracts::{CacheStatus, CpuThrottle, DeviceType, NetworkCondition};

    use super::*;
    use crate::comparison::compare;

    #[test]
    fn builtin_table_covers_every_pair() {
        let catalog = SolutionCatalog::builtin();
        let table = MetricsTable::build(&catalog);
        assert_eq!(table.len(), 13 * 108);
        assert_eq!(table.rows()[0].solution_id, "baseline");
        assert_eq!(table.rows()[0].scenario, ScenarioConfig::all().next().expect("scenario"));
        assert_eq!(table.rows()[108].solution_id, "route-lazy-loading");
        assert_eq!(table.rows().last().map(|row| row.solution_id.as_str()), Some("http-cache"));
    }

    #[test]
    fn precomputed_comparisons_match_online_path() {
        let catalog = SolutionCatalog::builtin();
        let table = MetricsTable::build(&catalog);
        for id in catalog.solution_ids() {
            for scenario in ScenarioConfig::all() {
                assert_eq!(
                    table.comparison(id, &scenario),
                    Some(compare(&catalog, id, &scenario)),
                    "{id} {scenario}"
                );
            }
        }
    }

    #[test]
    fn missing_rows_yield_none() {
        let catalog = SolutionCatalog::builtin();
        let table = MetricsTable::build(&catalog);
        assert!(table.get("nonexistent", &ScenarioConfig::default()).is_none());
        assert!(table.comparison("nonexistent", &ScenarioConfig::default()).is_none());

        let empty = MetricsTable::default();
        assert!(empty.is_empty());
        assert!(empty.comparison("ssr", &ScenarioConfig::default()).is_none());
    }

    #[test]
    fn row_serializes_flat_scenario() {
        let row = MetricsRow {
            solution_id: "ssr".to_string(),
            scenario: ScenarioConfig::new(
                NetworkCondition::ThreeG,
                CpuThrottle::FourX,
                DeviceType::LowEnd,
                CacheStatus::Cached,
            ),
            metrics: PerformanceMetrics::default(),
        };
        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value["solutionId"], "ssr");
        assert_eq!(value["network"], "3g");
        assert_eq!(value["cpuThrottle"], "4x");
        assert_eq!(value["deviceType"], "low-end");
        assert_eq!(value["cacheStatus"], "cached");
        assert!(value["metrics"].is_object());
    }
}
