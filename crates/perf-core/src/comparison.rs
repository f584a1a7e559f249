use contracts::{Comparison, PerformanceMetrics, ScenarioConfig, BASELINE_SOLUTION_ID};

use crate::catalog::SolutionCatalog;
use crate::improvement::improvement;
use crate::simulator::simulate;

pub fn assemble_comparison(baseline: PerformanceMetrics, optimized: PerformanceMetrics) -> Comparison {
    Comparison {
        improvement: improvement(&baseline, &optimized),
        baseline,
        optimized,
    }
}

/// Online comparison: simulates the baseline and the solution directly.
pub fn compare(catalog: &SolutionCatalog, solution_id: &str, scenario: &ScenarioConfig) -> Comparison {
    let baseline = simulate(catalog, BASELINE_SOLUTION_ID, scenario);
    let optimized = simulate(catalog, solution_id, scenario);
    assemble_comparison(baseline, optimized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_assembles_triple() {
        let catalog = SolutionCatalog::builtin();
        let comparison = compare(&catalog, "http-cache", &ScenarioConfig::default());
        assert_eq!(comparison.baseline.lcp, 5000);
        assert_eq!(comparison.optimized.lcp, 1500);
        assert_eq!(comparison.improvement.lcp, 70);
    }

    #[test]
    fn baseline_against_itself_is_flat() {
        let catalog = SolutionCatalog::builtin();
        for scenario in ScenarioConfig::all() {
            let comparison = compare(&catalog, BASELINE_SOLUTION_ID, &scenario);
            assert_eq!(comparison.baseline, comparison.optimized);
            assert!(comparison.improvement.is_zero(), "{scenario}");
        }
    }
}
