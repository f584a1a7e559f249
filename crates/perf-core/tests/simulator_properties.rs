use contracts::{
    CacheStatus, CpuThrottle, DeviceType, MetricKey, NetworkCondition, ScenarioConfig,
    BASELINE_SOLUTION_ID,
};
use perf_core::{compare, improvement, simulate, MetricsTable, SolutionCatalog};
use proptest::prelude::*;

fn scenario_strategy() -> impl Strategy<Value = ScenarioConfig> {
    (
        prop::sample::select(NetworkCondition::ALL.to_vec()),
        prop::sample::select(CpuThrottle::ALL.to_vec()),
        prop::sample::select(DeviceType::ALL.to_vec()),
        prop::sample::select(CacheStatus::ALL.to_vec()),
    )
        .prop_map(|(network, cpu, device, cache)| ScenarioConfig::new(network, cpu, device, cache))
}

fn solution_strategy() -> impl Strategy<Value = String> {
    let ids: Vec<String> = SolutionCatalog::builtin()
        .solution_ids()
        .into_iter()
        .map(str::to_string)
        .collect();
    prop::sample::select(ids)
}

#[test]
fn every_precomputed_row_equals_direct_simulation() {
    let catalog = SolutionCatalog::builtin();
    let table = MetricsTable::build(&catalog);
    for row in table.rows() {
        assert_eq!(
            row.metrics,
            simulate(&catalog, &row.solution_id, &row.scenario),
            "{} {}",
            row.solution_id,
            row.scenario
        );
    }
}

#[test]
fn table_build_is_repeatable() {
    let catalog = SolutionCatalog::builtin();
    let first = MetricsTable::build(&catalog);
    let second = MetricsTable::build(&catalog);
    assert_eq!(first.rows(), second.rows());
}

proptest! {
    #[test]
    fn simulate_is_deterministic(id in solution_strategy(), scenario in scenario_strategy()) {
        let catalog = SolutionCatalog::builtin();
        prop_assert_eq!(
            simulate(&catalog, &id, &scenario),
            simulate(&catalog, &id, &scenario)
        );
    }

    #[test]
    fn baseline_self_improvement_is_zero(scenario in scenario_strategy()) {
        let catalog = SolutionCatalog::builtin();
        let a = simulate(&catalog, BASELINE_SOLUTION_ID, &scenario);
        let b = simulate(&catalog, BASELINE_SOLUTION_ID, &scenario);
        prop_assert!(improvement(&a, &b).is_zero());
    }

    #[test]
    fn cache_never_hurts(id in solution_strategy(), scenario in scenario_strategy()) {
        let catalog = SolutionCatalog::builtin();
        let first = simulate(&catalog, &id, &scenario.with_cache_status(CacheStatus::FirstLoad));
        let cached = simulate(&catalog, &id, &scenario.with_cache_status(CacheStatus::Cached));
        let offline = simulate(&catalog, &id, &scenario.with_cache_status(CacheStatus::Offline));

        prop_assert_eq!(first.cls, cached.cls);
        prop_assert_eq!(first.cls, offline.cls);
        for key in [
            MetricKey::TotalSize,
            MetricKey::JsSize,
            MetricKey::CssSize,
            MetricKey::Ttfb,
            MetricKey::Lcp,
            MetricKey::Fcp,
            MetricKey::Tti,
            MetricKey::Si,
        ] {
            prop_assert!(cached.value(key) <= first.value(key), "{} regressed", key);
        }
    }

    #[test]
    fn unknown_ids_simulate_as_baseline(
        suffix in "[a-z]{1,12}",
        scenario in scenario_strategy(),
    ) {
        let catalog = SolutionCatalog::builtin();
        let id = format!("unknown-{suffix}");
        prop_assert_eq!(
            simulate(&catalog, &id, &scenario),
            simulate(&catalog, BASELINE_SOLUTION_ID, &scenario)
        );
    }

    #[test]
    fn builtin_solutions_never_regress(id in solution_strategy(), scenario in scenario_strategy()) {
        let catalog = SolutionCatalog::builtin();
        let comparison = compare(&catalog, &id, &scenario);
        for key in MetricKey::ALL {
            let pct = comparison.improvement.get(key);
            prop_assert!((0..=100).contains(&pct), "{} {} = {}", id, key, pct);
        }
    }
}
