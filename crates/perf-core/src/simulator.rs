//! Deterministic metric simulator.
//!
//! Every output field is a base constant multiplied by scenario factors and,
//! for some fields, a solution factor. Products are evaluated left to right in
//! a fixed order so that rows computed here match persisted reference rows
//! exactly.

use contracts::{
    CacheStatus, CpuThrottle, DeviceType, NetworkCondition, PerformanceMetrics, ScenarioConfig,
    ScenarioError, SolutionFactors,
};

use crate::catalog::SolutionCatalog;

const BASE_LCP: f64 = 2500.0;
const BASE_FCP: f64 = 1800.0;
const BASE_TTFB: f64 = 200.0;
const BASE_FID: f64 = 100.0;
const BASE_CLS: f64 = 0.1;
const BASE_TTI: f64 = 3500.0;
const BASE_SI: f64 = 3000.0;
const BASE_INP: f64 = 200.0;

const BASE_TOTAL_SIZE_KB: f64 = 2000.0;
const BASE_REQUEST_COUNT: f64 = 50.0;
const BASE_JS_SIZE_KB: f64 = 800.0;
const BASE_CSS_SIZE_KB: f64 = 200.0;

/// Latency that maps to a network factor of 1.
const REFERENCE_LATENCY_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkProfile {
    pub download_kbps: u32,
    pub upload_kbps: u32,
    pub latency_ms: f64,
}

pub fn network_profile(network: NetworkCondition) -> NetworkProfile {
    let (download_kbps, upload_kbps, latency_ms) = match network {
        NetworkCondition::Wifi => (50_000, 50_000, 5.0),
        NetworkCondition::FourG => (10_000, 5_000, 50.0),
        NetworkCondition::ThreeG => (1_500, 750, 200.0),
        NetworkCondition::TwoG => (250, 250, 1_000.0),
    };
    NetworkProfile {
        download_kbps,
        upload_kbps,
        latency_ms,
    }
}

pub fn throttle_multiplier(cpu_throttle: CpuThrottle) -> f64 {
    match cpu_throttle {
        CpuThrottle::None => 1.0,
        CpuThrottle::FourX => 4.0,
        CpuThrottle::SixX => 6.0,
    }
}

/// Relative CPU and memory capacity of a device tier; high-end is 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub cpu_share: f64,
    pub memory_share: f64,
}

pub fn device_profile(device_type: DeviceType) -> DeviceProfile {
    let share = match device_type {
        DeviceType::HighEnd => 1.0,
        DeviceType::MidRange => 0.5,
        DeviceType::LowEnd => 0.25,
    };
    DeviceProfile {
        cpu_share: share,
        memory_share: share,
    }
}

/// Scales every network-bound timing.
pub fn cache_factor(cache_status: CacheStatus) -> f64 {
    match cache_status {
        CacheStatus::Cached => 0.3,
        CacheStatus::Offline => 0.1,
        CacheStatus::FirstLoad => 1.0,
    }
}

/// Scales transfer sizes; only a warm cache shrinks them.
pub fn cache_size_factor(cache_status: CacheStatus) -> f64 {
    match cache_status {
        CacheStatus::Cached => 0.3,
        CacheStatus::FirstLoad | CacheStatus::Offline => 1.0,
    }
}

/// Scenario-derived multipliers shared by all fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioFactors {
    pub network: f64,
    pub cpu: f64,
    pub device: f64,
    pub cache: f64,
    pub cache_size: f64,
}

impl ScenarioFactors {
    pub fn for_scenario(scenario: &ScenarioConfig) -> Self {
        Self {
            network: network_profile(scenario.network).latency_ms / REFERENCE_LATENCY_MS,
            cpu: throttle_multiplier(scenario.cpu_throttle),
            device: 1.0 / device_profile(scenario.device_type).cpu_share,
            cache: cache_factor(scenario.cache_status),
            cache_size: cache_size_factor(scenario.cache_status),
        }
    }
}

/// Rounds to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn whole(value: f64) -> u64 {
    round_half_up(value) as u64
}

/// Metrics for `solution_id` under `scenario`. Unknown ids simulate with
/// neutral factors, which reproduces the baseline.
pub fn simulate(
    catalog: &SolutionCatalog,
    solution_id: &str,
    scenario: &ScenarioConfig,
) -> PerformanceMetrics {
    simulate_with_factors(catalog.factors_for(solution_id), scenario)
}

/// Parses the scenario from wire strings before simulating.
pub fn simulate_raw(
    catalog: &SolutionCatalog,
    solution_id: &str,
    network: &str,
    cpu_throttle: &str,
    device_type: &str,
    cache_status: &str,
) -> Result<PerformanceMetrics, ScenarioError> {
    let scenario = ScenarioConfig::parse(network, cpu_throttle, device_type, cache_status)?;
    Ok(simulate(catalog, solution_id, &scenario))
}

pub fn simulate_with_factors(
    solution: SolutionFactors,
    scenario: &ScenarioConfig,
) -> PerformanceMetrics {
    let f = ScenarioFactors::for_scenario(scenario);

    PerformanceMetrics {
        lcp: whole(BASE_LCP * f.network * f.cpu * f.device * f.cache * solution.lcp),
        fcp: whole(BASE_FCP * f.network * f.cpu * f.device * f.cache * solution.fcp),
        ttfb: whole(BASE_TTFB * f.network * f.cache),
        fid: whole(BASE_FID * f.cpu * f.device * solution.fid),
        cls: round_half_up(BASE_CLS * solution.cls * 100.0) / 100.0,
        tti: whole(BASE_TTI * f.network * f.cpu * f.device * f.cache),
        si: whole(BASE_SI * f.network * f.cpu * f.device * f.cache),
        inp: whole(BASE_INP * f.cpu * f.device * solution.fid),
        total_size: whole(BASE_TOTAL_SIZE_KB * solution.size * f.cache_size),
        request_count: whole(BASE_REQUEST_COUNT * solution.size),
        js_size: whole(BASE_JS_SIZE_KB * solution.size * f.cache_size),
        css_size: whole(BASE_CSS_SIZE_KB * solution.size * f.cache_size),
    }
}
