//! Percentage improvement between two metric vectors.

use contracts::{ImprovementMetrics, PerformanceMetrics};

use crate::simulator::round_half_up;

pub fn improvement(
    baseline: &PerformanceMetrics,
    optimized: &PerformanceMetrics,
) -> ImprovementMetrics {
    ImprovementMetrics::from_fn(|key| percent_delta(baseline.value(key), optimized.value(key)))
}

/// `round((baseline - optimized) / baseline * 100)`, or 0 when the baseline
/// is not positive. Regressions come out negative and are not clamped.
pub fn percent_delta(baseline: f64, optimized: f64) -> i64 {
    if baseline > 0.0 {
        round_half_up(((baseline - optimized) / baseline) * 100.0) as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use contracts::{MetricKey, ScenarioConfig};

    use super::*;
    use crate::catalog::SolutionCatalog;
    use crate::simulator::simulate;

    #[test]
    fn http_cache_improves_lcp_by_seventy_percent() {
        let catalog = SolutionCatalog::builtin();
        let scenario = ScenarioConfig::default();
        let baseline = simulate(&catalog, "baseline", &scenario);
        let optimized = simulate(&catalog, "http-cache", &scenario);

        let delta = improvement(&baseline, &optimized);
        assert_eq!(delta.lcp, 70);
        assert_eq!(delta.fcp, 80);
        assert_eq!(delta.total_size, 70);
        assert_eq!(delta.request_count, 70);
        assert_eq!(delta.js_size, 70);
        assert_eq!(delta.css_size, 70);
        assert_eq!(delta.ttfb, 0);
        assert_eq!(delta.tti, 0);
        assert_eq!(delta.cls, 0);
    }

    #[test]
    fn identical_vectors_yield_zero() {
        let catalog = SolutionCatalog::builtin();
        let baseline = simulate(&catalog, "baseline", &ScenarioConfig::default());
        assert!(improvement(&baseline, &baseline).is_zero());
    }

    #[test]
    fn zero_baseline_is_guarded() {
        let baseline = PerformanceMetrics {
            request_count: 0,
            ..PerformanceMetrics::default()
        };
        let optimized = PerformanceMetrics {
            request_count: 5,
            ..PerformanceMetrics::default()
        };
        let delta = improvement(&baseline, &optimized);
        assert_eq!(delta.request_count, 0);
        assert!(delta.is_zero());
    }

    #[test]
    fn regressions_are_negative_and_unclamped() {
        let baseline = PerformanceMetrics {
            lcp: 1000,
            fcp: 8,
            ..PerformanceMetrics::default()
        };
        let optimized = PerformanceMetrics {
            lcp: 3500,
            fcp: 9,
            ..PerformanceMetrics::default()
        };
        let delta = improvement(&baseline, &optimized);
        assert_eq!(delta.lcp, -250);
        // -12.5 rounds toward positive infinity
        assert_eq!(delta.fcp, -12);
    }

    #[test]
    fn eliminated_metric_is_full_improvement() {
        assert_eq!(percent_delta(200.0, 0.0), 100);
        assert_eq!(percent_delta(0.1, 0.09), 10);
        assert_eq!(percent_delta(-1.0, 3.0), 0);
    }

    #[test]
    fn every_key_is_compared() {
        let baseline = PerformanceMetrics {
            lcp: 100,
            fcp: 100,
            ttfb: 100,
            fid: 100,
            cls: 1.0,
            tti: 100,
            si: 100,
            inp: 100,
            total_size: 100,
            request_count: 100,
            js_size: 100,
            css_size: 100,
        };
        let optimized = PerformanceMetrics {
            lcp: 50,
            fcp: 50,
            ttfb: 50,
            fid: 50,
            cls: 0.5,
            tti: 50,
            si: 50,
            inp: 50,
            total_size: 50,
            request_count: 50,
            js_size: 50,
            css_size: 50,
        };
        let delta = improvement(&baseline, &optimized);
        for key in MetricKey::ALL {
            assert_eq!(delta.get(key), 50, "{key}");
        }
    }
}
