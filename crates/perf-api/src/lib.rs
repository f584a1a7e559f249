//! In-process API facade over the metric simulator with an optional SQLite
//! lookup table, plus the HTTP server built on it.

pub mod config;
mod persistence;
mod server;

use std::path::Path;

use contracts::{
    Comparison, ComparisonRequest, InitSummary, MetricsSource, ScenarioConfig, ScenarioError,
    SolutionEntry, BASELINE_SOLUTION_ID,
};
use perf_core::{assemble_comparison, compare, MetricsTable, SolutionCatalog};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::{ConfigError, ServiceConfig};
pub use persistence::{catalog_fingerprint, PersistenceError, SeedCounts, SqliteMetricsStore};
pub use server::{serve, ServerError};

#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error(transparent)]
    InvalidScenario(#[from] ScenarioError),
    #[error("solution id must not be blank")]
    BlankSolutionId,
    #[error("unknown solution id: {0}")]
    SolutionNotFound(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonOutcome {
    pub comparison: Comparison,
    pub source: MetricsSource,
}

#[derive(Debug)]
pub struct PerformanceApi {
    catalog: SolutionCatalog,
    catalog_fingerprint: Option<String>,
    store: Option<SqliteMetricsStore>,
    store_current: bool,
    last_persistence_error: Option<String>,
}

impl PerformanceApi {
    pub fn new(catalog: SolutionCatalog) -> Self {
        let catalog_fingerprint = catalog_fingerprint(&catalog).ok();
        Self {
            catalog,
            catalog_fingerprint,
            store: None,
            store_current: false,
            last_persistence_error: None,
        }
    }

    pub fn catalog(&self) -> &SolutionCatalog {
        &self.catalog
    }

    /// Opens the store at `path`, closing any store attached before it.
    /// Rows are only served when the store was seeded from this catalog.
    pub fn attach_sqlite_store(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let store = SqliteMetricsStore::open(path.as_ref())?;
        self.detach_store()?;
        self.store_current = self.seeded_from_catalog(&store);
        info!(
            path = %path.as_ref().display(),
            current = self.store_current,
            "attached metrics store"
        );
        self.store = Some(store);
        Ok(())
    }

    pub fn detach_store(&mut self) -> Result<(), PersistenceError> {
        match self.store.take() {
            Some(store) => {
                self.store_current = false;
                store.close()?;
                info!("detached metrics store");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Whether the attached store holds rows seeded from the injected catalog.
    pub fn store_is_current(&self) -> bool {
        self.fresh_store().is_some()
    }

    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    /// Precomputes every (solution, scenario) row and replaces the store's
    /// contents with them.
    pub fn initialize_storage(&mut self) -> Result<InitSummary, PersistenceError> {
        let Some(store) = self.store.as_mut() else {
            return Err(PersistenceError::NotAttached);
        };

        let table = MetricsTable::build(&self.catalog);
        let counts = store.replace_all(&self.catalog, &table)?;
        self.store_current = true;
        self.last_persistence_error = None;
        info!(
            solutions = counts.solutions,
            metrics = counts.metrics,
            "metrics store initialized"
        );

        Ok(InitSummary {
            success: true,
            solutions_count: counts.solutions,
            metrics_count: counts.metrics,
            message: "metrics store initialized".to_string(),
        })
    }

    /// Optimization solutions, excluding the baseline. Reads the store when
    /// it holds solutions, the catalog otherwise.
    pub fn solutions(&mut self) -> Vec<SolutionEntry> {
        if let Some(store) = self.fresh_store() {
            match store.list_solutions() {
                Ok(stored) if !stored.is_empty() => return stored,
                Ok(_) => {}
                Err(err) => self.record_persistence_error("list solutions", &err),
            }
        }
        self.catalog.optimizations().cloned().collect()
    }

    pub fn solution(&mut self, id: &str) -> Result<SolutionEntry, ApiFailure> {
        if let Some(store) = self.fresh_store() {
            match store.load_solution(id) {
                Ok(Some(entry)) => return Ok(entry),
                Ok(None) => {}
                Err(err) => self.record_persistence_error("load solution", &err),
            }
        }
        self.catalog
            .get(id)
            .filter(|entry| !entry.is_baseline())
            .cloned()
            .ok_or_else(|| ApiFailure::SolutionNotFound(id.to_string()))
    }

    /// Validates the request, then serves the comparison from the store or,
    /// when the rows are unavailable, by simulating directly.
    pub fn compare(&mut self, request: &ComparisonRequest) -> Result<ComparisonOutcome, ApiFailure> {
        let scenario = request.scenario()?;
        let solution_id = request.solution_id.trim();
        if solution_id.is_empty() {
            return Err(ApiFailure::BlankSolutionId);
        }
        self.compare_scenario(solution_id, &scenario)
    }

    pub fn compare_scenario(
        &mut self,
        solution_id: &str,
        scenario: &ScenarioConfig,
    ) -> Result<ComparisonOutcome, ApiFailure> {
        if !self.catalog.contains(solution_id) {
            return Err(ApiFailure::SolutionNotFound(solution_id.to_string()));
        }

        let outcome = match self.lookup_precomputed(solution_id, scenario) {
            Some(comparison) => ComparisonOutcome {
                comparison,
                source: MetricsSource::Precomputed,
            },
            None => ComparisonOutcome {
                comparison: compare(&self.catalog, solution_id, scenario),
                source: MetricsSource::Simulated,
            },
        };

        debug!(
            solution_id,
            scenario = %scenario,
            source = outcome.source.as_str(),
            "comparison served"
        );
        Ok(outcome)
    }

    fn lookup_precomputed(
        &mut self,
        solution_id: &str,
        scenario: &ScenarioConfig,
    ) -> Option<Comparison> {
        let store = self.fresh_store()?;
        let rows = store
            .load_metrics(BASELINE_SOLUTION_ID, scenario)
            .and_then(|baseline| {
                store
                    .load_metrics(solution_id, scenario)
                    .map(|optimized| baseline.zip(optimized))
            });

        match rows {
            Ok(Some((baseline, optimized))) => Some(assemble_comparison(baseline, optimized)),
            Ok(None) => {
                debug!(solution_id, scenario = %scenario, "precomputed rows missing");
                None
            }
            Err(err) => {
                self.record_persistence_error("load metrics", &err);
                None
            }
        }
    }

    fn fresh_store(&self) -> Option<&SqliteMetricsStore> {
        self.store.as_ref().filter(|_| self.store_current)
    }

    fn seeded_from_catalog(&mut self, store: &SqliteMetricsStore) -> bool {
        match store.seeded_fingerprint() {
            Ok(Some(seeded)) => {
                if self.catalog_fingerprint.as_deref() == Some(seeded.as_str()) {
                    return true;
                }
                warn!("metrics store was seeded from a different catalog, serving simulated results");
                self.last_persistence_error =
                    Some("metrics store was seeded from a different catalog".to_string());
                false
            }
            Ok(None) => false,
            Err(err) => {
                self.record_persistence_error("read catalog fingerprint", &err);
                false
            }
        }
    }

    fn record_persistence_error(&mut self, operation: &str, err: &PersistenceError) {
        warn!(operation, error = %err, "metrics store unavailable, using fallback");
        self.last_persistence_error = Some(format!("{operation}: {err}"));
    }
}

impl Default for PerformanceApi {
    fn default() -> Self {
        Self::new(SolutionCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use contracts::{CacheStatus, CpuThrottle, DeviceType, NetworkCondition};

    use super::*;

    fn request(solution_id: &str, scenario: ScenarioConfig) -> ComparisonRequest {
        ComparisonRequest::new(solution_id, scenario)
    }

    #[test]
    fn compare_without_store_simulates() {
        let mut api = PerformanceApi::default();
        let outcome = api
            .compare(&request("http-cache", ScenarioConfig::default()))
            .expect("comparison");
        assert_eq!(outcome.source, MetricsSource::Simulated);
        assert_eq!(outcome.comparison.baseline.lcp, 5000);
        assert_eq!(outcome.comparison.optimized.lcp, 1500);
        assert_eq!(outcome.comparison.improvement.lcp, 70);
    }

    #[test]
    fn precomputed_and_simulated_paths_agree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut seeded = PerformanceApi::default();
        seeded
            .attach_sqlite_store(dir.path().join("metrics.sqlite"))
            .expect("attach");
        let summary = seeded.initialize_storage().expect("init");
        assert_eq!(summary.solutions_count, 12);
        assert_eq!(summary.metrics_count, 1404);

        let mut online = PerformanceApi::default();
        let scenario = ScenarioConfig::new(
            NetworkCondition::ThreeG,
            CpuThrottle::FourX,
            DeviceType::LowEnd,
            CacheStatus::Cached,
        );
        for id in ["baseline", "ssg", "virtual-list", "http-cache"] {
            let stored = seeded.compare(&request(id, scenario)).expect("stored");
            let simulated = online.compare(&request(id, scenario)).expect("simulated");
            assert_eq!(stored.source, MetricsSource::Precomputed);
            assert_eq!(simulated.source, MetricsSource::Simulated);
            assert_eq!(stored.comparison, simulated.comparison, "{id}");
        }
    }

    #[test]
    fn empty_store_falls_back_to_simulation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut api = PerformanceApi::default();
        api.attach_sqlite_store(dir.path().join("empty.sqlite"))
            .expect("attach");

        let outcome = api
            .compare(&request("ssr", ScenarioConfig::default()))
            .expect("comparison");
        assert_eq!(outcome.source, MetricsSource::Simulated);
        assert!(api.last_persistence_error().is_none());
        assert_eq!(api.solutions().len(), 12);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let mut api = PerformanceApi::default();

        let mut bad_network = request("ssr", ScenarioConfig::default());
        bad_network.network = "5g".to_string();
        assert!(matches!(
            api.compare(&bad_network),
            Err(ApiFailure::InvalidScenario(_))
        ));

        assert!(matches!(
            api.compare(&request("  ", ScenarioConfig::default())),
            Err(ApiFailure::BlankSolutionId)
        ));

        assert!(matches!(
            api.compare(&request("nonexistent", ScenarioConfig::default())),
            Err(ApiFailure::SolutionNotFound(id)) if id == "nonexistent"
        ));
    }

    #[test]
    fn initialize_requires_store() {
        let mut api = PerformanceApi::default();
        assert!(matches!(
            api.initialize_storage(),
            Err(PersistenceError::NotAttached)
        ));
    }

    #[test]
    fn solution_lookup_hides_baseline() {
        let mut api = PerformanceApi::default();
        assert_eq!(api.solution("ssg").expect("ssg").id, "ssg");
        assert!(matches!(
            api.solution("baseline"),
            Err(ApiFailure::SolutionNotFound(_))
        ));
        assert_eq!(api.solutions().len(), 12);
    }

    #[test]
    fn store_seeded_from_another_catalog_is_not_served() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("metrics.sqlite");
        let mut seeded = PerformanceApi::default();
        seeded.attach_sqlite_store(&path).expect("attach");
        seeded.initialize_storage().expect("init");
        seeded.detach_store().expect("detach");

        let mut entries = SolutionCatalog::builtin().entries().to_vec();
        let http_cache = entries
            .iter_mut()
            .find(|entry| entry.id == "http-cache")
            .expect("http-cache");
        http_cache.factors.lcp = 0.9;
        let custom = SolutionCatalog::from_entries(entries).expect("catalog");

        let mut api = PerformanceApi::new(custom.clone());
        api.attach_sqlite_store(&path).expect("reattach");
        assert!(api.has_store());
        assert!(!api.store_is_current());
        assert!(api.last_persistence_error().is_some());

        let outcome = api
            .compare_scenario("http-cache", &ScenarioConfig::default())
            .expect("comparison");
        assert_eq!(outcome.source, MetricsSource::Simulated);
        assert_eq!(
            outcome.comparison,
            compare(&custom, "http-cache", &ScenarioConfig::default())
        );
        assert_eq!(outcome.comparison.optimized.lcp, 4500);
        assert_eq!(outcome.comparison.improvement.lcp, 10);
        assert_eq!(api.solution("http-cache").expect("entry").factors.lcp, 0.9);

        api.initialize_storage().expect("reseed");
        assert!(api.store_is_current());
        let outcome = api
            .compare_scenario("http-cache", &ScenarioConfig::default())
            .expect("comparison");
        assert_eq!(outcome.source, MetricsSource::Precomputed);
        assert_eq!(outcome.comparison.optimized.lcp, 4500);
    }

    #[test]
    fn detach_closes_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut api = PerformanceApi::default();
        api.attach_sqlite_store(dir.path().join("metrics.sqlite"))
            .expect("attach");
        assert!(api.has_store());
        api.detach_store().expect("detach");
        assert!(!api.has_store());
        api.detach_store().expect("second detach is a no-op");
    }
}
