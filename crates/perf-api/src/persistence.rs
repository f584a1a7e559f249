use std::path::Path;

use chrono::Utc;
use contracts::{PerformanceMetrics, ScenarioConfig, SolutionEntry};
use perf_core::{MetricsTable, SolutionCatalog};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("sqlite store is not attached")]
    NotAttached,
}

/// Counts written by a full reseed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCounts {
    pub solutions: usize,
    pub metrics: usize,
}

const CATALOG_FINGERPRINT_KEY: &str = "catalog_fingerprint";

/// Content hash of every catalog entry, baseline included, in catalog order.
pub fn catalog_fingerprint(catalog: &SolutionCatalog) -> Result<String, PersistenceError> {
    let payload = serde_json::to_vec(catalog.entries())?;
    Ok(blake3::hash(&payload).to_hex().to_string())
}

/// SQLite-backed lookup table of solutions and precomputed metric rows.
#[derive(Debug)]
pub struct SqliteMetricsStore {
    conn: Connection,
}

impl SqliteMetricsStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.configure()?;
        store.migrate()?;
        Ok(store)
    }

    pub fn close(self) -> Result<(), PersistenceError> {
        self.conn.close().map_err(|(_, err)| PersistenceError::Sqlite(err))
    }

    /// Replaces every stored solution and metric row in one transaction.
    /// The baseline is stored only as metric rows, not as a solution.
    pub fn replace_all(
        &mut self,
        catalog: &SolutionCatalog,
        table: &MetricsTable,
    ) -> Result<SeedCounts, PersistenceError> {
        let created_at = Utc::now().to_rfc3339();
        let fingerprint = catalog_fingerprint(catalog)?;
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM performance_metrics", [])?;
        tx.execute("DELETE FROM solutions", [])?;

        let mut solutions = 0;
        for (position, entry) in catalog.optimizations().enumerate() {
            let payload_json = serde_json::to_string(entry)?;
            tx.execute(
                "INSERT INTO solutions (
                    id,
                    position,
                    category,
                    payload_json,
                    created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.id.as_str(),
                    i64::try_from(position).unwrap_or(i64::MAX),
                    entry.category.as_str(),
                    payload_json,
                    created_at.as_str(),
                ],
            )?;
            solutions += 1;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO performance_metrics (
                    solution_id,
                    network,
                    cpu_throttle,
                    device_type,
                    cache_status,
                    metrics_json,
                    created_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in table.rows() {
                let metrics_json = serde_json::to_string(&row.metrics)?;
                stmt.execute(params![
                    row.solution_id.as_str(),
                    row.scenario.network.as_str(),
                    row.scenario.cpu_throttle.as_str(),
                    row.scenario.device_type.as_str(),
                    row.scenario.cache_status.as_str(),
                    metrics_json,
                    created_at.as_str(),
                ])?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO store_meta (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![CATALOG_FINGERPRINT_KEY, fingerprint, created_at.as_str()],
        )?;

        tx.commit()?;
        Ok(SeedCounts {
            solutions,
            metrics: table.len(),
        })
    }

    pub fn load_metrics(
        &self,
        solution_id: &str,
        scenario: &ScenarioConfig,
    ) -> Result<Option<PerformanceMetrics>, PersistenceError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT metrics_json
                 FROM performance_metrics
                 WHERE solution_id = ?1
                   AND network = ?2
                   AND cpu_throttle = ?3
                   AND device_type = ?4
                   AND cache_status = ?5",
                params![
                    solution_id,
                    scenario.network.as_str(),
                    scenario.cpu_throttle.as_str(),
                    scenario.device_type.as_str(),
                    scenario.cache_status.as_str(),
                ],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => Ok(Some(serde_json::from_str::<PerformanceMetrics>(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_solutions(&self) -> Result<Vec<SolutionEntry>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload_json
             FROM solutions
             ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut solutions = Vec::new();
        for row in rows {
            let payload = row?;
            solutions.push(serde_json::from_str::<SolutionEntry>(&payload)?);
        }

        Ok(solutions)
    }

    pub fn load_solution(&self, id: &str) -> Result<Option<SolutionEntry>, PersistenceError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload_json FROM solutions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => Ok(Some(serde_json::from_str::<SolutionEntry>(&raw)?)),
            None => Ok(None),
        }
    }

    /// Fingerprint of the catalog the store was last seeded from.
    pub fn seeded_fingerprint(&self) -> Result<Option<String>, PersistenceError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = ?1",
                params![CATALOG_FINGERPRINT_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn solutions_count(&self) -> Result<usize, PersistenceError> {
        self.count("SELECT COUNT(*) FROM solutions")
    }

    pub fn metrics_count(&self) -> Result<usize, PersistenceError> {
        self.count("SELECT COUNT(*) FROM performance_metrics")
    }

    fn count(&self, sql: &str) -> Result<usize, PersistenceError> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn configure(&mut self) -> Result<(), PersistenceError> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<(), PersistenceError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS solutions (
                id TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                category TEXT NOT NULL,
                payload_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS performance_metrics (
                solution_id TEXT NOT NULL,
                network TEXT NOT NULL,
                cpu_throttle TEXT NOT NULL,
                device_type TEXT NOT NULL,
                cache_status TEXT NOT NULL,
                metrics_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (solution_id, network, cpu_throttle, device_type, cache_status)
            );

            CREATE INDEX IF NOT EXISTS idx_solutions_category ON solutions(category);

            CREATE TABLE IF NOT EXISTS store_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        let applied_at = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, name, applied_at)
             VALUES(1, 'initial_v1', ?1)",
            params![applied_at],
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_migrations(version, name, applied_at)
             VALUES(2, 'store_meta_v2', ?1)",
            params![applied_at],
        )?;

        Ok(())
    }
}
