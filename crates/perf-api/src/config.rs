//! Service configuration resolved from `PERF_*` environment variables.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use perf_core::{CatalogError, SolutionCatalog};
use thiserror::Error;

pub const DEFAULT_SQLITE_PATH: &str = "perf_metrics.sqlite";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

pub const ENV_SQLITE_PATH: &str = "PERF_SQLITE_PATH";
pub const ENV_BIND_ADDR: &str = "PERF_BIND_ADDR";
pub const ENV_CATALOG_PATH: &str = "PERF_CATALOG_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub sqlite_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub catalog_path: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let sqlite_path = non_blank(ENV_SQLITE_PATH)
            .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string())
            .into();
        let bind_addr = parse_bind_addr(
            &non_blank(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;
        let catalog_path = non_blank(ENV_CATALOG_PATH).map(PathBuf::from);

        Ok(Self {
            sqlite_path,
            bind_addr,
            catalog_path,
        })
    }

    /// The configured catalog file, or the builtin table when none is set.
    pub fn load_catalog(&self) -> Result<SolutionCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => SolutionCatalog::load(path),
            None => Ok(SolutionCatalog::builtin()),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sqlite_path: DEFAULT_SQLITE_PATH.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            catalog_path: None,
        }
    }
}

pub fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse::<SocketAddr>()
        .map_err(|source| ConfigError::InvalidBindAddr {
            value: raw.to_string(),
            source,
        })
}
