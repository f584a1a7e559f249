//! Metric simulation core: solution catalog, deterministic simulator,
//! improvement calculator and the precomputed metrics table.

pub mod catalog;
pub mod comparison;
pub mod improvement;
pub mod simulator;
pub mod table;

pub use catalog::{CatalogError, SolutionCatalog};
pub use comparison::{assemble_comparison, compare};
pub use improvement::{improvement, percent_delta};
pub use simulator::{simulate, simulate_raw, simulate_with_factors, ScenarioFactors};
pub use table::{MetricsRow, MetricsTable};
