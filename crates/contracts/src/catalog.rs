//! Catalog entry shapes for optimization solutions.

use serde::{Deserialize, Serialize};

pub const BASELINE_SOLUTION_ID: &str = "baseline";

/// Per-metric multiplicative effect of a solution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SolutionFactors {
    pub lcp: f64,
    pub fcp: f64,
    pub fid: f64,
    pub cls: f64,
    pub size: f64,
}

impl SolutionFactors {
    pub const NEUTRAL: Self = Self::new(1.0, 1.0, 1.0, 1.0, 1.0);

    pub const fn new(lcp: f64, fcp: f64, fid: f64, cls: f64, size: f64) -> Self {
        Self {
            lcp,
            fcp,
            fid,
            cls,
            size,
        }
    }

    /// Factors in field order, paired with their names.
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("lcp", self.lcp),
            ("fcp", self.fcp),
            ("fid", self.fid),
            ("cls", self.cls),
            ("size", self.size),
        ]
    }
}

impl Default for SolutionFactors {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationCost {
    Low,
    Medium,
    High,
}

impl ImplementationCost {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SolutionEntry {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub principle: String,
    pub implementation_cost: ImplementationCost,
    #[serde(default)]
    pub applicable_scenarios: Vec<String>,
    #[serde(default)]
    pub code_example: String,
    #[serde(default)]
    pub factors: SolutionFactors,
}

impl SolutionEntry {
    pub fn is_baseline(&self) -> bool {
        self.id == BASELINE_SOLUTION_ID
    }
}
