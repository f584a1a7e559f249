//! v1 cross-boundary contracts shared by the simulator, the API and persistence.

pub mod catalog;
pub mod scenario;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{ImplementationCost, SolutionEntry, SolutionFactors, BASELINE_SOLUTION_ID};
pub use scenario::{
    CacheStatus, CpuThrottle, DeviceType, NetworkCondition, ScenarioConfig, ScenarioDimension,
    ScenarioDomain, ScenarioError,
};

pub const SCHEMA_VERSION_V1: &str = "1.0";

/// The twelve fields of a metric vector, in wire order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Lcp,
    Fcp,
    Ttfb,
    Fid,
    Cls,
    Tti,
    Si,
    Inp,
    TotalSize,
    RequestCount,
    JsSize,
    CssSize,
}

impl MetricKey {
    pub const ALL: [Self; 12] = [
        Self::Lcp,
        Self::Fcp,
        Self::Ttfb,
        Self::Fid,
        Self::Cls,
        Self::Tti,
        Self::Si,
        Self::Inp,
        Self::TotalSize,
        Self::RequestCount,
        Self::JsSize,
        Self::CssSize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lcp => "lcp",
            Self::Fcp => "fcp",
            Self::Ttfb => "ttfb",
            Self::Fid => "fid",
            Self::Cls => "cls",
            Self::Tti => "tti",
            Self::Si => "si",
            Self::Inp => "inp",
            Self::TotalSize => "totalSize",
            Self::RequestCount => "requestCount",
            Self::JsSize => "jsSize",
            Self::CssSize => "cssSize",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthetic page-load metrics. Timings are milliseconds, sizes are KB.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub lcp: u64,
    pub fcp: u64,
    pub ttfb: u64,
    pub fid: u64,
    pub cls: f64,
    pub tti: u64,
    pub si: u64,
    pub inp: u64,
    pub total_size: u64,
    pub request_count: u64,
    pub js_size: u64,
    pub css_size: u64,
}

impl PerformanceMetrics {
    pub fn value(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Lcp => self.lcp as f64,
            MetricKey::Fcp => self.fcp as f64,
            MetricKey::Ttfb => self.ttfb as f64,
            MetricKey::Fid => self.fid as f64,
            MetricKey::Cls => self.cls,
            MetricKey::Tti => self.tti as f64,
            MetricKey::Si => self.si as f64,
            MetricKey::Inp => self.inp as f64,
            MetricKey::TotalSize => self.total_size as f64,
            MetricKey::RequestCount => self.request_count as f64,
            MetricKey::JsSize => self.js_size as f64,
            MetricKey::CssSize => self.css_size as f64,
        }
    }
}

/// Signed percentage improvement per metric; negative means a regression.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementMetrics {
    pub lcp: i64,
    pub fcp: i64,
    pub ttfb: i64,
    pub fid: i64,
    pub cls: i64,
    pub tti: i64,
    pub si: i64,
    pub inp: i64,
    pub total_size: i64,
    pub request_count: i64,
    pub js_size: i64,
    pub css_size: i64,
}

impl ImprovementMetrics {
    pub fn from_fn(mut f: impl FnMut(MetricKey) -> i64) -> Self {
        Self {
            lcp: f(MetricKey::Lcp),
            fcp: f(MetricKey::Fcp),
            ttfb: f(MetricKey::Ttfb),
            fid: f(MetricKey::Fid),
            cls: f(MetricKey::Cls),
            tti: f(MetricKey::Tti),
            si: f(MetricKey::Si),
            inp: f(MetricKey::Inp),
            total_size: f(MetricKey::TotalSize),
            request_count: f(MetricKey::RequestCount),
            js_size: f(MetricKey::JsSize),
            css_size: f(MetricKey::CssSize),
        }
    }

    pub fn get(&self, key: MetricKey) -> i64 {
        match key {
            MetricKey::Lcp => self.lcp,
            MetricKey::Fcp => self.fcp,
            MetricKey::Ttfb => self.ttfb,
            MetricKey::Fid => self.fid,
            MetricKey::Cls => self.cls,
            MetricKey::Tti => self.tti,
            MetricKey::Si => self.si,
            MetricKey::Inp => self.inp,
            MetricKey::TotalSize => self.total_size,
            MetricKey::RequestCount => self.request_count,
            MetricKey::JsSize => self.js_size,
            MetricKey::CssSize => self.css_size,
        }
    }

    pub fn is_zero(&self) -> bool {
        MetricKey::ALL.iter().all(|key| self.get(*key) == 0)
    }
}

/// Baseline and optimized metrics for one scenario plus the improvement between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    pub baseline: PerformanceMetrics,
    pub optimized: PerformanceMetrics,
    pub improvement: ImprovementMetrics,
}

/// Where the metrics of a comparison came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    Precomputed,
    Simulated,
}

impl MetricsSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precomputed => "precomputed",
            Self::Simulated => "simulated",
        }
    }
}

/// Comparison request as received on the wire; scenario values are validated later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRequest {
    pub solution_id: String,
    pub network: String,
    pub cpu_throttle: String,
    pub device_type: String,
    pub cache_status: String,
}

impl ComparisonRequest {
    pub fn new(solution_id: impl Into<String>, scenario: ScenarioConfig) -> Self {
        Self {
            solution_id: solution_id.into(),
            network: scenario.network.as_str().to_string(),
            cpu_throttle: scenario.cpu_throttle.as_str().to_string(),
            device_type: scenario.device_type.as_str().to_string(),
            cache_status: scenario.cache_status.as_str().to_string(),
        }
    }

    pub fn scenario(&self) -> Result<ScenarioConfig, ScenarioError> {
        ScenarioConfig::parse(
            &self.network,
            &self.cpu_throttle,
            &self.device_type,
            &self.cache_status,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitSummary {
    pub success: bool,
    pub solutions_count: usize,
    pub metrics_count: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidScenario,
    InvalidRequest,
    SolutionNotFound,
    PersistenceUnavailable,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}
