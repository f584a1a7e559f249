//! Simulated runtime conditions: the four scenario dimensions and their product.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetworkCondition {
    #[serde(rename = "wifi")]
    Wifi,
    #[serde(rename = "4g")]
    FourG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "2g")]
    TwoG,
}

impl NetworkCondition {
    pub const ALL: [Self; 4] = [Self::Wifi, Self::FourG, Self::ThreeG, Self::TwoG];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wifi => "wifi",
            Self::FourG => "4g",
            Self::ThreeG => "3g",
            Self::TwoG => "2g",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CpuThrottle {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "4x")]
    FourX,
    #[serde(rename = "6x")]
    SixX,
}

impl CpuThrottle {
    pub const ALL: [Self; 3] = [Self::None, Self::FourX, Self::SixX];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FourX => "4x",
            Self::SixX => "6x",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceType {
    HighEnd,
    MidRange,
    LowEnd,
}

impl DeviceType {
    pub const ALL: [Self; 3] = [Self::HighEnd, Self::MidRange, Self::LowEnd];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HighEnd => "high-end",
            Self::MidRange => "mid-range",
            Self::LowEnd => "low-end",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStatus {
    FirstLoad,
    Cached,
    Offline,
}

impl CacheStatus {
    pub const ALL: [Self; 3] = [Self::FirstLoad, Self::Cached, Self::Offline];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstLoad => "first-load",
            Self::Cached => "cached",
            Self::Offline => "offline",
        }
    }
}

/// Which scenario dimension a rejected value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioDimension {
    Network,
    CpuThrottle,
    DeviceType,
    CacheStatus,
}

impl ScenarioDimension {
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::CpuThrottle => "cpuThrottle",
            Self::DeviceType => "deviceType",
            Self::CacheStatus => "cacheStatus",
        }
    }

    fn expected(self) -> Vec<&'static str> {
        match self {
            Self::Network => NetworkCondition::ALL.iter().map(|v| v.as_str()).collect(),
            Self::CpuThrottle => CpuThrottle::ALL.iter().map(|v| v.as_str()).collect(),
            Self::DeviceType => DeviceType::ALL.iter().map(|v| v.as_str()).collect(),
            Self::CacheStatus => CacheStatus::ALL.iter().map(|v| v.as_str()).collect(),
        }
    }
}

impl fmt::Display for ScenarioDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {dimension}: {value:?} (expected one of {})", .dimension.expected().join(", "))]
pub struct ScenarioError {
    pub dimension: ScenarioDimension,
    pub value: String,
}

impl ScenarioError {
    fn new(dimension: ScenarioDimension, value: &str) -> Self {
        Self {
            dimension,
            value: value.to_string(),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl FromStr for NetworkCondition {
    type Err = ScenarioError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "wifi" => Ok(Self::Wifi),
            "4g" => Ok(Self::FourG),
            "3g" => Ok(Self::ThreeG),
            "2g" => Ok(Self::TwoG),
            _ => Err(ScenarioError::new(ScenarioDimension::Network, raw)),
        }
    }
}

impl FromStr for CpuThrottle {
    type Err = ScenarioError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "none" => Ok(Self::None),
            "4x" => Ok(Self::FourX),
            "6x" => Ok(Self::SixX),
            _ => Err(ScenarioError::new(ScenarioDimension::CpuThrottle, raw)),
        }
    }
}

impl FromStr for DeviceType {
    type Err = ScenarioError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "high-end" => Ok(Self::HighEnd),
            "mid-range" => Ok(Self::MidRange),
            "low-end" => Ok(Self::LowEnd),
            _ => Err(ScenarioError::new(ScenarioDimension::DeviceType, raw)),
        }
    }
}

impl FromStr for CacheStatus {
    type Err = ScenarioError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match normalize(raw).as_str() {
            "first-load" => Ok(Self::FirstLoad),
            "cached" => Ok(Self::Cached),
            "offline" => Ok(Self::Offline),
            _ => Err(ScenarioError::new(ScenarioDimension::CacheStatus, raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub network: NetworkCondition,
    pub cpu_throttle: CpuThrottle,
    pub device_type: DeviceType,
    pub cache_status: CacheStatus,
}

impl ScenarioConfig {
    /// Number of distinct scenarios.
    pub const COMBINATIONS: usize = NetworkCondition::ALL.len()
        * CpuThrottle::ALL.len()
        * DeviceType::ALL.len()
        * CacheStatus::ALL.len();

    pub fn new(
        network: NetworkCondition,
        cpu_throttle: CpuThrottle,
        device_type: DeviceType,
        cache_status: CacheStatus,
    ) -> Self {
        Self {
            network,
            cpu_throttle,
            device_type,
            cache_status,
        }
    }

    /// Parses all four dimensions, failing on the first unrecognized value.
    pub fn parse(
        network: &str,
        cpu_throttle: &str,
        device_type: &str,
        cache_status: &str,
    ) -> Result<Self, ScenarioError> {
        Ok(Self {
            network: network.parse()?,
            cpu_throttle: cpu_throttle.parse()?,
            device_type: device_type.parse()?,
            cache_status: cache_status.parse()?,
        })
    }

    /// Every scenario, ordered network, then throttle, then device, then cache.
    pub fn all() -> impl Iterator<Item = ScenarioConfig> {
        NetworkCondition::ALL.into_iter().flat_map(|network| {
            CpuThrottle::ALL.into_iter().flat_map(move |cpu_throttle| {
                DeviceType::ALL.into_iter().flat_map(move |device_type| {
                    CacheStatus::ALL.into_iter().map(move |cache_status| {
                        ScenarioConfig::new(network, cpu_throttle, device_type, cache_status)
                    })
                })
            })
        })
    }

    pub fn with_cache_status(self, cache_status: CacheStatus) -> Self {
        Self {
            cache_status,
            ..self
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            network: NetworkCondition::FourG,
            cpu_throttle: CpuThrottle::None,
            device_type: DeviceType::MidRange,
            cache_status: CacheStatus::FirstLoad,
        }
    }
}

impl fmt::Display for ScenarioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.network.as_str(),
            self.cpu_throttle.as_str(),
            self.device_type.as_str(),
            self.cache_status.as_str()
        )
    }
}

/// The enumerated scenario domain, as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDomain {
    pub networks: Vec<NetworkCondition>,
    pub cpu_throttles: Vec<CpuThrottle>,
    pub device_types: Vec<DeviceType>,
    pub cache_statuses: Vec<CacheStatus>,
    pub default_scenario: ScenarioConfig,
    pub combinations: usize,
}

impl Default for ScenarioDomain {
    fn default() -> Self {
        Self {
            networks: NetworkCondition::ALL.to_vec(),
            cpu_throttles: CpuThrottle::ALL.to_vec(),
            device_types: DeviceType::ALL.to_vec(),
            cache_statuses: CacheStatus::ALL.to_vec(),
            default_scenario: ScenarioConfig::default(),
            combinations: ScenarioConfig::COMBINATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_enumerates_full_domain_without_duplicates() {
        let scenarios: Vec<_> = ScenarioConfig::all().collect();
        assert_eq!(scenarios.len(), 108);
        assert_eq!(ScenarioConfig::COMBINATIONS, 108);

        let unique: std::collections::BTreeSet<_> = scenarios.iter().copied().collect();
        assert_eq!(unique.len(), scenarios.len());
        assert_eq!(
            scenarios[0],
            ScenarioConfig::new(
                NetworkCondition::Wifi,
                CpuThrottle::None,
                DeviceType::HighEnd,
                CacheStatus::FirstLoad
            )
        );
    }

    #[test]
    fn parse_accepts_wire_names_case_insensitively() {
        let scenario = ScenarioConfig::parse(" 4G ", "none", "Mid-Range", "first-load")
            .expect("valid scenario");
        assert_eq!(scenario, ScenarioConfig::default());
    }

    #[test]
    fn parse_rejects_each_dimension() {
        let err = ScenarioConfig::parse("5g", "none", "mid-range", "cached").unwrap_err();
        assert_eq!(err.dimension, ScenarioDimension::Network);
        assert_eq!(err.value, "5g");

        let err = ScenarioConfig::parse("4g", "2x", "mid-range", "cached").unwrap_err();
        assert_eq!(err.dimension, ScenarioDimension::CpuThrottle);

        let err = ScenarioConfig::parse("4g", "none", "potato", "cached").unwrap_err();
        assert_eq!(err.dimension, ScenarioDimension::DeviceType);

        let err = ScenarioConfig::parse("4g", "none", "low-end", "warm").unwrap_err();
        assert_eq!(err.dimension, ScenarioDimension::CacheStatus);
        assert!(err.to_string().contains("first-load, cached, offline"));
    }

    #[test]
    fn serde_uses_wire_names() {
        let scenario = ScenarioConfig::new(
            NetworkCondition::TwoG,
            CpuThrottle::SixX,
            DeviceType::LowEnd,
            CacheStatus::Offline,
        );
        let encoded = serde_json::to_string(&scenario).expect("serialize");
        assert_eq!(
            encoded,
            r#"{"network":"2g","cpuThrottle":"6x","deviceType":"low-end","cacheStatus":"offline"}"#
        );
    }
}
