use serde::{Deserialize, Serialize};

use crate::net::NetworkBlock;
use crate::report::ReportFormat;
use crate::topology::TopologyOptions;
use crate::vlsm::FailurePolicy;

/// Top-level plan file structure that mirrors the YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Network to carve subnets from (e.g. "192.168.1.0/24")
    pub base: NetworkBlock,
    /// Usable hosts wanted in each subnet
    pub hosts: Vec<u32>,
    /// Stop at the first failure or skip failing requests
    #[serde(default)]
    pub on_failure: FailurePolicy,
    /// Report format written for the plan
    #[serde(default)]
    pub format: ReportFormat,
    /// Optional lab layout built on top of the allocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<TopologyOptions>,
}

impl PlanConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hosts.is_empty() {
            return Err(ValidationError::InvalidHosts(
                "at least one host count is required".to_string(),
            ));
        }

        if let Some(index) = self.hosts.iter().position(|&h| h < 1) {
            return Err(ValidationError::InvalidHosts(format!(
                "host count #{} must be greater than 0",
                index + 1
            )));
        }

        if let Some(topology) = &self.topology {
            if topology.routers < 1 {
                return Err(ValidationError::InvalidTopology(
                    "routers must be at least 1".to_string(),
                ));
            }
            if topology.switches < 1 {
                return Err(ValidationError::InvalidTopology(
                    "switches must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid host configuration: {0}")]
    InvalidHosts(String),
    #[error("Invalid topology configuration: {0}")]
    InvalidTopology(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_plan() {
        let yaml = r#"
base: 192.168.1.0/24
hosts: [50, 30, 20, 10]
"#;
        let config: PlanConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base.to_string(), "192.168.1.0/24");
        assert_eq!(config.hosts, vec![50, 30, 20, 10]);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
        assert_eq!(config.format, ReportFormat::Detailed);
        assert!(config.topology.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_plan() {
        let yaml = r#"
base: 10.0.0.0/16
hosts: [500, 200]
on_failure: skip
format: json
topology:
  routers: 2
  switches: 3
"#;
        let config: PlanConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.on_failure, FailurePolicy::SkipAndContinue);
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.topology, Some(TopologyOptions { routers: 2, switches: 3 }));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_host_bits_are_masked() {
        let config: PlanConfig = serde_yaml::from_str("base: 192.168.1.77/24\nhosts: [5]\n").unwrap();
        assert_eq!(config.base.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn test_invalid_base_is_rejected_by_parser() {
        assert!(serde_yaml::from_str::<PlanConfig>("base: 192.168.1.0\nhosts: [5]\n").is_err());
        assert!(serde_yaml::from_str::<PlanConfig>("base: 192.168.1.0/40\nhosts: [5]\n").is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config: PlanConfig = serde_yaml::from_str("base: 10.0.0.0/8\nhosts: []\n").unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidHosts(_))));

        config.hosts = vec![4, 0];
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid host configuration: host count #2 must be greater than 0");

        config.hosts = vec![4];
        config.topology = Some(TopologyOptions { routers: 0, switches: 1 });
        assert!(matches!(config.validate(), Err(ValidationError::InvalidTopology(_))));
    }
}
