use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{HubError, HubResult};
use crate::types::ChainInfo;

/// Hub-wide configuration: forwarding defaults and the chain capability table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct HubConfig {
    pub forward: ForwardDefaults,
    pub capabilities: Vec<ChainCapabilities>,
}

/// Values used for a forwarded transfer when the caller does not override them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ForwardDefaults {
    pub retries: u8,
    /// Go duration string
    pub timeout: String,
}

/// Capability flags for one chain, keyed by chain name.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ChainCapabilities {
    pub chain_name: String,
    pub pfm_enabled: bool,
    pub icq_enabled: bool,
}

impl Default for ForwardDefaults {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout: "10m".to_string(),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        let caps = |chain_name: &str, pfm_enabled, icq_enabled| ChainCapabilities {
            chain_name: chain_name.to_string(),
            pfm_enabled,
            icq_enabled,
        };
        Self {
            forward: ForwardDefaults::default(),
            capabilities: vec![
                caps("agoric", false, false),
                caps("celestia", true, false),
                caps("cosmoshub", true, false),
                caps("dydx", false, false),
                caps("juno", true, false),
                caps("neutron", false, false),
                caps("noble", true, false),
                caps("omniflixhub", true, false),
                caps("osmosis", true, true),
                caps("secretnetwork", true, false),
                caps("stargaze", true, false),
                caps("stride", true, false),
                caps("umee", false, false),
            ],
        }
    }
}

impl HubConfig {
    pub fn capabilities_for(&self, chain_name: &str) -> Option<&ChainCapabilities> {
        self.capabilities
            .iter()
            .find(|c| c.chain_name == chain_name)
    }

    /// Apply the capability table to a chain record. Chains absent from the table are
    /// returned unchanged.
    pub fn with_capabilities(&self, chain_name: &str, info: ChainInfo) -> ChainInfo {
        match self.capabilities_for(chain_name) {
            Some(caps) => ChainInfo {
                pfm_enabled: caps.pfm_enabled,
                icq_enabled: caps.icq_enabled,
                ..info
            },
            None => info,
        }
    }

    pub fn validate(&self) -> HubResult<()> {
        if !is_go_duration(&self.forward.timeout) {
            return Err(HubError::InvalidConfig {
                msg: format!("timeout {} is not a duration", self.forward.timeout),
            });
        }

        let mut names: Vec<&str> = self
            .capabilities
            .iter()
            .map(|c| c.chain_name.as_str())
            .collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(HubError::InvalidConfig {
                msg: format!("duplicate capabilities for {}", pair[0]),
            });
        }

        Ok(())
    }
}

/// Whether `s` is a Go duration such as `10m`, `1h30m` or `500ms`.
pub fn is_go_duration(s: &str) -> bool {
    const UNITS: [&str; 7] = ["ns", "us", "µs", "ms", "s", "m", "h"];

    let mut rest = s;
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];
        // longest match so "ms" is not read as "m"
        let unit_len = UNITS
            .iter()
            .filter(|unit| rest.starts_with(**unit))
            .map(|unit| unit.len())
            .max();
        match unit_len {
            Some(len) => rest = &rest[len..],
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HubConfig::default();
        assert_eq!(config.forward.retries, 3);
        assert_eq!(config.forward.timeout, "10m");
        config.validate().unwrap();
    }

    #[test]
    fn test_with_capabilities() {
        let config = HubConfig::default();
        let osmosis = config.with_capabilities("osmosis", ChainInfo::new("osmosis-1", "osmo"));
        assert!(osmosis.pfm_enabled);
        assert!(osmosis.icq_enabled);

        let mut flagged = ChainInfo::new("foo-1", "foo");
        flagged.pfm_enabled = true;
        assert_eq!(config.with_capabilities("foo", flagged.clone()), flagged);
    }

    #[test]
    fn test_validate_rejects_bad_timeout() {
        let mut config = HubConfig::default();
        config.forward.timeout = "ten minutes".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            HubError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_capabilities() {
        let mut config = HubConfig::default();
        config.capabilities.push(ChainCapabilities {
            chain_name: "noble".to_string(),
            pfm_enabled: false,
            icq_enabled: false,
        });
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid config: duplicate capabilities for noble");
    }

    #[test]
    fn test_go_durations() {
        for ok in ["10m", "3m", "1h30m", "500ms", "1.5h", "90s"] {
            assert!(is_go_duration(ok), "{ok}");
        }
        for bad in ["", "m", "10", "10x", "h1"] {
            assert!(!is_go_duration(bad), "{bad}");
        }
    }
}
