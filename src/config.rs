use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Public n-UPnP endpoint listing the bridges registered from this network.
pub const DEFAULT_DISCOVERY_URL: &str = "https://discovery.meethue.com/";

const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Connection settings for a [`crate::Bridge`].
///
/// Every field can be overridden through `HUE_`-prefixed environment
/// variables, e.g. `HUE_USER_ID` or `HUE_BRIDGE_ADDRESS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `host` or `host:port` of the bridge. Discovered when absent.
    pub bridge_address: Option<String>,
    /// Credential issued by the bridge.
    pub user_id: Option<String>,
    pub discovery_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bridge_address: None,
            user_id: None,
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> crate::Result<Config> {
        Ok(Self::defaults().merge(Env::prefixed("HUE_")).extract()?)
    }

    /// Defaults, then the TOML file at `path` (if it exists), then the environment.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Config> {
        Ok(Self::defaults()
            .merge(Toml::file(path))
            .merge(Env::prefixed("HUE_"))
            .extract()?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }
}
