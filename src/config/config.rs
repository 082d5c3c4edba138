// src/config/config.rs
use crate::types::ReportMode;
use crate::utils::error::TerminalError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure for the terminal
///
/// Every field has a default, so an empty (or absent) file yields a
/// working setup against the public Strayacoin explorer and TradeOgre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path or name of the daemon CLI binary
    #[serde(default = "default_cli_path")]
    pub cli_path: PathBuf,

    /// Timeout for each remote HTTP request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Timeout for each daemon statistics query, in seconds
    /// (the mining command itself is never timed out)
    #[serde(default = "default_timeout_secs")]
    pub daemon_timeout_secs: u64,

    /// Route HTTP requests through proxies from the environment
    /// (`HTTP_PROXY`, `HTTPS_PROXY`, `NO_PROXY`)
    #[serde(default = "default_use_system_proxy")]
    pub use_system_proxy: bool,

    /// Per-block report detail
    #[serde(default)]
    pub report: ReportMode,

    /// Block explorer endpoints
    #[serde(default)]
    pub explorer: ExplorerConfig,

    /// Exchange ticker settings
    #[serde(default)]
    pub market: MarketConfig,
}

/// Block explorer endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Returns the network-wide connection count as plain text
    #[serde(default = "default_connection_count_url")]
    pub connection_count_url: String,

    /// Returns the money supply as plain text
    #[serde(default = "default_money_supply_url")]
    pub money_supply_url: String,
}

/// Exchange ticker settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Ticker endpoint; the pair is appended as the last path segment
    #[serde(default = "default_ticker_url")]
    pub ticker_url: String,

    /// Trading pair symbol, e.g. `NAH-BTC`
    #[serde(default = "default_pair")]
    pub pair: String,

    /// Unit appended to every quoted value
    #[serde(default = "default_quote_unit")]
    pub quote_unit: String,

    /// Exchange name shown in the report labels
    #[serde(default = "default_exchange")]
    pub exchange: String,
}

fn default_cli_path() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("Strayacoin-cli.exe")
    } else {
        PathBuf::from("Strayacoin-cli")
    }
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_use_system_proxy() -> bool {
    true
}

fn default_connection_count_url() -> String {
    "https://explorer.strayacoin.com/api/getconnectioncount".into()
}

fn default_money_supply_url() -> String {
    "https://explorer.strayacoin.com/ext/getmoneysupply".into()
}

fn default_ticker_url() -> String {
    "https://tradeogre.com/api/v1/ticker".into()
}

fn default_pair() -> String {
    "NAH-BTC".into()
}

fn default_quote_unit() -> String {
    "BTC".into()
}

fn default_exchange() -> String {
    "TradeOgre".into()
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            connection_count_url: default_connection_count_url(),
            money_supply_url: default_money_supply_url(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            ticker_url: default_ticker_url(),
            pair: default_pair(),
            quote_unit: default_quote_unit(),
            exchange: default_exchange(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cli_path: default_cli_path(),
            http_timeout_secs: default_timeout_secs(),
            daemon_timeout_secs: default_timeout_secs(),
            use_system_proxy: default_use_system_proxy(),
            report: ReportMode::default(),
            explorer: ExplorerConfig::default(),
            market: MarketConfig::default(),
        }
    }
}

impl MarketConfig {
    /// Full ticker URL for the configured pair
    pub fn pair_url(&self) -> String {
        format!("{}/{}", self.ticker_url.trim_end_matches('/'), self.pair)
    }
}

impl Config {
    /// Loads configuration from a file
    ///
    /// A missing file is not an error: the built-in defaults are used.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Loaded (or default) configuration, validated
    /// * `Err(TerminalError)` - If the file couldn't be read, parsed or validated
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, TerminalError> {
        let path = path.into();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            TerminalError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_str)
            .map_err(|e| TerminalError::ConfigError(format!("Invalid config format: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks endpoint URLs and timeouts
    pub fn validate(&self) -> Result<(), TerminalError> {
        Url::parse(&self.explorer.connection_count_url)?;
        Url::parse(&self.explorer.money_supply_url)?;
        Url::parse(&self.market.pair_url())?;

        if self.http_timeout_secs == 0 || self.daemon_timeout_secs == 0 {
            return Err(TerminalError::ConfigError(
                "Timeouts must be at least one second".to_string(),
            ));
        }
        if self.cli_path.as_os_str().is_empty() {
            return Err(TerminalError::ConfigError("cli_path is empty".to_string()));
        }
        Ok(())
    }

    /// Timeout applied to each remote HTTP request
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Timeout applied to each daemon statistics query
    pub fn daemon_timeout(&self) -> Duration {
        Duration::from_secs(self.daemon_timeout_secs)
    }

    /// Generates a commented configuration template string
    ///
    /// # Returns
    /// String containing a TOML template that parses back to the defaults
    pub fn generate_template() -> String {
        let defaults = Config::default();
        let mut template = String::new();
        template.push_str("# Strayacoin Terminal Configuration\n\n");
        template.push_str("# Daemon CLI used for mining, stats and wallet commands\n");
        template.push_str(&format!(
            "cli_path = \"{}\"\n",
            defaults.cli_path.display()
        ));
        template.push_str("# Seconds before a remote HTTP request is abandoned\n");
        template.push_str("http_timeout_secs = 5\n");
        template.push_str("# Seconds before a daemon stats query is abandoned\n");
        template.push_str("daemon_timeout_secs = 5\n");
        template.push_str("# Honour HTTP_PROXY / HTTPS_PROXY / NO_PROXY\n");
        template.push_str("use_system_proxy = true\n");
        template.push_str("# Per-block report: \"full\" or \"basic\" (no supply/market data)\n");
        template.push_str("report = \"full\"\n\n");

        template.push_str("[explorer]\n");
        template.push_str(&format!(
            "connection_count_url = \"{}\"\n",
            defaults.explorer.connection_count_url
        ));
        template.push_str(&format!(
            "money_supply_url = \"{}\"\n\n",
            defaults.explorer.money_supply_url
        ));

        template.push_str("[market]\n");
        template.push_str(&format!("ticker_url = \"{}\"\n", defaults.market.ticker_url));
        template.push_str(&format!("pair = \"{}\"\n", defaults.market.pair));
        template.push_str(&format!("quote_unit = \"{}\"\n", defaults.market.quote_unit));
        template.push_str(&format!("exchange = \"{}\"\n", defaults.market.exchange));

        template
    }
}
