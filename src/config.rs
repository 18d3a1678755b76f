use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ethereum::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_network: String,
    pub networks: HashMap<String, NetworkConfig>,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: Option<String>,
    pub contracts: ContractsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    pub delegation_manager: String,
    /// Target of the raw storage cross-check; the check is skipped without it.
    pub strategy_manager: Option<String>,
    #[serde(default = "default_abi_dir")]
    pub abi_dir: PathBuf,
    #[serde(default = "default_delegation_manager_abi")]
    pub delegation_manager_abi: String,
    #[serde(default = "default_strategy_abi")]
    pub strategy_abi: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub stakers: Vec<String>,
    #[serde(default = "default_true")]
    pub storage_check: bool,
}

fn default_abi_dir() -> PathBuf {
    PathBuf::from("abis")
}

fn default_delegation_manager_abi() -> String {
    "DelegationManager.json".to_string()
}

fn default_strategy_abi() -> String {
    "StrategyBase.json".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stakers: vec!["0x6cdA20abb7A5361c7052C91b1ABa79AF1819A94A".to_string()],
            storage_check: true,
        }
    }
}

impl ContractsConfig {
    pub fn delegation_manager_path(&self) -> PathBuf {
        self.abi_dir.join(&self.delegation_manager_abi)
    }

    pub fn strategy_path(&self) -> PathBuf {
        self.abi_dir.join(&self.strategy_abi)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut networks = HashMap::new();

        networks.insert(
            "holesky".to_string(),
            NetworkConfig {
                rpc_url: "https://ethereum-holesky.publicnode.com".to_string(),
                chain_id: 17000,
                explorer_url: Some("https://holesky.etherscan.io".to_string()),
                contracts: ContractsConfig {
                    delegation_manager: "0xA44151489861Fe9e3055d95adC98FbD462B948e7".to_string(),
                    // Storage layout of this deployment is where slot 205 comes from.
                    strategy_manager: Some(
                        "0xdfB5f6CE42aAA7830E94ECFCcAd411beF4d4D5b6".to_string(),
                    ),
                    abi_dir: default_abi_dir(),
                    delegation_manager_abi: default_delegation_manager_abi(),
                    strategy_abi: default_strategy_abi(),
                },
            },
        );

        networks.insert(
            "mainnet".to_string(),
            NetworkConfig {
                rpc_url: "https://eth-mainnet.g.alchemy.com/v2/demo".to_string(),
                chain_id: 1,
                explorer_url: Some("https://etherscan.io".to_string()),
                contracts: ContractsConfig {
                    delegation_manager: "0x39053D51B77DC0d36036Fc1fCc8Cb819df8Ef37A".to_string(),
                    strategy_manager: None,
                    abi_dir: default_abi_dir(),
                    delegation_manager_abi: default_delegation_manager_abi(),
                    strategy_abi: default_strategy_abi(),
                },
            },
        );

        Self {
            default_network: "holesky".to_string(),
            networks,
            query: QueryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        Ok(config)
    }

    /// Load configuration with fallback to default
    pub async fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Self {
        let mut config = match path {
            Some(path) => match Self::load_from_file(path).await {
                Ok(config) => {
                    tracing::info!("Loaded configuration from file");
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file, using defaults: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.apply_api_key(std::env::var("ALCHEMY_API_KEY").ok().as_deref());
        config
    }

    /// Substitute an Alchemy API key into keyed RPC URLs
    fn apply_api_key(&mut self, api_key: Option<&str>) {
        if let Some(api_key) = api_key {
            tracing::info!("Using ALCHEMY_API_KEY environment variable for RPC URLs");

            for (network_name, network_config) in &mut self.networks {
                if network_config.rpc_url.contains("alchemy.com/v2/demo") {
                    network_config.rpc_url = network_config
                        .rpc_url
                        .replace("/demo", &format!("/{}", api_key));
                    tracing::debug!("Updated {} RPC URL with API key", network_name);
                } else if network_config.rpc_url.contains("YOUR_API_KEY_HERE") {
                    network_config.rpc_url = network_config
                        .rpc_url
                        .replace("YOUR_API_KEY_HERE", api_key);
                    tracing::debug!("Updated {} RPC URL with API key", network_name);
                }
            }
        } else {
            for (network_name, network_config) in &self.networks {
                if network_config.rpc_url.contains("/demo") {
                    tracing::warn!("Using demo RPC endpoint for {}, set ALCHEMY_API_KEY environment variable for better reliability", network_name);
                }
            }
        }
    }

    pub fn available_networks(&self) -> Vec<String> {
        let mut names: Vec<String> = self.networks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up a network, falling back to `default_network`
    pub fn network(&self, name: Option<&str>) -> Result<&NetworkConfig> {
        let name = name.unwrap_or(&self.default_network);
        utils::validate_network(name, &self.available_networks())?;
        self.networks
            .get(name)
            .ok_or_else(|| anyhow!("Network '{}' not configured", name))
    }

    pub fn network_mut(&mut self, name: Option<&str>) -> Result<&mut NetworkConfig> {
        let name = name.unwrap_or(&self.default_network).to_string();
        utils::validate_network(&name, &self.available_networks())?;
        self.networks
            .get_mut(&name)
            .ok_or_else(|| anyhow!("Network '{}' not configured", name))
    }

    /// Get default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("delegation-inspector").join("config.toml"))
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let sample_config = r#"# Delegation Inspector Configuration File

# Network used when --network is not given
default_network = "holesky"

[networks.holesky]
rpc_url = "https://ethereum-holesky.publicnode.com"
chain_id = 17000
explorer_url = "https://holesky.etherscan.io"

[networks.holesky.contracts]
delegation_manager = "0xA44151489861Fe9e3055d95adC98FbD462B948e7"
# Raw storage cross-check target; remove to skip the check
strategy_manager = "0xdfB5f6CE42aAA7830E94ECFCcAd411beF4d4D5b6"
abi_dir = "abis"
delegation_manager_abi = "DelegationManager.json"
strategy_abi = "StrategyBase.json"

[networks.mainnet]
rpc_url = "https://eth-mainnet.g.alchemy.com/v2/YOUR_API_KEY_HERE"
chain_id = 1
explorer_url = "https://etherscan.io"

[networks.mainnet.contracts]
delegation_manager = "0x39053D51B77DC0d36036Fc1fCc8Cb819df8Ef37A"
abi_dir = "abis"

[query]
stakers = ["0x6cdA20abb7A5361c7052C91b1ABa79AF1819A94A"]
storage_check = true

# Environment variables that can be used:
# ALCHEMY_API_KEY - Your Alchemy API key (replaces YOUR_API_KEY_HERE above)
# RUST_LOG - Log filter, e.g. RUST_LOG=debug to trace every eth_call
"#;
        sample_config.to_string()
    }
}
