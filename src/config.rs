use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::address::{self, Address};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
	/// RPC endpoints keyed by network label (Hardhat network name or registry name).
	#[serde(default)]
	pub networks: BTreeMap<String, NetworkConfig>,
	#[serde(default)]
	pub deploy: DeployConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
	pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
	/// Hardhat artifacts directory.
	pub artifacts_dir: PathBuf,
	/// How often to poll for the deployment receipt.
	pub poll_interval_ms: u64,
	/// Account the node should deploy from.  Defaults to its first account.
	#[serde(
		default,
		with = "address::checksummed_opt",
		skip_serializing_if = "Option::is_none"
	)]
	pub from: Option<Address>,
	/// Chain registry file replacing the built-in table.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub registry: Option<PathBuf>,
}

impl Default for DeployConfig {
	fn default() -> Self {
		Self {
			artifacts_dir: PathBuf::from("artifacts"),
			poll_interval_ms: 2_000,
			from: None,
			registry: None,
		}
	}
}

const DEFAULT_RPC_URLS: &[(&str, &str)] = &[
	("avalancheFujiTestnet", "https://api.avax-test.network/ext/bc/C/rpc"),
	("optimisticGoerli", "https://optimism-goerli.publicnode.com"),
	("arbitrumGoerli", "https://arbitrum-goerli.public.blastapi.io"),
	("arbitrumOne", "https://arbitrum.llamarpc.com"),
	("optimisticEthereum", "https://mainnet.optimism.io"),
];

impl Default for Config {
	fn default() -> Self {
		Self {
			networks: DEFAULT_RPC_URLS
				.iter()
				.map(|(name, url)| {
					(
						(*name).to_owned(),
						NetworkConfig {
							rpc_url: (*url).to_owned(),
						},
					)
				})
				.collect(),
			deploy: DeployConfig::default(),
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.lz-deploy/).
	pub fn dir() -> anyhow::Result<PathBuf> {
		let home = dirs::home_dir().context("could not determine home directory")?;
		Ok(home.join(".lz-deploy"))
	}

	/// Path to the config file.
	pub fn path() -> anyhow::Result<PathBuf> {
		Ok(Self::dir()?.join("config.toml"))
	}

	/// Load config from disk, falling back to defaults if no file exists.
	pub fn load() -> anyhow::Result<Self> {
		Self::load_from(&Self::path()?)
	}

	pub fn load_from(path: &Path) -> anyhow::Result<Self> {
		if path.exists() {
			let content = std::fs::read_to_string(path)
				.with_context(|| format!("failed to read {}", path.display()))?;
			toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
		} else {
			Ok(Self::default())
		}
	}

	/// Persist the config, creating the directory if needed.
	pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, toml::to_string_pretty(self)?)?;
		Ok(())
	}

	/// First configured RPC URL among the given labels, matched
	/// case-insensitively.
	pub fn rpc_url<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Option<&str> {
		labels.into_iter().find_map(|label| {
			self.networks
				.iter()
				.find(|(name, _)| name.eq_ignore_ascii_case(label))
				.map(|(_, net)| net.rpc_url.as_str())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sensible() {
		let c = Config::default();
		assert_eq!(c.networks.len(), 5);
		assert_eq!(c.deploy.artifacts_dir, PathBuf::from("artifacts"));
		assert_eq!(c.deploy.poll_interval_ms, 2_000);
		assert!(c.deploy.from.is_none());
		assert!(c.deploy.registry.is_none());
	}

	#[test]
	fn toml_roundtrip() {
		let mut c = Config::default();
		c.deploy.from = Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap());
		c.deploy.registry = Some(PathBuf::from("chains.toml"));

		let serialized = toml::to_string_pretty(&c).unwrap();
		let parsed: Config = toml::from_str(&serialized).unwrap();

		assert_eq!(parsed, c);
	}

	#[test]
	fn partial_file_fills_in_defaults() {
		let parsed: Config = toml::from_str(
			r#"
			[networks.localhost]
			rpc_url = "http://127.0.0.1:8545"

			[deploy]
			poll_interval_ms = 250
			"#,
		)
		.unwrap();
		assert_eq!(parsed.networks.len(), 1);
		assert_eq!(parsed.deploy.poll_interval_ms, 250);
		assert_eq!(parsed.deploy.artifacts_dir, PathBuf::from("artifacts"));
	}

	#[test]
	fn rpc_url_selection() {
		let c = Config::default();
		assert_eq!(
			c.rpc_url(["Fuji", "avalanchefujitestnet"]),
			Some("https://api.avax-test.network/ext/bc/C/rpc")
		);
		assert_eq!(c.rpc_url(["Optimism", "optimisticEthereum"]), Some("https://mainnet.optimism.io"));
		// No silent fallback to some other network.
		assert_eq!(c.rpc_url(["Mumbai", "polygonMumbai"]), None);
	}

	#[test]
	fn from_must_carry_a_valid_checksum() {
		let bad = toml::from_str::<Config>(
			r#"
			[deploy]
			from = "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
			"#,
		);
		assert!(bad.is_err());
	}

	#[test]
	fn missing_file_loads_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let c = Config::load_from(&dir.path().join("config.toml")).unwrap();
		assert_eq!(c, Config::default());
	}

	#[test]
	fn save_then_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("config.toml");
		let mut c = Config::default();
		c.deploy.poll_interval_ms = 500;
		c.save_to(&path).unwrap();
		assert_eq!(Config::load_from(&path).unwrap(), c);
	}
}
