pub mod args;
pub mod chains;
pub mod config;
pub mod deploy;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::registry::{ChainEntry, ChainRegistry};
use crate::resolver::DeploymentTable;

/// Build the registry and deployment table from `--registry`, the config
/// file's registry path, or the built-in tables, in that order.
pub fn load_tables(cli: &Cli, config: &Config) -> Result<(ChainRegistry, DeploymentTable)> {
	let Some(path) = cli.registry.as_ref().or(config.deploy.registry.as_ref()) else {
		return Ok((ChainRegistry::builtin(), DeploymentTable::builtin()));
	};

	let content = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read registry file {}", path.display()))?;
	let registry = ChainRegistry::from_toml_str(&content)
		.with_context(|| format!("invalid registry file {}", path.display()))?;
	let table = DeploymentTable::from_toml_str(&content)
		.with_context(|| format!("invalid deployment table in {}", path.display()))?;
	Ok((registry, table))
}

/// Resolve the RPC URL from the CLI flag, or from config under the
/// selected network label or any label of its registry entry.
pub fn resolve_rpc(cli: &Cli, config: &Config, network: &str, entry: &ChainEntry) -> Result<String> {
	if let Some(url) = &cli.rpc_url {
		return Ok(url.clone());
	}
	config
		.rpc_url(std::iter::once(network).chain(entry.labels()))
		.map(str::to_owned)
		.ok_or_else(|| {
			anyhow::anyhow!(
				"No RPC URL for {network}. Pass --rpc-url or add [networks.{network}] to the config"
			)
		})
}
