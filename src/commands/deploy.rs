use std::time::Duration;

use anyhow::Result;

use crate::address::Address;
use crate::cli::Cli;
use crate::commands::{load_tables, resolve_rpc};
use crate::config::Config;
use crate::deploy::{self, DeploymentReport};
use crate::deployer::RpcDeployer;
use crate::registry::{NetworkIdentity, RegistryError};
use crate::resolver::{Contract, Resolution, Resolver};
use crate::rpc::RpcClient;

pub async fn run(cli: &Cli, contract: Contract, from: Option<Address>) -> Result<()> {
	let config = Config::load()?;
	let report = execute(cli, &config, contract, from).await?;

	println!(
		"{} deployed on {} to {}",
		report.contract,
		report.network,
		report.address.to_checksum(None)
	);
	println!("To verify contract run: {}", report.verify_command());
	Ok(())
}

/// Resolve the arguments, confirm the node is on the expected chain, then
/// deploy.  Nothing reaches the node until the network is known to
/// support the contract.
pub async fn execute(
	cli: &Cli,
	config: &Config,
	contract: Contract,
	from: Option<Address>,
) -> Result<DeploymentReport> {
	let network = cli.network()?;
	let (registry, table) = load_tables(cli, config)?;
	let resolver = Resolver::new(&registry, &table)?;

	let Resolution { entry, .. } =
		resolver.resolution(contract, &NetworkIdentity::new(network, cli.chain_id))?;

	let rpc = RpcClient::new(&resolve_rpc(cli, config, network, entry)?);
	let chain_id = rpc.chain_id().await?;
	if let Some(expected) = cli.chain_id {
		if chain_id != expected {
			return Err(RegistryError::IdentityMismatch {
				name: network.to_owned(),
				chain_id,
				expected,
			}
			.into());
		}
	}
	let identity = NetworkIdentity::new(network, Some(chain_id));

	let deployer = RpcDeployer::new(rpc, config.deploy.artifacts_dir.clone())
		.with_from(from.or(config.deploy.from))
		.with_poll_interval(Duration::from_millis(config.deploy.poll_interval_ms));

	Ok(deploy::run(&resolver, &deployer, contract, &identity).await?)
}
