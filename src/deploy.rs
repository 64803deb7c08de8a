//! One deployment run: resolve the constructor arguments for the target
//! network, then hand them to the deployer exactly once.

use std::fmt::Display;

use thiserror::Error;
use tracing::info;

use crate::address::Address;
use crate::deployer::{DeployError, Deployer};
use crate::registry::NetworkIdentity;
use crate::resolver::{ConstructorArgs, Contract, ResolveError, Resolver};

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error(transparent)]
	Deploy(#[from] DeployError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReport {
	pub network: String,
	pub contract: Contract,
	pub address: Address,
	pub args: ConstructorArgs,
}

impl DeploymentReport {
	pub fn verify_command(&self) -> String {
		verify_command(&self.network, &self.address.to_checksum(None), &self.args)
	}
}

/// The Hardhat command that verifies a deployment on the block explorer.
pub fn verify_command(network: &str, address: &dyn Display, args: &ConstructorArgs) -> String {
	let mut cmd = format!("npx hardhat verify --network {network} {address}");
	for value in args.values() {
		cmd.push(' ');
		cmd.push_str(&value.to_string());
	}
	cmd
}

/// Resolve, then deploy.  Resolution failures return before the deployer
/// is touched.
pub async fn run<D: Deployer + ?Sized>(
	resolver: &Resolver<'_>,
	deployer: &D,
	contract: Contract,
	identity: &NetworkIdentity,
) -> Result<DeploymentReport, Error> {
	let args = resolver.resolve_identity(contract, identity)?;
	info!(%contract, network = %identity.name, args = %args, "deploying");

	let address = deployer.deploy(contract, &args).await?;

	Ok(DeploymentReport {
		network: identity.name.clone(),
		contract,
		address,
		args,
	})
}
