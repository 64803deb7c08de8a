use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{DeployError, Deployer};
use crate::address::Address;
use crate::artifact::Artifact;
use crate::resolver::{ConstructorArgs, Contract};
use crate::rpc::RpcClient;

/// Deploys through a node that holds the deployer key (Hardhat node,
/// anvil, or a node with an unlocked account), so no private key is
/// handled locally.
pub struct RpcDeployer {
	rpc: RpcClient,
	artifacts_dir: PathBuf,
	from: Option<Address>,
	poll_interval: Duration,
}

impl RpcDeployer {
	pub fn new(rpc: RpcClient, artifacts_dir: PathBuf) -> Self {
		Self {
			rpc,
			artifacts_dir,
			from: None,
			poll_interval: Duration::from_secs(2),
		}
	}

	/// Deploy from this account instead of the node's first account.
	pub fn with_from(mut self, from: Option<Address>) -> Self {
		self.from = from;
		self
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	async fn sender(&self) -> Result<Address, DeployError> {
		if let Some(from) = self.from {
			return Ok(from);
		}
		let accounts = self.rpc.accounts().await?;
		accounts.first().copied().ok_or(DeployError::NoAccount)
	}
}

#[async_trait::async_trait]
impl Deployer for RpcDeployer {
	async fn deploy(&self, contract: Contract, args: &ConstructorArgs) -> Result<Address, DeployError> {
		let artifact = Artifact::load(&self.artifacts_dir, contract.name())?;
		let code = artifact.creation_code(args)?;
		let from = self.sender().await?;

		let tx_hash = self.rpc.send_transaction(from, &code).await?;
		info!(%contract, %from, tx = %tx_hash, "deployment transaction submitted");

		// No timeout: wait until the node mines the transaction.
		let receipt = loop {
			match self.rpc.transaction_receipt(&tx_hash).await? {
				Some(receipt) => break receipt,
				None => {
					debug!(tx = %tx_hash, "receipt not available yet");
					tokio::time::sleep(self.poll_interval).await;
				}
			}
		};

		if !receipt.succeeded() {
			warn!(%contract, tx = %tx_hash, status = ?receipt.status, "deployment reverted");
			return Err(DeployError::DeploymentFailure {
				contract,
				reason: format!("transaction {tx_hash} reverted"),
			});
		}

		let address = receipt.contract_address.ok_or_else(|| DeployError::DeploymentFailure {
			contract,
			reason: format!("receipt for {tx_hash} has no contract address"),
		})?;
		info!(%contract, %address, block = ?receipt.block_number, "contract deployed");
		Ok(address)
	}
}
