pub mod rpc;

use thiserror::Error;

use crate::address::Address;
use crate::artifact::ArtifactError;
use crate::resolver::{ConstructorArgs, Contract};
use crate::rpc::RpcError;

pub use rpc::RpcDeployer;

/// Deploys a contract and waits until its address is known.
///
/// A failed deployment is final for the run: implementations must not
/// retry, and callers propagate the error unchanged.
#[async_trait::async_trait]
pub trait Deployer: Send + Sync {
	async fn deploy(&self, contract: Contract, args: &ConstructorArgs) -> Result<Address, DeployError>;
}

#[derive(Debug, Error)]
pub enum DeployError {
	#[error("deployment of {contract} failed: {reason}")]
	DeploymentFailure { contract: Contract, reason: String },
	#[error("node has no account to deploy from; pass --from or unlock an account")]
	NoAccount,
	#[error(transparent)]
	Artifact(#[from] ArtifactError),
	#[error(transparent)]
	Rpc(#[from] RpcError),
}
