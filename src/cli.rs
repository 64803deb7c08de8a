use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::address::{self, Address};
use crate::resolver::Contract;

#[derive(Parser)]
#[command(
	name = "lz-deploy",
	about = "Resolve LayerZero endpoints and deploy cross-chain contracts.",
	version
)]
pub struct Cli {
	/// Target network (registry name or Hardhat network name).
	#[arg(long, env = "LZ_DEPLOY_NETWORK", global = true)]
	pub network: Option<String>,

	/// Expected EVM chain id of the target network.  A node reporting a
	/// different id is refused.
	#[arg(long, global = true)]
	pub chain_id: Option<u64>,

	/// Override RPC endpoint URL.
	#[arg(long, env = "LZ_DEPLOY_RPC_URL", global = true)]
	pub rpc_url: Option<String>,

	/// Chain registry file to use instead of the built-in table.
	#[arg(long, global = true)]
	pub registry: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

impl Cli {
	pub fn network(&self) -> anyhow::Result<&str> {
		self.network.as_deref().ok_or_else(|| {
			anyhow::anyhow!("No network selected. Pass --network <name> or set LZ_DEPLOY_NETWORK")
		})
	}
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ContractArg {
	GasStation,
	OmniGraph,
}

impl From<ContractArg> for Contract {
	fn from(arg: ContractArg) -> Self {
		match arg {
			ContractArg::GasStation => Contract::GasStation,
			ContractArg::OmniGraph => Contract::OmniGraph,
		}
	}
}

#[derive(Subcommand)]
pub enum Command {
	/// Deploy a contract to the selected network.
	Deploy {
		/// Contract to deploy.
		contract: ContractArg,

		/// Account the node deploys from.
		#[arg(long, value_parser = address::parse)]
		from: Option<Address>,
	},

	/// Print the constructor arguments for the selected network.
	Args {
		/// Contract to resolve arguments for.
		contract: ContractArg,
	},

	/// Inspect the chain registry.
	Chains {
		#[command(subcommand)]
		command: ChainsCommand,
	},

	/// Inspect or create the config file.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
}

// -- Chains subcommands --

#[derive(Subcommand)]
pub enum ChainsCommand {
	/// List every chain in the registry.
	List,

	/// Show one chain by name, alias or chain id.
	Show {
		/// Name, alias, or numeric chain id.
		network: String,
	},

	/// Print the registry in registry-file format.
	Export,
}

// -- Config subcommands --

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Print the effective configuration.
	Show,

	/// Write the default configuration to ~/.lz-deploy/config.toml.
	Init {
		/// Overwrite an existing file.
		#[arg(long)]
		force: bool,
	},
}
