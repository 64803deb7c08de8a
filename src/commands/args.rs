use anyhow::Result;

use crate::cli::Cli;
use crate::commands::load_tables;
use crate::config::Config;
use crate::deploy::verify_command;
use crate::registry::NetworkIdentity;
use crate::resolver::{Contract, Resolution, Resolver};

/// Print the constructor tuple a deployment would use, without deploying.
pub fn run(cli: &Cli, contract: Contract) -> Result<()> {
	let config = Config::load()?;
	let network = cli.network()?;
	let (registry, table) = load_tables(cli, &config)?;
	let resolver = Resolver::new(&registry, &table)?;

	let identity = NetworkIdentity::new(network, cli.chain_id);
	let Resolution { entry, args } = resolver.resolution(contract, &identity)?;

	println!("Contract: {contract}");
	println!(
		"Network:  {} (chain id {}, LayerZero id {})",
		entry.name, entry.chain_id, entry.lz_chain_id
	);
	println!("Arguments:");
	for (i, value) in args.values().iter().enumerate() {
		println!("  [{i}] {value}");
	}
	println!("Verify:   {}", verify_command(network, &"<address>", &args));
	Ok(())
}
