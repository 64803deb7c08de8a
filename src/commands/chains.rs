use anyhow::Result;

use crate::cli::{ChainsCommand, Cli};
use crate::commands::load_tables;
use crate::config::Config;
use crate::registry::{ChainEntry, ChainRegistry};
use crate::resolver::DeploymentTable;

pub fn run(cli: &Cli, cmd: &ChainsCommand) -> Result<()> {
	let config = Config::load()?;
	let (registry, table) = load_tables(cli, &config)?;
	dispatch(&registry, &table, cmd)
}

/// Every subcommand sees only tables a deployment would accept.
fn dispatch(registry: &ChainRegistry, table: &DeploymentTable, cmd: &ChainsCommand) -> Result<()> {
	table.validate(registry)?;

	match cmd {
		ChainsCommand::List => list(registry, table),
		ChainsCommand::Show { network } => show(registry, network),
		ChainsCommand::Export => export(registry, table),
	}
}

fn list(registry: &ChainRegistry, table: &DeploymentTable) -> Result<()> {
	println!(
		"{:<18} {:>9} {:>7}  {:<42}  {}",
		"NAME", "CHAIN ID", "LZ ID", "ENDPOINT", "OMNIGRAPH"
	);
	for e in registry.entries() {
		let range = table
			.omni_graph
			.range_for(e.chain_id)
			.map(|r| format!("{}..={}", r.min, r.max))
			.unwrap_or_else(|| "-".into());
		println!(
			"{:<18} {:>9} {:>7}  {:<42}  {}",
			e.name,
			e.chain_id,
			e.lz_chain_id,
			e.lz_endpoint.to_checksum(None),
			range
		);
	}
	println!("\n{} chain(s).", registry.len());
	Ok(())
}

fn show(registry: &ChainRegistry, network: &str) -> Result<()> {
	let entry = find(registry, network)?;
	println!("Chain");
	println!("  Name:        {}", entry.name);
	println!("  Chain ID:    {}", entry.chain_id);
	println!("  LZ chain ID: {}", entry.lz_chain_id);
	println!("  Endpoint:    {}", entry.lz_endpoint.to_checksum(None));
	if !entry.aliases.is_empty() {
		println!("  Aliases:     {}", entry.aliases.join(", "));
	}
	Ok(())
}

/// A numeric argument is a chain id; anything else is a name or alias.
fn find<'a>(registry: &'a ChainRegistry, network: &str) -> Result<&'a ChainEntry> {
	let entry = match network.parse::<u64>() {
		Ok(chain_id) => registry.find_by_chain_id(chain_id)?,
		Err(_) => registry.find_by_name(network)?,
	};
	Ok(entry)
}

fn export(registry: &ChainRegistry, table: &DeploymentTable) -> Result<()> {
	print!("{}", registry.to_toml_string()?);
	println!();
	print!("{}", toml::to_string_pretty(table)?);
	Ok(())
}
