use anyhow::Result;

use crate::cli::ConfigCommand;
use crate::config::Config;

pub fn run(cmd: &ConfigCommand) -> Result<()> {
	match cmd {
		ConfigCommand::Show => show(),
		ConfigCommand::Init { force } => init(*force),
	}
}

fn show() -> Result<()> {
	let path = Config::path()?;
	let config = Config::load_from(&path)?;
	let source = if path.exists() { "" } else { " (not found, using defaults)" };
	println!("# {}{source}", path.display());
	print!("{}", toml::to_string_pretty(&config)?);
	Ok(())
}

fn init(force: bool) -> Result<()> {
	let path = Config::path()?;
	if path.exists() && !force {
		anyhow::bail!("{} already exists. Pass --force to overwrite", path.display());
	}
	Config::default().save_to(&path)?;
	println!("Config written to {}", path.display());
	Ok(())
}
