use anyhow::Result;
use clap::Parser;

use lz_deploy::cli::{Cli, Command};
use lz_deploy::commands;

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt().with_writer(std::io::stderr).init();

	let cli = Cli::parse();

	match &cli.command {
		Command::Deploy { contract, from } => {
			commands::deploy::run(&cli, (*contract).into(), *from).await
		}
		Command::Args { contract } => commands::args::run(&cli, (*contract).into()),
		Command::Chains { command } => commands::chains::run(&cli, command),
		Command::Config { command } => commands::config::run(command),
	}
}
