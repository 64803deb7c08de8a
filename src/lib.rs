pub mod address;
pub mod artifact;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod deployer;
pub mod registry;
pub mod resolver;
pub mod rpc;
