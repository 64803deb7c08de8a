//! Constructor arguments for the LayerZero-aware contracts, projected from
//! the chain registry.
//!
//! Endpoint addresses always come from the [`ChainRegistry`] record.  The
//! only per-contract data kept here are the values the registry cannot
//! supply: the OmniGraph gas limit and the destination id range each
//! OmniGraph deployment owns.

use std::fmt;

use alloy_primitives::U256;
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::address::Address;
use crate::registry::{ChainEntry, ChainRegistry, LzChainId, NetworkIdentity, RegistryError};

/// Gas limit OmniGraph forwards with each cross-chain message.
pub const DEFAULT_OMNI_GRAPH_GAS_LIMIT: u64 = 150_000;

/// Contracts this tool knows how to deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contract {
	/// Messaging relay; takes only the endpoint.
	GasStation,
	/// Cross-chain graph; takes gas limit, endpoint and destination range.
	OmniGraph,
}

impl Contract {
	pub const ALL: [Contract; 2] = [Contract::GasStation, Contract::OmniGraph];

	/// Solidity contract name, also used to locate the build artifact.
	pub fn name(&self) -> &'static str {
		match self {
			Contract::GasStation => "GasStation",
			Contract::OmniGraph => "OmniGraph",
		}
	}

	/// Number of constructor arguments.
	pub fn arity(&self) -> usize {
		match self {
			Contract::GasStation => 1,
			Contract::OmniGraph => 4,
		}
	}
}

impl fmt::Display for Contract {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A single constructor argument, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValue {
	Uint(U256),
	Address(Address),
}

impl fmt::Display for ArgValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ArgValue::Uint(v) => write!(f, "{v}"),
			ArgValue::Address(a) => f.write_str(&a.to_checksum(None)),
		}
	}
}

/// The ordered constructor tuple for one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArgs {
	GasStation {
		endpoint: Address,
	},
	OmniGraph {
		gas_limit: u64,
		endpoint: Address,
		min_dst_id: LzChainId,
		max_dst_id: LzChainId,
	},
}

impl ConstructorArgs {
	pub fn contract(&self) -> Contract {
		match self {
			ConstructorArgs::GasStation { .. } => Contract::GasStation,
			ConstructorArgs::OmniGraph { .. } => Contract::OmniGraph,
		}
	}

	pub fn endpoint(&self) -> Address {
		match self {
			ConstructorArgs::GasStation { endpoint } | ConstructorArgs::OmniGraph { endpoint, .. } => {
				*endpoint
			}
		}
	}

	/// Arguments in constructor order.
	pub fn values(&self) -> Vec<ArgValue> {
		match *self {
			ConstructorArgs::GasStation { endpoint } => vec![ArgValue::Address(endpoint)],
			ConstructorArgs::OmniGraph {
				gas_limit,
				endpoint,
				min_dst_id,
				max_dst_id,
			} => vec![
				ArgValue::Uint(U256::from(gas_limit)),
				ArgValue::Address(endpoint),
				ArgValue::Uint(U256::from(min_dst_id)),
				ArgValue::Uint(U256::from(max_dst_id)),
			],
		}
	}

	/// ABI-encoded constructor parameters, appended to the creation bytecode.
	pub fn abi_encode(&self) -> Vec<u8> {
		match *self {
			ConstructorArgs::GasStation { endpoint } => endpoint.abi_encode(),
			ConstructorArgs::OmniGraph {
				gas_limit,
				endpoint,
				min_dst_id,
				max_dst_id,
			} => (
				U256::from(gas_limit),
				endpoint,
				U256::from(min_dst_id),
				U256::from(max_dst_id),
			)
				.abi_encode_params(),
		}
	}

	pub fn arity(&self) -> usize {
		self.values().len()
	}
}

impl fmt::Display for ConstructorArgs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self.values().iter().map(ToString::to_string).collect();
		write!(f, "({})", parts.join(", "))
	}
}

/// Inclusive range of destination ids owned by one OmniGraph deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstRange {
	pub chain_id: u64,
	pub min: LzChainId,
	pub max: LzChainId,
}

impl DstRange {
	fn overlaps(&self, other: &DstRange) -> bool {
		self.min <= other.max && other.min <= self.max
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmniGraphProfile {
	#[serde(default = "default_gas_limit")]
	pub gas_limit: u64,
	#[serde(rename = "range", default)]
	pub ranges: Vec<DstRange>,
}

fn default_gas_limit() -> u64 {
	DEFAULT_OMNI_GRAPH_GAS_LIMIT
}

impl Default for OmniGraphProfile {
	fn default() -> Self {
		Self {
			gas_limit: DEFAULT_OMNI_GRAPH_GAS_LIMIT,
			ranges: Vec::new(),
		}
	}
}

impl OmniGraphProfile {
	pub fn range_for(&self, chain_id: u64) -> Option<&DstRange> {
		self.ranges.iter().find(|r| r.chain_id == chain_id)
	}
}

/// Per-contract deployment constants, keyed by EVM chain id.
///
/// Read from the `[omni_graph]` table of a registry file; a file without
/// that table supports OmniGraph nowhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTable {
	#[serde(default)]
	pub omni_graph: OmniGraphProfile,
}

#[derive(Debug, Error)]
pub enum TableError {
	#[error("destination range {min}..={max} for chain {chain_id} is empty")]
	InvertedRange {
		chain_id: u64,
		min: LzChainId,
		max: LzChainId,
	},
	#[error("chain {0} has more than one destination range")]
	DuplicateRange(u64),
	#[error("destination ranges of chains {first} and {second} overlap")]
	OverlappingRanges { first: u64, second: u64 },
	#[error("destination range refers to chain {0}, which is not in the registry")]
	UnknownChain(u64),
	#[error("failed to parse deployment table: {0}")]
	Parse(#[from] toml::de::Error),
}

impl DeploymentTable {
	pub fn builtin() -> Self {
		Self {
			omni_graph: OmniGraphProfile {
				gas_limit: DEFAULT_OMNI_GRAPH_GAS_LIMIT,
				ranges: vec![
					// Fuji
					DstRange {
						chain_id: 43113,
						min: 1,
						max: 99,
					},
					// Mumbai
					DstRange {
						chain_id: 80001,
						min: 100,
						max: 199,
					},
				],
			},
		}
	}

	pub fn from_toml_str(content: &str) -> Result<Self, TableError> {
		Ok(toml::from_str(content)?)
	}

	/// Ranges must be non-empty, pairwise disjoint, one per chain, and
	/// only name chains the registry knows.
	pub fn validate(&self, registry: &ChainRegistry) -> Result<(), TableError> {
		let ranges = &self.omni_graph.ranges;
		for (i, range) in ranges.iter().enumerate() {
			if range.min > range.max {
				return Err(TableError::InvertedRange {
					chain_id: range.chain_id,
					min: range.min,
					max: range.max,
				});
			}
			if registry.find_by_chain_id(range.chain_id).is_err() {
				return Err(TableError::UnknownChain(range.chain_id));
			}
			for other in &ranges[..i] {
				if other.chain_id == range.chain_id {
					return Err(TableError::DuplicateRange(range.chain_id));
				}
				if other.overlaps(range) {
					return Err(TableError::OverlappingRanges {
						first: other.chain_id,
						second: range.chain_id,
					});
				}
			}
		}
		Ok(())
	}
}

#[derive(Debug, Error)]
pub enum ResolveError {
	#[error("{contract} has no deployment arguments for network {network:?}")]
	UnsupportedNetwork { contract: Contract, network: String },
	#[error(transparent)]
	Registry(RegistryError),
}

/// A located chain together with the arguments resolved for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
	pub entry: &'a ChainEntry,
	pub args: ConstructorArgs,
}

/// Maps a network to the constructor arguments of a contract.
pub struct Resolver<'a> {
	registry: &'a ChainRegistry,
	table: &'a DeploymentTable,
}

impl<'a> Resolver<'a> {
	/// Pair a registry with its deployment table, checking they agree.
	pub fn new(registry: &'a ChainRegistry, table: &'a DeploymentTable) -> Result<Self, TableError> {
		table.validate(registry)?;
		Ok(Self { registry, table })
	}

	pub fn registry(&self) -> &'a ChainRegistry {
		self.registry
	}

	/// Resolve by network name (or alias).  Networks outside the contract's
	/// enumeration fail with `UnsupportedNetwork`.
	pub fn resolve(&self, contract: Contract, network: &str) -> Result<ConstructorArgs, ResolveError> {
		self.resolution(contract, &NetworkIdentity::new(network, None))
			.map(|r| r.args)
	}

	/// Like [`Resolver::resolve`], but also rejects a chain id that
	/// disagrees with the registry record for the name.
	pub fn resolve_identity(
		&self,
		contract: Contract,
		identity: &NetworkIdentity,
	) -> Result<ConstructorArgs, ResolveError> {
		self.resolution(contract, identity).map(|r| r.args)
	}

	/// Locate the identity's entry once and project the contract's
	/// arguments from it.
	pub fn resolution(
		&self,
		contract: Contract,
		identity: &NetworkIdentity,
	) -> Result<Resolution<'a>, ResolveError> {
		let entry = match self.registry.locate(identity) {
			Ok(entry) => entry,
			Err(RegistryError::NotFound(_)) => return Err(unsupported(contract, &identity.name)),
			Err(e) => return Err(ResolveError::Registry(e)),
		};
		let args = self.project(contract, entry, &identity.name)?;
		Ok(Resolution { entry, args })
	}

	/// Registry entries the contract can be deployed to.
	pub fn supported_networks(&self, contract: Contract) -> Vec<&'a ChainEntry> {
		self.registry
			.entries()
			.filter(|e| self.project(contract, e, &e.name).is_ok())
			.collect()
	}

	fn project(
		&self,
		contract: Contract,
		entry: &ChainEntry,
		network: &str,
	) -> Result<ConstructorArgs, ResolveError> {
		let args = match contract {
			Contract::GasStation => ConstructorArgs::GasStation {
				endpoint: entry.lz_endpoint,
			},
			Contract::OmniGraph => {
				let profile = &self.table.omni_graph;
				let range = profile
					.range_for(entry.chain_id)
					.ok_or_else(|| unsupported(contract, network))?;
				ConstructorArgs::OmniGraph {
					gas_limit: profile.gas_limit,
					endpoint: entry.lz_endpoint,
					min_dst_id: range.min,
					max_dst_id: range.max,
				}
			}
		};
		debug!(%contract, network, chain = %entry.name, args = %args, "resolved constructor arguments");
		Ok(args)
	}
}

fn unsupported(contract: Contract, network: &str) -> ResolveError {
	ResolveError::UnsupportedNetwork {
		contract,
		network: network.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(s: &str) -> Address {
		s.parse().unwrap()
	}

	#[test]
	fn omni_graph_on_fuji() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		let args = resolver.resolve(Contract::OmniGraph, "fuji").unwrap();
		assert_eq!(
			args,
			ConstructorArgs::OmniGraph {
				gas_limit: 150_000,
				endpoint: addr("0x93f54D755A063cE7bB9e6Ac47Eccc8e33411d706"),
				min_dst_id: 1,
				max_dst_id: 99,
			}
		);
		assert_eq!(
			args.values(),
			vec![
				ArgValue::Uint(U256::from(150_000)),
				ArgValue::Address(addr("0x93f54D755A063cE7bB9e6Ac47Eccc8e33411d706")),
				ArgValue::Uint(U256::from(1)),
				ArgValue::Uint(U256::from(99)),
			]
		);
	}

	#[test]
	fn omni_graph_fuji_encoding() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();
		let args = resolver.resolve(Contract::OmniGraph, "fuji").unwrap();

		assert_eq!(
			hex::encode(args.abi_encode()),
			concat!(
				"00000000000000000000000000000000000000000000000000000000000249f0",
				"00000000000000000000000093f54d755a063ce7bb9e6ac47eccc8e33411d706",
				"0000000000000000000000000000000000000000000000000000000000000001",
				"0000000000000000000000000000000000000000000000000000000000000063",
			)
		);
	}

	#[test]
	fn gas_station_encodes_one_padded_word() {
		let endpoint = addr("0x6aB5Ae6822647046626e83ee6dB8187151E1d5ab");
		let encoded = ConstructorArgs::GasStation { endpoint }.abi_encode();
		assert_eq!(
			hex::encode(encoded),
			"0000000000000000000000006ab5ae6822647046626e83ee6db8187151e1d5ab"
		);
	}

	#[test]
	fn resolution_returns_the_located_entry() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		let r = resolver
			.resolution(Contract::OmniGraph, &NetworkIdentity::new("polygonMumbai", Some(80001)))
			.unwrap();
		assert_eq!(r.entry, registry.find_by_chain_id(80001).unwrap());
		assert_eq!(r.args.endpoint(), r.entry.lz_endpoint);
		assert!(std::ptr::eq(r.entry, registry.find_by_name("Mumbai").unwrap()));
	}

	#[test]
	fn omni_graph_on_mumbai() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		let args = resolver.resolve(Contract::OmniGraph, "mumbai").unwrap();
		assert_eq!(
			args.to_string(),
			"(150000, 0xf69186dfBa60DdB133E91E9A4B5673624293d8F8, 100, 199)"
		);
	}

	#[test]
	fn arity_matches_contract() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		for contract in Contract::ALL {
			for entry in resolver.supported_networks(contract) {
				let args = resolver.resolve(contract, &entry.name).unwrap();
				assert_eq!(args.arity(), contract.arity());
				assert_eq!(args.contract(), contract);
			}
		}
	}

	#[test]
	fn gas_station_uses_registry_endpoint_everywhere() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		assert_eq!(resolver.supported_networks(Contract::GasStation).len(), registry.len());
		for entry in registry.entries() {
			let args = resolver.resolve(Contract::GasStation, &entry.name).unwrap();
			assert_eq!(
				args,
				ConstructorArgs::GasStation {
					endpoint: entry.lz_endpoint
				}
			);
		}
	}

	#[test]
	fn unsupported_networks_fail() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		// In the registry, but OmniGraph has no range there.
		assert!(matches!(
			resolver.resolve(Contract::OmniGraph, "goerli"),
			Err(ResolveError::UnsupportedNetwork { contract: Contract::OmniGraph, .. })
		));
		// Not in the registry at all.
		for contract in Contract::ALL {
			assert!(matches!(
				resolver.resolve(contract, "hardhat"),
				Err(ResolveError::UnsupportedNetwork { .. })
			));
		}
	}

	#[test]
	fn omni_graph_support_is_fuji_and_mumbai() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		let names: Vec<_> = resolver
			.supported_networks(Contract::OmniGraph)
			.into_iter()
			.map(|e| e.name.as_str())
			.collect();
		assert_eq!(names, ["Fuji", "Mumbai"]);
	}

	#[test]
	fn resolve_identity_rejects_chain_id_drift() {
		let registry = ChainRegistry::builtin();
		let table = DeploymentTable::builtin();
		let resolver = Resolver::new(&registry, &table).unwrap();

		let ok = resolver
			.resolve_identity(Contract::OmniGraph, &NetworkIdentity::new("mumbai", Some(80001)))
			.unwrap();
		assert_eq!(ok.endpoint(), registry.find_by_chain_id(80001).unwrap().lz_endpoint);

		assert!(matches!(
			resolver.resolve_identity(Contract::OmniGraph, &NetworkIdentity::new("mumbai", Some(43113))),
			Err(ResolveError::Registry(RegistryError::IdentityMismatch { .. }))
		));
		assert!(matches!(
			resolver.resolve_identity(Contract::GasStation, &NetworkIdentity::new("sepolia", Some(11155111))),
			Err(ResolveError::UnsupportedNetwork { .. })
		));
	}

	#[test]
	fn overlapping_ranges_are_rejected() {
		let registry = ChainRegistry::builtin();
		let mut table = DeploymentTable::builtin();
		table.omni_graph.ranges[1].min = 50;
		assert!(matches!(
			Resolver::new(&registry, &table),
			Err(TableError::OverlappingRanges {
				first: 43113,
				second: 80001
			})
		));
	}

	#[test]
	fn malformed_tables_are_rejected() {
		let registry = ChainRegistry::builtin();

		let mut inverted = DeploymentTable::builtin();
		inverted.omni_graph.ranges[0].min = 120;
		assert!(matches!(
			inverted.validate(&registry),
			Err(TableError::InvertedRange { chain_id: 43113, .. })
		));

		let mut unknown = DeploymentTable::builtin();
		unknown.omni_graph.ranges[0].chain_id = 31337;
		assert!(matches!(
			unknown.validate(&registry),
			Err(TableError::UnknownChain(31337))
		));

		let mut duplicate = DeploymentTable::builtin();
		duplicate.omni_graph.ranges.push(DstRange {
			chain_id: 43113,
			min: 500,
			max: 599,
		});
		assert!(matches!(
			duplicate.validate(&registry),
			Err(TableError::DuplicateRange(43113))
		));
	}

	#[test]
	fn table_reads_from_registry_file() {
		let text = r#"
			[[chain]]
			name = "Fuji"
			chain_id = 43113
			lz_chain_id = 10106
			lz_endpoint = "0x93f54D755A063cE7bB9e6Ac47Eccc8e33411d706"

			[omni_graph]
			gas_limit = 200000

			[[omni_graph.range]]
			chain_id = 43113
			min = 1
			max = 10
		"#;
		let registry = ChainRegistry::from_toml_str(text).unwrap();
		let table = DeploymentTable::from_toml_str(text).unwrap();
		let resolver = Resolver::new(&registry, &table).unwrap();
		assert_eq!(
			resolver.resolve(Contract::OmniGraph, "Fuji").unwrap().to_string(),
			"(200000, 0x93f54D755A063cE7bB9e6Ac47Eccc8e33411d706, 1, 10)"
		);
	}

	#[test]
	fn file_without_omni_graph_table_supports_it_nowhere() {
		let table = DeploymentTable::from_toml_str("").unwrap();
		assert_eq!(table.omni_graph.gas_limit, DEFAULT_OMNI_GRAPH_GAS_LIMIT);
		assert!(table.omni_graph.ranges.is_empty());
	}
}
