use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::address::{self, Address};

/// LayerZero's own chain identifier, distinct from the EVM chain id.
pub type LzChainId = u16;

/// One chain known to the messaging layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
	/// Human-readable label, unique across the registry.
	pub name: String,
	/// EVM chain id.
	pub chain_id: u64,
	/// Protocol chain id used to address this chain as a message destination.
	pub lz_chain_id: LzChainId,
	/// Messaging endpoint contract deployed on this chain.
	#[serde(with = "address::checksummed")]
	pub lz_endpoint: Address,
	/// Extra labels (Hardhat network names) that select the same entry.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub aliases: Vec<String>,
}

impl ChainEntry {
	/// The entry's name followed by its aliases.
	pub fn labels(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
	}
}

/// The network a deployment run targets, as reported by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIdentity {
	pub name: String,
	pub chain_id: Option<u64>,
}

impl NetworkIdentity {
	pub fn new(name: impl Into<String>, chain_id: Option<u64>) -> Self {
		Self {
			name: name.into(),
			chain_id,
		}
	}
}

/// Key used for a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
	Name(String),
	ChainId(u64),
	LzChainId(LzChainId),
}

impl fmt::Display for Lookup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Lookup::Name(name) => write!(f, "name {name:?}"),
			Lookup::ChainId(id) => write!(f, "chain id {id}"),
			Lookup::LzChainId(id) => write!(f, "LayerZero chain id {id}"),
		}
	}
}

#[derive(Debug, Error)]
pub enum RegistryError {
	#[error("no chain with {0} in the registry")]
	NotFound(Lookup),
	#[error("label {label:?} is used by both {first:?} and {second:?}")]
	DuplicateLabel {
		label: String,
		first: String,
		second: String,
	},
	#[error("chain id {chain_id} is used by both {first:?} and {second:?}")]
	DuplicateChainId {
		chain_id: u64,
		first: String,
		second: String,
	},
	#[error("LayerZero chain id {lz_chain_id} is used by both {first:?} and {second:?}")]
	DuplicateLzChainId {
		lz_chain_id: LzChainId,
		first: String,
		second: String,
	},
	#[error("chain {0:?} has chain id 0")]
	ZeroChainId(String),
	#[error("chain entry has an empty label")]
	EmptyLabel,
	#[error("network {name:?} expects chain id {expected}, but {chain_id} was reported")]
	IdentityMismatch {
		name: String,
		chain_id: u64,
		expected: u64,
	},
	#[error("failed to parse registry file: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("failed to serialize registry: {0}")]
	Serialize(#[from] toml::ser::Error),
}

/// On-disk layout: a list of `[[chain]]` tables.  Other top-level tables
/// in the same file (e.g. `[omni_graph]`) are ignored here.
#[derive(Serialize, Deserialize)]
struct RegistryFile {
	#[serde(rename = "chain", default)]
	chains: Vec<ChainEntry>,
}

/// Immutable table of chain entries.
///
/// A single `Vec` owns the records; the name, chain-id and protocol-id
/// indices all point into it, so every lookup path yields the same record.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
	entries: Vec<ChainEntry>,
	by_label: HashMap<String, usize>,
	by_chain_id: HashMap<u64, usize>,
	by_lz_chain_id: HashMap<LzChainId, usize>,
}

fn label_key(label: &str) -> String {
	label.trim().to_ascii_lowercase()
}

impl ChainRegistry {
	/// Build the registry, rejecting any key that is empty or not unique.
	pub fn new(entries: Vec<ChainEntry>) -> Result<Self, RegistryError> {
		let mut by_label: HashMap<String, usize> = HashMap::new();
		let mut by_chain_id = HashMap::new();
		let mut by_lz_chain_id = HashMap::new();

		for (idx, entry) in entries.iter().enumerate() {
			if entry.chain_id == 0 {
				return Err(RegistryError::ZeroChainId(entry.name.clone()));
			}

			for label in entry.labels() {
				let key = label_key(label);
				if key.is_empty() {
					return Err(RegistryError::EmptyLabel);
				}
				match by_label.get(&key) {
					// An alias repeating the entry's own name is harmless.
					Some(&prev) if prev == idx => {}
					Some(&prev) => {
						return Err(RegistryError::DuplicateLabel {
							label: label.to_owned(),
							first: entries[prev].name.clone(),
							second: entry.name.clone(),
						})
					}
					None => {
						by_label.insert(key, idx);
					}
				}
			}

			if let Some(prev) = by_chain_id.insert(entry.chain_id, idx) {
				return Err(RegistryError::DuplicateChainId {
					chain_id: entry.chain_id,
					first: entries[prev].name.clone(),
					second: entry.name.clone(),
				});
			}

			if let Some(prev) = by_lz_chain_id.insert(entry.lz_chain_id, idx) {
				return Err(RegistryError::DuplicateLzChainId {
					lz_chain_id: entry.lz_chain_id,
					first: entries[prev].name.clone(),
					second: entry.name.clone(),
				});
			}
		}

		Ok(Self {
			entries,
			by_label,
			by_chain_id,
			by_lz_chain_id,
		})
	}

	/// The chains LayerZero-enabled contracts are deployed to by default.
	pub fn builtin() -> Self {
		let entries = BUILTIN_CHAINS
			.iter()
			.map(|c| ChainEntry {
				name: c.name.to_owned(),
				chain_id: c.chain_id,
				lz_chain_id: c.lz_chain_id,
				lz_endpoint: address::parse(c.lz_endpoint)
					.expect("built-in endpoint addresses are checksummed"),
				aliases: c.aliases.iter().map(|a| (*a).to_owned()).collect(),
			})
			.collect();
		Self::new(entries).expect("built-in chain table has unique keys")
	}

	/// Parse a registry from the TOML `[[chain]]` format.
	pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
		let file: RegistryFile = toml::from_str(content)?;
		Self::new(file.chains)
	}

	/// Render the registry in the same format `from_toml_str` reads.
	pub fn to_toml_string(&self) -> Result<String, RegistryError> {
		let file = RegistryFile {
			chains: self.entries.clone(),
		};
		Ok(toml::to_string_pretty(&file)?)
	}

	/// Look up by name or alias, ignoring ASCII case.
	pub fn find_by_name(&self, name: &str) -> Result<&ChainEntry, RegistryError> {
		let entry = self
			.by_label
			.get(&label_key(name))
			.map(|&idx| &self.entries[idx])
			.ok_or_else(|| RegistryError::NotFound(Lookup::Name(name.to_owned())))?;
		debug!(name, chain = %entry.name, "registry lookup by name");
		Ok(entry)
	}

	pub fn find_by_chain_id(&self, chain_id: u64) -> Result<&ChainEntry, RegistryError> {
		let entry = self
			.by_chain_id
			.get(&chain_id)
			.map(|&idx| &self.entries[idx])
			.ok_or(RegistryError::NotFound(Lookup::ChainId(chain_id)))?;
		debug!(chain_id, chain = %entry.name, "registry lookup by chain id");
		Ok(entry)
	}

	pub fn find_by_lz_chain_id(&self, lz_chain_id: LzChainId) -> Result<&ChainEntry, RegistryError> {
		self.by_lz_chain_id
			.get(&lz_chain_id)
			.map(|&idx| &self.entries[idx])
			.ok_or(RegistryError::NotFound(Lookup::LzChainId(lz_chain_id)))
	}

	/// Resolve a network identity.  The name selects the entry; a reported
	/// chain id must then agree with it.
	pub fn locate(&self, identity: &NetworkIdentity) -> Result<&ChainEntry, RegistryError> {
		let entry = self.find_by_name(&identity.name)?;
		if let Some(chain_id) = identity.chain_id {
			if chain_id != entry.chain_id {
				return Err(RegistryError::IdentityMismatch {
					name: identity.name.clone(),
					chain_id,
					expected: entry.chain_id,
				});
			}
		}
		Ok(entry)
	}

	pub fn entries(&self) -> impl Iterator<Item = &ChainEntry> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

struct BuiltinChain {
	name: &'static str,
	chain_id: u64,
	lz_chain_id: LzChainId,
	lz_endpoint: &'static str,
	aliases: &'static [&'static str],
}

static BUILTIN_CHAINS: &[BuiltinChain] = &[
	BuiltinChain {
		name: "Goerli",
		chain_id: 5,
		lz_chain_id: 10121,
		lz_endpoint: "0xbfD2135BFfbb0B5378b56643c2Df8a87552Bfa23",
		aliases: &[],
	},
	BuiltinChain {
		name: "Fuji",
		chain_id: 43113,
		lz_chain_id: 10106,
		lz_endpoint: "0x93f54D755A063cE7bB9e6Ac47Eccc8e33411d706",
		aliases: &["avalancheFujiTestnet"],
	},
	BuiltinChain {
		name: "Mumbai",
		chain_id: 80001,
		lz_chain_id: 10109,
		lz_endpoint: "0xf69186dfBa60DdB133E91E9A4B5673624293d8F8",
		aliases: &["polygonMumbai"],
	},
	BuiltinChain {
		name: "Arbitrum-Goerli",
		chain_id: 421613,
		lz_chain_id: 10143,
		lz_endpoint: "0x6aB5Ae6822647046626e83ee6dB8187151E1d5ab",
		aliases: &["arbitrumGoerli"],
	},
	BuiltinChain {
		name: "Optimism-Goerli",
		chain_id: 420,
		lz_chain_id: 10132,
		lz_endpoint: "0xae92d5aD7583AD66E49A0c67BAd18F6ba52dDDc1",
		aliases: &["optimisticGoerli"],
	},
	BuiltinChain {
		name: "Arbitrum One",
		chain_id: 42161,
		lz_chain_id: 110,
		lz_endpoint: "0x3c2269811836af69497E5F486A85D7316753cf62",
		aliases: &["arbitrumOne"],
	},
	BuiltinChain {
		name: "Optimism",
		chain_id: 10,
		lz_chain_id: 111,
		lz_endpoint: "0x3c2269811836af69497E5F486A85D7316753cf62",
		aliases: &["optimisticEthereum"],
	},
];
