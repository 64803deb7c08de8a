//! Strict parsing for EVM addresses taken from registry files, config and
//! the command line.
//!
//! Node responses go through `alloy_primitives`' own serde impls, which
//! accept any case.  Addresses a user wrote down must be `0x`-prefixed,
//! and mixed-case input must carry a valid EIP-55 checksum.

pub use alloy_primitives::Address;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
	#[error("address must start with 0x: {0:?}")]
	MissingPrefix(String),
	#[error("address must be 40 hex digits, got {0}")]
	InvalidLength(usize),
	#[error("address is not valid hex: {0:?}")]
	InvalidHex(String),
	#[error("address checksum mismatch: {0:?}")]
	BadChecksum(String),
}

const HEX_DIGITS: usize = 40;

/// Parse an address, rejecting a mixed-case spelling whose checksum is wrong.
pub fn parse(s: &str) -> Result<Address, AddressError> {
	let digits = s
		.strip_prefix("0x")
		.ok_or_else(|| AddressError::MissingPrefix(s.to_owned()))?;
	if digits.len() != HEX_DIGITS {
		return Err(AddressError::InvalidLength(digits.len()));
	}

	let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
	let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
	let address: Address = digits
		.parse()
		.map_err(|_| AddressError::InvalidHex(s.to_owned()))?;

	if has_lower && has_upper {
		return Address::parse_checksummed(s, None)
			.map_err(|_| AddressError::BadChecksum(s.to_owned()));
	}
	Ok(address)
}

/// `#[serde(with = "...")]` adapter: checksummed string out, [`parse`] in.
pub mod checksummed {
	use serde::{Deserialize, Deserializer, Serializer};

	use super::Address;

	pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&address.to_checksum(None))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
		let s = String::deserialize(deserializer)?;
		super::parse(&s).map_err(serde::de::Error::custom)
	}
}

/// [`checksummed`] for optional fields.
pub mod checksummed_opt {
	use serde::{Deserialize, Deserializer, Serializer};

	use super::Address;

	pub fn serialize<S: Serializer>(address: &Option<Address>, serializer: S) -> Result<S::Ok, S::Error> {
		match address {
			Some(address) => serializer.serialize_str(&address.to_checksum(None)),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Address>, D::Error> {
		Option::<String>::deserialize(deserializer)?
			.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
			.transpose()
	}
}
