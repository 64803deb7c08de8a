use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::resolver::ConstructorArgs;

/// The parts of a Hardhat compilation artifact needed for deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
	pub contract_name: String,
	/// Creation bytecode, 0x-prefixed hex.
	pub bytecode: String,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
	#[error("failed to read artifact {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse artifact {path}: {source}")]
	Parse {
		path: PathBuf,
		source: serde_json::Error,
	},
	#[error("artifact is for {found}, expected {expected}")]
	NameMismatch { expected: String, found: String },
	#[error("artifact for {0} has no bytecode (abstract contract or interface?)")]
	EmptyBytecode(String),
	#[error("artifact for {0} has invalid bytecode (unlinked library?)")]
	InvalidBytecode(String),
}

impl Artifact {
	/// Hardhat layout: `<artifacts>/contracts/<Name>.sol/<Name>.json`.
	pub fn path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
		artifacts_dir
			.join("contracts")
			.join(format!("{contract_name}.sol"))
			.join(format!("{contract_name}.json"))
	}

	pub fn load(artifacts_dir: &Path, contract_name: &str) -> Result<Self, ArtifactError> {
		let path = Self::path(artifacts_dir, contract_name);
		let content = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
			path: path.clone(),
			source,
		})?;
		let artifact: Artifact =
			serde_json::from_str(&content).map_err(|source| ArtifactError::Parse { path, source })?;

		if artifact.contract_name != contract_name {
			return Err(ArtifactError::NameMismatch {
				expected: contract_name.to_owned(),
				found: artifact.contract_name,
			});
		}
		Ok(artifact)
	}

	pub fn bytecode(&self) -> Result<Vec<u8>, ArtifactError> {
		let digits = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
		if digits.is_empty() {
			return Err(ArtifactError::EmptyBytecode(self.contract_name.clone()));
		}
		hex::decode(digits).map_err(|_| ArtifactError::InvalidBytecode(self.contract_name.clone()))
	}

	/// Bytecode followed by the ABI-encoded constructor arguments.
	pub fn creation_code(&self, args: &ConstructorArgs) -> Result<Vec<u8>, ArtifactError> {
		let mut code = self.bytecode()?;
		code.extend(args.abi_encode());
		Ok(code)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::address::Address;

	fn write_artifact(dir: &Path, name: &str, json: serde_json::Value) {
		let path = Artifact::path(dir, name);
		std::fs::create_dir_all(path.parent().unwrap()).unwrap();
		std::fs::write(path, json.to_string()).unwrap();
	}

	#[test]
	fn hardhat_path_layout() {
		let p = Artifact::path(Path::new("artifacts"), "OmniGraph");
		assert_eq!(p, Path::new("artifacts/contracts/OmniGraph.sol/OmniGraph.json"));
	}

	#[test]
	fn creation_code_appends_arguments() {
		let dir = tempfile::tempdir().unwrap();
		write_artifact(
			dir.path(),
			"GasStation",
			serde_json::json!({
				"_format": "hh-sol-artifact-1",
				"contractName": "GasStation",
				"abi": [],
				"bytecode": "0x6080",
			}),
		);

		let artifact = Artifact::load(dir.path(), "GasStation").unwrap();
		let endpoint: Address = "0x93f54D755A063cE7bB9e6Ac47Eccc8e33411d706".parse().unwrap();
		let code = artifact
			.creation_code(&ConstructorArgs::GasStation { endpoint })
			.unwrap();

		assert_eq!(code.len(), 2 + 32);
		assert_eq!(&code[..2], &[0x60, 0x80]);
		assert_eq!(&code[14..], endpoint.as_slice());
	}

	#[test]
	fn mismatched_name_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		write_artifact(
			dir.path(),
			"OmniGraph",
			serde_json::json!({ "contractName": "GasStation", "bytecode": "0x00" }),
		);
		assert!(matches!(
			Artifact::load(dir.path(), "OmniGraph"),
			Err(ArtifactError::NameMismatch { .. })
		));
	}

	#[test]
	fn missing_artifact_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(
			Artifact::load(dir.path(), "OmniGraph"),
			Err(ArtifactError::Io { .. })
		));
	}

	#[test]
	fn bad_bytecode_is_rejected() {
		let empty = Artifact {
			contract_name: "IEndpoint".into(),
			bytecode: "0x".into(),
		};
		assert!(matches!(empty.bytecode(), Err(ArtifactError::EmptyBytecode(_))));

		let unlinked = Artifact {
			contract_name: "OmniGraph".into(),
			bytecode: "0x6080__$abcdef$__".into(),
		};
		assert!(matches!(unlinked.bytecode(), Err(ArtifactError::InvalidBytecode(_))));
	}
}
