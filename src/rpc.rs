use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Error)]
pub enum RpcError {
	#[error("RPC transport error: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("RPC error {code}: {message}")]
	Node { code: i64, message: String },
	#[error("unexpected RPC response for {method}: {source}")]
	Decode {
		method: String,
		source: serde_json::Error,
	},
	#[error("invalid hex quantity {0:?}")]
	InvalidQuantity(String),
}

/// Receipt fields the deployer cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
	pub transaction_hash: String,
	pub block_number: Option<String>,
	/// `0x1` on success, `0x0` on revert.
	pub status: Option<String>,
	pub contract_address: Option<Address>,
}

impl TransactionReceipt {
	pub fn succeeded(&self) -> bool {
		self.status.as_deref() == Some("0x1")
	}
}

/// Thin JSON-RPC client for an EVM node.
pub struct RpcClient {
	url: String,
	http: reqwest::Client,
}

impl RpcClient {
	pub fn new(url: &str) -> Self {
		Self {
			url: url.to_owned(),
			http: reqwest::Client::new(),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Send one request and decode its `result`.  A `null` or missing
	/// result decodes as JSON null, so `Option<T>` callers see `None`.
	pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
		let body = json!({
			"id": 1,
			"jsonrpc": "2.0",
			"method": method,
			"params": params,
		});

		let resp: Value = self.http.post(&self.url).json(&body).send().await?.json().await?;

		if let Some(err) = resp.get("error").filter(|e| !e.is_null()) {
			return Err(RpcError::Node {
				code: err.get("code").and_then(Value::as_i64).unwrap_or_default(),
				message: err
					.get("message")
					.and_then(Value::as_str)
					.unwrap_or("unknown error")
					.to_owned(),
			});
		}

		let result = resp.get("result").cloned().unwrap_or(Value::Null);
		serde_json::from_value(result).map_err(|source| RpcError::Decode {
			method: method.to_owned(),
			source,
		})
	}

	// -- Standard eth_* helpers --

	pub async fn chain_id(&self) -> Result<u64, RpcError> {
		let hex: String = self.call("eth_chainId", json!([])).await?;
		parse_quantity(&hex)
	}

	/// Accounts the node can sign for.
	pub async fn accounts(&self) -> Result<Vec<Address>, RpcError> {
		self.call("eth_accounts", json!([])).await
	}

	/// Submit a contract-creation transaction signed by the node.
	/// Returns the transaction hash.
	pub async fn send_transaction(&self, from: Address, data: &[u8]) -> Result<String, RpcError> {
		let tx = json!({
			"from": from.to_checksum(None),
			"data": format!("0x{}", hex::encode(data)),
		});
		self.call("eth_sendTransaction", json!([tx])).await
	}

	pub async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<TransactionReceipt>, RpcError> {
		self.call("eth_getTransactionReceipt", json!([tx_hash])).await
	}
}

/// Parse a JSON-RPC hex quantity such as `0xa869`.
pub fn parse_quantity(s: &str) -> Result<u64, RpcError> {
	let digits = s
		.strip_prefix("0x")
		.ok_or_else(|| RpcError::InvalidQuantity(s.to_owned()))?;
	u64::from_str_radix(digits, 16).map_err(|_| RpcError::InvalidQuantity(s.to_owned()))
}
