//! HTTP transport and typed methods.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::RpcError;
use crate::types::{
    Commitment, LatestBlockhash, ParsedTransaction, SignatureInfo, SignatureStatus, WithContext,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC client bound to one cluster endpoint.
///
/// Wraps `reqwest::Client` with the endpoint URL and the commitment level
/// used for queries and transaction preflight.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    commitment: Commitment,
    next_id: Arc<AtomicU64>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Build a JSON-RPC 2.0 request envelope.
pub(crate) fn request_body(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

impl RpcClient {
    /// Create a client for `url` (e.g. `https://api.devnet.solana.com`).
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        commitment: Commitment,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            commitment,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// The endpoint URL this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Send one JSON-RPC request and decode its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, url = %self.url, "rpc call");

        let response = self
            .http
            .post(&self.url)
            .json(&request_body(id, method, params))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // Rate limits and faucet refusals come back with a non-2xx status
        // but still carry a JSON-RPC error object.
        let parsed: RpcResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(RpcError::Http(status.as_u16())),
            Err(e) => return Err(RpcError::InvalidResponse(format!("{method}: {e}"))),
        };

        if let Some(err) = parsed.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        if !status.is_success() {
            return Err(RpcError::Http(status.as_u16()));
        }

        serde_json::from_value(parsed.result)
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    /// `getLatestBlockhash`, decoded to 32 bytes.
    pub async fn get_latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
        let resp: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([self.commitment_config()]))
            .await?;

        let bytes = bs58::decode(&resp.value.blockhash)
            .into_vec()
            .map_err(|e| RpcError::InvalidResponse(format!("blockhash is not base58: {e}")))?;
        bytes.try_into().map_err(|v: Vec<u8>| {
            RpcError::InvalidResponse(format!("blockhash is {} bytes, expected 32", v.len()))
        })
    }

    /// `getMinimumBalanceForRentExemption` for an account of `data_len` bytes.
    pub async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: u64,
    ) -> Result<u64, RpcError> {
        self.call(
            "getMinimumBalanceForRentExemption",
            json!([data_len, self.commitment_config()]),
        )
        .await
    }

    /// `sendTransaction` with base64 encoding. Returns the signature.
    pub async fn send_transaction(&self, wire: &[u8]) -> Result<String, RpcError> {
        let encoded = BASE64_STANDARD.encode(wire);
        self.call(
            "sendTransaction",
            json!([
                encoded,
                {
                    "encoding": "base64",
                    "preflightCommitment": self.commitment.as_str(),
                }
            ]),
        )
        .await
    }

    /// `getSignatureStatuses`; one entry per signature, `None` if unknown.
    pub async fn get_signature_statuses(
        &self,
        signatures: &[String],
    ) -> Result<Vec<Option<SignatureStatus>>, RpcError> {
        let resp: WithContext<Vec<Option<SignatureStatus>>> = self
            .call("getSignatureStatuses", json!([signatures]))
            .await?;
        Ok(resp.value)
    }

    /// `requestAirdrop` of `lamports` to `address`. Returns the signature.
    pub async fn request_airdrop(&self, address: &str, lamports: u64) -> Result<String, RpcError> {
        self.call(
            "requestAirdrop",
            json!([address, lamports, self.commitment_config()]),
        )
        .await
    }

    /// `getSignaturesForAddress`, newest first, at most `limit` entries.
    pub async fn get_signatures_for_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, RpcError> {
        self.call(
            "getSignaturesForAddress",
            json!([address, { "limit": limit, "commitment": self.commitment.as_str() }]),
        )
        .await
    }

    /// `getTransaction` with `jsonParsed` encoding; `None` when the node does
    /// not know the signature.
    pub async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, RpcError> {
        self.call(
            "getTransaction",
            json!([
                signature,
                {
                    "encoding": "jsonParsed",
                    "maxSupportedTransactionVersion": 0,
                    "commitment": self.commitment.as_str(),
                }
            ]),
        )
        .await
    }
}
