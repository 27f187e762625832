//! Minimal JSON-RPC 2.0 client for a Solana cluster.
//!
//! Only the methods the dashboard calls are implemented. Each method issues
//! exactly one HTTP request; there is no retry or backoff layer here.

pub mod client;
pub mod error;
pub mod types;

pub use client::{RpcClient, DEFAULT_TIMEOUT};
pub use error::RpcError;
pub use types::{
    Commitment, ParsedAccountKey, ParsedMessage, ParsedTransaction, ParsedTransactionBody,
    SignatureInfo, SignatureStatus, TransactionMeta,
};
