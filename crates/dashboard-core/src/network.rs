//! Network capability consumed by the panels, and its RPC implementation.

use async_trait::async_trait;
use chain_sol::bytes_to_address;
use sol_rpc::{Commitment, ParsedTransaction, RpcClient, SignatureInfo, SignatureStatus};

use crate::error::PanelError;
use crate::types::{BalanceChange, SubmissionStatus, TransactionDetail, TransactionRecord};

/// Everything the panels need from a cluster. Each call is a single remote
/// request with no retry.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    async fn latest_blockhash(&self) -> Result<[u8; 32], PanelError>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: u64) -> Result<u64, PanelError>;

    /// Submit a signed wire transaction; returns its signature.
    async fn send_transaction(&self, wire: &[u8]) -> Result<String, PanelError>;

    /// `None` when the node has not seen the signature yet.
    async fn signature_status(&self, signature: &str)
        -> Result<Option<SubmissionStatus>, PanelError>;

    async fn request_airdrop(&self, address: &[u8; 32], lamports: u64)
        -> Result<String, PanelError>;

    /// Newest first, at most `limit` records.
    async fn recent_transactions(
        &self,
        address: &[u8; 32],
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, PanelError>;

    async fn transaction_detail(&self, signature: &str)
        -> Result<Option<TransactionDetail>, PanelError>;
}

#[async_trait]
impl NetworkClient for RpcClient {
    async fn latest_blockhash(&self) -> Result<[u8; 32], PanelError> {
        Ok(self.get_latest_blockhash().await?)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: u64) -> Result<u64, PanelError> {
        Ok(self.get_minimum_balance_for_rent_exemption(data_len).await?)
    }

    async fn send_transaction(&self, wire: &[u8]) -> Result<String, PanelError> {
        Ok(RpcClient::send_transaction(self, wire).await?)
    }

    async fn signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SubmissionStatus>, PanelError> {
        let statuses = self.get_signature_statuses(&[signature.to_string()]).await?;
        Ok(statuses.into_iter().next().flatten().map(status_from_rpc))
    }

    async fn request_airdrop(
        &self,
        address: &[u8; 32],
        lamports: u64,
    ) -> Result<String, PanelError> {
        Ok(RpcClient::request_airdrop(self, &bytes_to_address(address), lamports).await?)
    }

    async fn recent_transactions(
        &self,
        address: &[u8; 32],
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, PanelError> {
        let infos = self
            .get_signatures_for_address(&bytes_to_address(address), limit)
            .await?;
        Ok(infos.into_iter().map(record_from_rpc).collect())
    }

    async fn transaction_detail(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionDetail>, PanelError> {
        let parsed = self.get_transaction(signature).await?;
        Ok(parsed.map(|tx| detail_from_rpc(signature, tx)))
    }
}

pub(crate) fn status_from_rpc(status: SignatureStatus) -> SubmissionStatus {
    if let Some(err) = status.err {
        return SubmissionStatus::Failed(err.to_string());
    }
    match status.confirmation_status {
        Some(Commitment::Finalized) => SubmissionStatus::Finalized,
        Some(Commitment::Confirmed) => SubmissionStatus::Confirmed,
        Some(Commitment::Processed) | None => SubmissionStatus::Processed,
    }
}

pub(crate) fn record_from_rpc(info: SignatureInfo) -> TransactionRecord {
    TransactionRecord {
        succeeded: info.err.is_none(),
        signature: info.signature,
        slot: info.slot,
        block_time: info.block_time,
        confirmation_status: info.confirmation_status,
        memo: info.memo,
    }
}

pub(crate) fn detail_from_rpc(requested: &str, tx: ParsedTransaction) -> TransactionDetail {
    let signature = tx
        .transaction
        .signatures
        .first()
        .cloned()
        .unwrap_or_else(|| requested.to_string());

    let keys = tx.transaction.message.account_keys;
    let (fee, succeeded, balance_changes, logs) = match tx.meta {
        Some(meta) => {
            let changes = keys
                .iter()
                .zip(meta.pre_balances.iter().zip(meta.post_balances.iter()))
                .map(|(key, (pre, post))| BalanceChange {
                    account: key.pubkey.clone(),
                    pre: *pre,
                    post: *post,
                })
                .collect();
            (
                meta.fee,
                meta.err.is_none(),
                changes,
                meta.log_messages.unwrap_or_default(),
            )
        }
        None => (0, true, Vec::new(), Vec::new()),
    };

    TransactionDetail {
        signature,
        slot: tx.slot,
        block_time: tx.block_time,
        fee,
        succeeded,
        balance_changes,
        logs,
    }
}
