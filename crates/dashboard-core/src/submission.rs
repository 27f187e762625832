//! Compile, sign, send, and corroborate a transaction.

use chain_sol::{
    assemble_signed_transaction, compile_transaction, serialize_message, SolInstruction,
    SolKeypair,
};
use tracing::{debug, info, warn};

use crate::error::PanelError;
use crate::identity::Identity;
use crate::network::NetworkClient;
use crate::types::SubmissionStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub signature: String,
    /// Result of the single follow-up status lookup; `None` if the node had
    /// not seen the transaction yet.
    pub status: Option<SubmissionStatus>,
}

/// Stateless submission steps shared by every panel that writes to the
/// cluster.
pub struct SubmissionPipeline;

impl SubmissionPipeline {
    /// Run the whole pipeline: [`send`](Self::send) then
    /// [`confirm`](Self::confirm).
    pub async fn submit(
        client: &dyn NetworkClient,
        identity: &dyn Identity,
        instructions: &[SolInstruction],
        co_signers: &[&SolKeypair],
    ) -> Result<SubmissionReceipt, PanelError> {
        let signature = Self::send(client, identity, instructions, co_signers).await?;
        let status = Self::confirm(client, &signature).await?;
        Ok(SubmissionReceipt { signature, status })
    }

    /// Build the transaction with `identity` as fee payer, collect every
    /// required signature and send it once. Returns the signature reported
    /// by the node.
    pub async fn send(
        client: &dyn NetworkClient,
        identity: &dyn Identity,
        instructions: &[SolInstruction],
        co_signers: &[&SolKeypair],
    ) -> Result<String, PanelError> {
        if instructions.is_empty() {
            return Err(PanelError::InvalidInput(
                "nothing to submit: no instructions".into(),
            ));
        }

        let blockhash = client.latest_blockhash().await?;
        let payer = identity.address();
        let tx = compile_transaction(instructions, &payer, &blockhash)?;
        let message = serialize_message(&tx)?;

        let mut signatures = Vec::with_capacity(1 + co_signers.len());
        signatures.push((payer, identity.sign_message(&message).await?));
        for signer in co_signers {
            signatures.push((signer.pubkey(), signer.sign(&message)));
        }

        let wire = assemble_signed_transaction(&tx, &message, &signatures)?;
        debug!(
            instructions = instructions.len(),
            signers = signatures.len(),
            bytes = wire.len(),
            "sending transaction"
        );

        let signature = client.send_transaction(&wire).await?;
        info!(%signature, "transaction sent");
        Ok(signature)
    }

    /// One status lookup for `signature`. A status reporting a runtime
    /// error is a failure; an unknown signature is not.
    pub async fn confirm(
        client: &dyn NetworkClient,
        signature: &str,
    ) -> Result<Option<SubmissionStatus>, PanelError> {
        let status = client.signature_status(signature).await?;
        match &status {
            Some(SubmissionStatus::Failed(reason)) => {
                warn!(%signature, %reason, "transaction failed on chain");
                Err(PanelError::Transport(format!(
                    "transaction {signature} failed: {reason}"
                )))
            }
            Some(other) => {
                debug!(%signature, status = ?other, "status lookup");
                Ok(status)
            }
            None => {
                debug!(%signature, "status not yet available");
                Ok(None)
            }
        }
    }
}
