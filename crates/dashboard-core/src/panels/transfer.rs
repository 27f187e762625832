//! Native SOL transfer.

use std::sync::Mutex;

use chain_sol::{build_transfer_instruction, parse_address};
use tracing::info;

use crate::config::DEFAULT_TRANSFER_SOL;
use crate::endpoint::{Cluster, ClusterSelection};
use crate::error::PanelError;
use crate::format::{short_signature, sol_to_lamports};
use crate::identity::IdentityProvider;
use crate::lock;
use crate::notification::NotificationFeed;
use crate::submission::{SubmissionPipeline, SubmissionReceipt};
use crate::workflow::WorkflowState;

#[derive(Debug)]
struct TransferForm {
    recipient_text: String,
    recipient: Option<[u8; 32]>,
    amount: f64,
    state: WorkflowState,
}

impl TransferForm {
    fn new() -> Self {
        Self {
            recipient_text: String::new(),
            recipient: None,
            amount: DEFAULT_TRANSFER_SOL,
            state: WorkflowState::AwaitingInput,
        }
    }

    /// A recipient and an amount worth at least one lamport.
    fn ready(&self) -> bool {
        self.recipient.is_some() && sol_to_lamports(self.amount).is_some_and(|l| l > 0)
    }

    fn reset(&mut self) {
        self.recipient_text.clear();
        self.recipient = None;
        self.amount = DEFAULT_TRANSFER_SOL;
    }
}

pub struct TransferPanel {
    identity: IdentityProvider,
    feed: NotificationFeed,
    selection: ClusterSelection,
    form: Mutex<TransferForm>,
}

impl TransferPanel {
    pub fn new(
        identity: IdentityProvider,
        feed: NotificationFeed,
        selection: ClusterSelection,
    ) -> Self {
        Self {
            identity,
            feed,
            selection,
            form: Mutex::new(TransferForm::new()),
        }
    }

    /// Recipient text as typed; an unparsable address leaves the recipient
    /// unset.
    pub fn set_recipient(&self, text: &str) {
        let mut form = lock(&self.form);
        form.recipient_text = text.to_string();
        form.recipient = parse_address(text);
        let ready = form.ready();
        form.state.on_input(ready);
    }

    /// Amount in SOL.
    pub fn set_amount(&self, sol: f64) {
        let mut form = lock(&self.form);
        form.amount = sol;
        let ready = form.ready();
        form.state.on_input(ready);
    }

    pub fn recipient_text(&self) -> String {
        lock(&self.form).recipient_text.clone()
    }

    pub fn recipient(&self) -> Option<[u8; 32]> {
        lock(&self.form).recipient
    }

    pub fn amount(&self) -> f64 {
        lock(&self.form).amount
    }

    pub fn state(&self) -> WorkflowState {
        lock(&self.form).state.clone()
    }

    /// Whether the send action is enabled.
    pub fn can_submit(&self) -> bool {
        let form = lock(&self.form);
        self.identity.is_connected() && form.ready() && !form.state.is_submitting()
    }

    pub fn cluster(&self) -> Cluster {
        self.selection.cluster()
    }

    pub fn select_cluster(&self, cluster: Cluster) -> Result<(), PanelError> {
        self.selection.select(cluster)
    }

    /// Send `amount` SOL from the connected identity to the recipient.
    ///
    /// Whatever the outcome of the network round trip, the form is cleared
    /// afterwards. A missing identity is reported without touching the
    /// form.
    pub async fn submit(&self) -> Result<SubmissionReceipt, PanelError> {
        let Some(identity) = self.identity.current() else {
            self.feed
                .failure("Wallet not connected", "Please connect your wallet first");
            return Err(PanelError::NoIdentity);
        };

        let (recipient, amount) = {
            let mut form = lock(&self.form);
            let ready = form.ready();
            form.state.begin(ready)?;
            match (form.recipient, sol_to_lamports(form.amount)) {
                (Some(recipient), Some(lamports)) => (recipient, lamports),
                _ => {
                    form.state.fail("invalid transfer amount");
                    return Err(PanelError::InvalidInput("invalid transfer amount".into()));
                }
            }
        };

        let connection = self.selection.snapshot();
        info!(cluster = %connection.endpoint.cluster, lamports = amount, "transfer");
        let client = connection.client.as_ref();
        let ix = build_transfer_instruction(&identity.address(), &recipient, amount);

        let outcome = match SubmissionPipeline::send(client, identity.as_ref(), &[ix], &[]).await {
            Ok(signature) => {
                self.feed.success(
                    "Transaction sent",
                    format!("Signature: {}", short_signature(&signature)),
                );
                SubmissionPipeline::confirm(client, &signature)
                    .await
                    .map(|status| SubmissionReceipt { signature, status })
            }
            Err(e) => Err(e),
        };

        let mut form = lock(&self.form);
        form.reset();
        match &outcome {
            Ok(receipt) => {
                self.feed
                    .success("Transaction confirmed ✅", "Transfer completed successfully");
                form.state.succeed(receipt.signature.clone());
            }
            Err(e) => {
                self.feed.failure("Transaction failed", e.to_string());
                form.state.fail(e.to_string());
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chain_sol::bytes_to_address;

    use super::*;
    use crate::config::Config;
    use crate::notification::Variant;
    use crate::test_support::{connected_provider, FakeConnector};
    use crate::types::SubmissionStatus;

    const RECIPIENT: [u8; 32] = [8u8; 32];

    fn panel(provider: IdentityProvider) -> (TransferPanel, Arc<FakeConnector>, NotificationFeed) {
        let connector = Arc::new(FakeConnector::new());
        let feed = NotificationFeed::new();
        let selection =
            ClusterSelection::new(Config::default(), connector.clone(), Cluster::Devnet).unwrap();
        (TransferPanel::new(provider, feed.clone(), selection), connector, feed)
    }

    // ─── Readiness ─────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let (panel, _, _) = panel(IdentityProvider::new());
        assert_eq!(panel.amount(), 1.0);
        assert_eq!(panel.recipient(), None);
        assert_eq!(panel.state(), WorkflowState::AwaitingInput);
        assert!(!panel.can_submit());
    }

    #[test]
    fn enabled_only_with_recipient_and_positive_amount() {
        let (provider, _) = connected_provider(1);
        let (panel, _, _) = panel(provider);

        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        assert!(panel.can_submit());
        assert_eq!(panel.state(), WorkflowState::Idle);

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e-10] {
            panel.set_amount(bad);
            assert!(!panel.can_submit(), "amount {bad} should disable submit");
        }

        panel.set_amount(1e-9);
        assert!(panel.can_submit(), "one lamport is enough");

        panel.set_amount(0.25);
        panel.set_recipient("not-an-address");
        assert_eq!(panel.recipient(), None);
        assert!(!panel.can_submit());
    }

    #[test]
    fn disabled_without_identity() {
        let (panel, _, _) = panel(IdentityProvider::new());
        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        assert!(!panel.can_submit());
    }

    // ─── Submission ────────────────────────────────────────────────

    #[tokio::test]
    async fn successful_transfer_notifies_and_resets() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, feed) = panel(provider);
        connector
            .network(Cluster::Devnet)
            .configure(|s| s.status = Some(SubmissionStatus::Confirmed));

        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        panel.set_amount(0.5);
        let receipt = panel.submit().await.unwrap();

        let notes = feed.snapshot();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "Transaction sent");
        assert_eq!(
            notes[0].description,
            format!("Signature: {}", short_signature(&receipt.signature))
        );
        assert_eq!(notes[1].title, "Transaction confirmed ✅");
        assert_eq!(notes[1].description, "Transfer completed successfully");

        assert_eq!(panel.recipient_text(), "");
        assert_eq!(panel.amount(), 1.0);
        assert_eq!(panel.state(), WorkflowState::Succeeded(receipt.signature));

        let network = connector.network(Cluster::Devnet);
        let state = network.state();
        assert_eq!(state.sent.len(), 1);
        // 0.5 SOL in the System transfer data, after the 4-byte index.
        let wire = &state.sent[0];
        let lamports = u64::from_le_bytes(wire[wire.len() - 8..].try_into().unwrap());
        assert_eq!(lamports, 500_000_000);
    }

    #[tokio::test]
    async fn no_identity_keeps_form() {
        let (panel, connector, feed) = panel(IdentityProvider::new());
        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        panel.set_amount(3.0);

        let err = panel.submit().await.unwrap_err();
        assert!(matches!(err, PanelError::NoIdentity));

        let note = feed.latest().unwrap();
        assert_eq!(note.title, "Wallet not connected");
        assert_eq!(note.variant, Variant::Destructive);
        assert_eq!(panel.amount(), 3.0);
        assert_eq!(panel.recipient(), Some(RECIPIENT));
        assert_eq!(connector.network(Cluster::Devnet).state().blockhash_requests, 0);
    }

    #[tokio::test]
    async fn send_failure_reports_message_and_resets() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, feed) = panel(provider);
        connector
            .network(Cluster::Devnet)
            .configure(|s| s.fail_send = Some("insufficient funds".into()));

        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        assert!(panel.submit().await.is_err());

        let notes = feed.snapshot();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Transaction failed");
        assert_eq!(notes[0].description, "insufficient funds");
        assert_eq!(panel.recipient(), None);
        assert_eq!(panel.amount(), 1.0);
        assert!(matches!(panel.state(), WorkflowState::Failed(_)));
    }

    #[tokio::test]
    async fn status_lookup_failure_after_send() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, feed) = panel(provider);
        connector
            .network(Cluster::Devnet)
            .configure(|s| s.fail_status = Some("timed out".into()));

        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        assert!(panel.submit().await.is_err());

        let titles: Vec<String> = feed.snapshot().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["Transaction sent", "Transaction failed"]);
    }

    #[tokio::test]
    async fn not_ready_submit_makes_no_network_call() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, _) = panel(provider);
        let err = panel.submit().await.unwrap_err();
        assert!(matches!(err, PanelError::InvalidInput(_)));
        assert_eq!(connector.network(Cluster::Devnet).state().blockhash_requests, 0);
    }

    #[tokio::test]
    async fn uses_selected_cluster() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, _) = panel(provider);
        panel.select_cluster(Cluster::Mainnet).unwrap();
        panel.set_recipient(&bytes_to_address(&RECIPIENT));
        panel.submit().await.unwrap();

        assert!(connector.network(Cluster::Devnet).state().sent.is_empty());
        assert_eq!(connector.network(Cluster::Mainnet).state().sent.len(), 1);
    }
}
