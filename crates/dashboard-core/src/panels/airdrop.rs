//! Devnet faucet requests.

use std::sync::Mutex;

use chain_sol::{bytes_to_address, parse_address};
use tracing::info;

use crate::config::{AIRDROP_MAX_SOL, LAMPORTS_PER_SOL};
use crate::endpoint::ClusterSelection;
use crate::error::PanelError;
use crate::identity::IdentityProvider;
use crate::lock;
use crate::notification::NotificationFeed;
use crate::submission::{SubmissionPipeline, SubmissionReceipt};
use crate::workflow::WorkflowState;

/// Which address receives the airdrop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AirdropTarget {
    #[default]
    ConnectedWallet,
    ExternalAddress,
}

/// Faucet amount ceiling: `min(a, 2)`, with non-finite and negative input
/// treated as zero.
pub fn clamp_airdrop_amount(sol: f64) -> f64 {
    if !sol.is_finite() || sol <= 0.0 {
        return 0.0;
    }
    sol.min(AIRDROP_MAX_SOL)
}

#[derive(Debug, Default)]
struct AirdropForm {
    target: AirdropTarget,
    external_text: String,
    external: Option<[u8; 32]>,
    amount: f64,
    state: WorkflowState,
}

pub struct AirdropPanel {
    identity: IdentityProvider,
    feed: NotificationFeed,
    /// Always devnet.
    selection: ClusterSelection,
    form: Mutex<AirdropForm>,
}

impl AirdropPanel {
    pub fn new(
        identity: IdentityProvider,
        feed: NotificationFeed,
        selection: ClusterSelection,
    ) -> Self {
        Self {
            identity,
            feed,
            selection,
            form: Mutex::new(AirdropForm::default()),
        }
    }

    pub fn select_target(&self, target: AirdropTarget) {
        lock(&self.form).target = target;
        self.refresh_state();
    }

    pub fn set_external_address(&self, text: &str) {
        {
            let mut form = lock(&self.form);
            form.external_text = text.to_string();
            form.external = parse_address(text);
        }
        self.refresh_state();
    }

    /// Stores the clamped amount.
    pub fn set_amount(&self, sol: f64) {
        lock(&self.form).amount = clamp_airdrop_amount(sol);
        self.refresh_state();
    }

    pub fn target(&self) -> AirdropTarget {
        lock(&self.form).target
    }

    pub fn external_address(&self) -> Option<[u8; 32]> {
        lock(&self.form).external
    }

    pub fn amount(&self) -> f64 {
        lock(&self.form).amount
    }

    pub fn state(&self) -> WorkflowState {
        lock(&self.form).state.clone()
    }

    /// Address the airdrop would go to right now, if resolvable.
    pub fn resolved_target(&self) -> Option<[u8; 32]> {
        let form = lock(&self.form);
        self.resolve(&form)
    }

    pub fn can_submit(&self) -> bool {
        let form = lock(&self.form);
        self.resolve(&form).is_some() && form.amount > 0.0 && !form.state.is_submitting()
    }

    fn resolve(&self, form: &AirdropForm) -> Option<[u8; 32]> {
        match form.target {
            AirdropTarget::ConnectedWallet => self.identity.address(),
            AirdropTarget::ExternalAddress => form.external,
        }
    }

    fn refresh_state(&self) {
        let mut form = lock(&self.form);
        let ready = self.resolve(&form).is_some() && form.amount > 0.0;
        form.state.on_input(ready);
    }

    /// Request the clamped amount from the faucet, then look the signature
    /// up once.
    pub async fn submit(&self) -> Result<SubmissionReceipt, PanelError> {
        let (target, amount) = {
            let mut form = lock(&self.form);
            let target = self.resolve(&form);
            // set_amount clamps too; both checks stay.
            let amount = clamp_airdrop_amount(form.amount);
            form.state.begin(target.is_some() && amount > 0.0)?;
            match target {
                Some(target) => (target, amount),
                None => return Err(PanelError::InvalidInput("no airdrop target".into())),
            }
        };

        let lamports = (amount * LAMPORTS_PER_SOL as f64).round() as u64;
        let connection = self.selection.snapshot();
        let client = connection.client.as_ref();
        info!(to = %bytes_to_address(&target), lamports, "requesting airdrop");

        let outcome = match client.request_airdrop(&target, lamports).await {
            Ok(signature) => SubmissionPipeline::confirm(client, &signature)
                .await
                .map(|status| SubmissionReceipt { signature, status }),
            Err(e) => Err(e),
        };

        let mut form = lock(&self.form);
        match &outcome {
            Ok(receipt) => {
                self.feed.success(
                    format!("Airdrop of {amount} SOL successful!"),
                    "Amount is credited in the given Address",
                );
                form.state.succeed(receipt.signature.clone());
            }
            Err(e) => {
                self.feed.failure(
                    format!("Airdrop of {amount} SOL failed!"),
                    "Please try again later or check the address again",
                );
                form.state.fail(e.to_string());
            }
        }
        outcome
    }
}
