//! Fungible token creation: mint account, holding account, initial supply
//! and immutable metadata in one transaction.

use std::sync::Mutex;

use chain_sol::{
    build_create_account_instruction, build_create_associated_token_account_instruction,
    build_create_metadata_v3_instruction, build_initialize_mint_instruction,
    build_mint_to_instruction, bytes_to_address, derive_associated_token_address,
    derive_metadata_address, SolInstruction, SolKeypair, TokenMetadata, MINT_SIZE,
    TOKEN_PROGRAM_ID,
};
use tracing::{info, warn};

use crate::endpoint::{Cluster, ClusterSelection};
use crate::error::PanelError;
use crate::identity::{Identity, IdentityProvider};
use crate::lock;
use crate::network::NetworkClient;
use crate::notification::NotificationFeed;
use crate::submission::{SubmissionPipeline, SubmissionReceipt};
use crate::workflow::WorkflowState;

const FAILURE_MESSAGE: &str = "Failed to create token. Please try again.";

/// Validated token-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCreationIntent {
    pub metadata: TokenMetadata,
    /// Whole tokens minted to the creator.
    pub supply: u64,
    pub decimals: u8,
}

impl TokenCreationIntent {
    /// Parse raw form text.
    pub fn parse(
        name: &str,
        symbol: &str,
        uri: &str,
        supply: &str,
        decimals: &str,
    ) -> Result<Self, PanelError> {
        let name = name.trim();
        let symbol = symbol.trim();
        if name.is_empty() {
            return Err(PanelError::InvalidInput("token name is required".into()));
        }
        if symbol.is_empty() {
            return Err(PanelError::InvalidInput("token symbol is required".into()));
        }

        let supply: u64 = supply
            .trim()
            .parse()
            .map_err(|_| PanelError::InvalidInput(format!("supply {supply:?} is not a whole number")))?;
        if supply == 0 {
            return Err(PanelError::InvalidInput("supply must be at least 1".into()));
        }
        let decimals: u8 = decimals.trim().parse().map_err(|_| {
            PanelError::InvalidInput(format!("decimals {decimals:?} must be between 0 and 255"))
        })?;

        let metadata = TokenMetadata {
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: uri.trim().to_string(),
        };
        metadata.validate()?;

        let intent = Self {
            metadata,
            supply,
            decimals,
        };
        intent.base_units()?;
        Ok(intent)
    }

    /// `supply * 10^decimals`.
    pub fn base_units(&self) -> Result<u64, PanelError> {
        10u64
            .checked_pow(u32::from(self.decimals))
            .and_then(|scale| self.supply.checked_mul(scale))
            .ok_or_else(|| {
                PanelError::InvalidInput(format!(
                    "supply {} with {} decimals overflows a u64",
                    self.supply, self.decimals
                ))
            })
    }
}

/// The five instructions of a token launch, in dependency order:
/// create-account, initialize-mint, create-associated-account, mint-to,
/// create-metadata.
pub fn token_creation_instructions(
    intent: &TokenCreationIntent,
    payer: &[u8; 32],
    mint: &[u8; 32],
    rent_lamports: u64,
) -> Result<Vec<SolInstruction>, PanelError> {
    let holding = derive_associated_token_address(payer, mint)?;
    let metadata_account = derive_metadata_address(mint)?;

    Ok(vec![
        build_create_account_instruction(payer, mint, rent_lamports, MINT_SIZE, &TOKEN_PROGRAM_ID),
        build_initialize_mint_instruction(mint, intent.decimals, payer, Some(payer)),
        build_create_associated_token_account_instruction(payer, &holding, payer, mint),
        build_mint_to_instruction(mint, &holding, payer, intent.base_units()?)?,
        build_create_metadata_v3_instruction(
            &metadata_account,
            mint,
            payer,
            payer,
            payer,
            &intent.metadata,
            false,
        )?,
    ])
}

#[derive(Debug, Default)]
struct TokenForm {
    name: String,
    symbol: String,
    uri: String,
    supply: String,
    decimals: String,
    state: WorkflowState,
    status: Option<String>,
    error: Option<String>,
    last_mint: Option<[u8; 32]>,
}

impl TokenForm {
    fn intent(&self) -> Result<TokenCreationIntent, PanelError> {
        TokenCreationIntent::parse(&self.name, &self.symbol, &self.uri, &self.supply, &self.decimals)
    }

    fn edited(&mut self) {
        let ready = self.intent().is_ok();
        self.state.on_input(ready);
    }
}

pub struct TokenPanel {
    identity: IdentityProvider,
    feed: NotificationFeed,
    selection: ClusterSelection,
    form: Mutex<TokenForm>,
}

impl TokenPanel {
    pub fn new(
        identity: IdentityProvider,
        feed: NotificationFeed,
        selection: ClusterSelection,
    ) -> Self {
        Self {
            identity,
            feed,
            selection,
            form: Mutex::new(TokenForm::default()),
        }
    }

    pub fn set_name(&self, value: &str) {
        let mut form = lock(&self.form);
        form.name = value.to_string();
        form.edited();
    }

    pub fn set_symbol(&self, value: &str) {
        let mut form = lock(&self.form);
        form.symbol = value.to_string();
        form.edited();
    }

    pub fn set_metadata_uri(&self, value: &str) {
        let mut form = lock(&self.form);
        form.uri = value.to_string();
        form.edited();
    }

    pub fn set_supply(&self, value: &str) {
        let mut form = lock(&self.form);
        form.supply = value.to_string();
        form.edited();
    }

    pub fn set_decimals(&self, value: &str) {
        let mut form = lock(&self.form);
        form.decimals = value.to_string();
        form.edited();
    }

    pub fn intent(&self) -> Result<TokenCreationIntent, PanelError> {
        lock(&self.form).intent()
    }

    pub fn state(&self) -> WorkflowState {
        lock(&self.form).state.clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.form).state.is_submitting()
    }

    pub fn can_submit(&self) -> bool {
        let form = lock(&self.form);
        self.identity.is_connected() && !form.state.is_submitting() && form.intent().is_ok()
    }

    /// Success line of the last attempt.
    pub fn status(&self) -> Option<String> {
        lock(&self.form).status.clone()
    }

    /// Error line of the last attempt.
    pub fn error(&self) -> Option<String> {
        lock(&self.form).error.clone()
    }

    /// Mint address created by the last successful submission.
    pub fn last_mint(&self) -> Option<[u8; 32]> {
        lock(&self.form).last_mint
    }

    pub fn cluster(&self) -> Cluster {
        self.selection.cluster()
    }

    pub fn select_cluster(&self, cluster: Cluster) -> Result<(), PanelError> {
        self.selection.select(cluster)
    }

    /// Create the token described by the form. A second call while one is
    /// outstanding fails with `Busy` and leaves the first undisturbed.
    pub async fn submit(&self) -> Result<SubmissionReceipt, PanelError> {
        let Some(identity) = self.identity.current() else {
            lock(&self.form).error = Some(PanelError::NoIdentity.to_string());
            self.feed
                .failure("Wallet not connected", "Please connect your wallet first");
            return Err(PanelError::NoIdentity);
        };

        let intent = {
            let mut form = lock(&self.form);
            if form.state.is_submitting() {
                return Err(PanelError::Busy);
            }
            let intent = match form.intent() {
                Ok(intent) => intent,
                Err(e) => {
                    form.error = Some(e.to_string());
                    return Err(e);
                }
            };
            form.state.begin(true)?;
            form.status = None;
            form.error = None;
            intent
        };

        let connection = self.selection.snapshot();
        let mint = SolKeypair::generate();
        info!(
            cluster = %connection.endpoint.cluster,
            mint = %mint.address(),
            symbol = %intent.metadata.symbol,
            "creating token"
        );
        let outcome =
            create_token(connection.client.as_ref(), identity.as_ref(), &intent, &mint).await;

        let mut form = lock(&self.form);
        match &outcome {
            Ok(receipt) => {
                let status = format!(
                    "Token created successfully! Transaction signature: {}",
                    receipt.signature
                );
                form.status = Some(status.clone());
                form.last_mint = Some(mint.pubkey());
                form.state.succeed(receipt.signature.clone());
                drop(form);
                self.feed.success("Token created", status);
            }
            Err(e) => {
                warn!(error = %e, "token creation failed");
                form.error = Some(FAILURE_MESSAGE.to_string());
                form.state.fail(e.to_string());
                drop(form);
                self.feed.failure("Token creation failed", FAILURE_MESSAGE);
            }
        }
        outcome
    }
}

async fn create_token(
    client: &dyn NetworkClient,
    identity: &dyn Identity,
    intent: &TokenCreationIntent,
    mint: &SolKeypair,
) -> Result<SubmissionReceipt, PanelError> {
    let rent = client.minimum_balance_for_rent_exemption(MINT_SIZE).await?;
    let instructions = token_creation_instructions(intent, &identity.address(), &mint.pubkey(), rent)?;
    let receipt = SubmissionPipeline::submit(client, identity, &instructions, &[mint]).await?;
    info!(
        signature = %receipt.signature,
        mint = %bytes_to_address(&mint.pubkey()),
        "token created"
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chain_sol::{
        ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID,
    };

    use super::*;
    use crate::config::Config;
    use crate::notification::Variant;
    use crate::test_support::{connected_provider, FakeConnector};

    fn intent() -> TokenCreationIntent {
        TokenCreationIntent::parse("Test Token", "TST", "https://example.com/t.json", "1000", "6")
            .unwrap()
    }

    fn panel(provider: IdentityProvider) -> (TokenPanel, Arc<FakeConnector>, NotificationFeed) {
        let connector = Arc::new(FakeConnector::new());
        let feed = NotificationFeed::new();
        let selection =
            ClusterSelection::new(Config::default(), connector.clone(), Cluster::Devnet).unwrap();
        (TokenPanel::new(provider, feed.clone(), selection), connector, feed)
    }

    fn fill(panel: &TokenPanel) {
        panel.set_name("Test Token");
        panel.set_symbol("TST");
        panel.set_metadata_uri("https://example.com/t.json");
        panel.set_supply("1000");
        panel.set_decimals("6");
    }

    // ─── Intent parsing ────────────────────────────────────────────

    #[test]
    fn parse_valid_form() {
        let intent = intent();
        assert_eq!(intent.supply, 1000);
        assert_eq!(intent.decimals, 6);
        assert_eq!(intent.base_units().unwrap(), 1_000_000_000);
    }

    #[test]
    fn parse_rejects_bad_numbers() {
        let parse = |supply: &str, decimals: &str| {
            TokenCreationIntent::parse("N", "S", "", supply, decimals)
        };
        assert!(parse("1.5", "0").is_err());
        assert!(parse("-1", "0").is_err());
        assert!(parse("0", "0").is_err());
        assert!(parse("10", "256").is_err());
        assert!(parse("10", "x").is_err());
        // 10 * 10^19 overflows u64.
        assert!(parse("10", "19").is_err());
        assert!(parse("1", "19").is_ok());
    }

    #[test]
    fn parse_enforces_metadata_limits() {
        let long_symbol = "ABCDEFGHIJK";
        assert!(TokenCreationIntent::parse("N", long_symbol, "", "1", "0").is_err());
        assert!(TokenCreationIntent::parse("", "S", "", "1", "0").is_err());
        assert!(TokenCreationIntent::parse("N", " ", "", "1", "0").is_err());
    }

    // ─── Instruction sequence ──────────────────────────────────────

    #[test]
    fn five_instructions_in_fixed_order() {
        let payer = SolKeypair::from_seed(&[1u8; 32]).pubkey();
        let mint = SolKeypair::from_seed(&[2u8; 32]).pubkey();
        let ixs = token_creation_instructions(&intent(), &payer, &mint, 1_461_600).unwrap();

        let programs: Vec<[u8; 32]> = ixs.iter().map(|ix| ix.program_id).collect();
        assert_eq!(
            programs,
            vec![
                SYSTEM_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                ASSOCIATED_TOKEN_PROGRAM_ID,
                TOKEN_PROGRAM_ID,
                TOKEN_METADATA_PROGRAM_ID,
            ]
        );

        // create-account: index 0, rent lamports, MINT_SIZE space, token owner
        assert_eq!(&ixs[0].data[..4], &0u32.to_le_bytes());
        assert_eq!(&ixs[0].data[4..12], &1_461_600u64.to_le_bytes());
        assert_eq!(&ixs[0].data[12..20], &MINT_SIZE.to_le_bytes());
        assert_eq!(&ixs[0].data[20..52], &TOKEN_PROGRAM_ID);

        // initialize-mint: decimals, payer as mint and freeze authority
        assert_eq!(ixs[1].data[0], 0);
        assert_eq!(ixs[1].data[1], 6);
        assert_eq!(&ixs[1].data[2..34], &payer);
        assert_eq!(ixs[1].data[34], 1);
        assert_eq!(&ixs[1].data[35..67], &payer);

        // mint-to: supply in base units into the payer's holding account
        let holding = derive_associated_token_address(&payer, &mint).unwrap();
        assert_eq!(ixs[2].accounts[1].pubkey, holding);
        assert_eq!(ixs[3].data[0], 7);
        assert_eq!(&ixs[3].data[1..9], &1_000_000_000u64.to_le_bytes());
        assert_eq!(ixs[3].accounts[1].pubkey, holding);

        // create-metadata: immutable, derived account
        assert_eq!(ixs[4].data[0], 33);
        assert_eq!(ixs[4].accounts[0].pubkey, derive_metadata_address(&mint).unwrap());
        let tail = &ixs[4].data[ixs[4].data.len() - 2..];
        assert_eq!(tail, &[0, 0], "is_mutable false, no collection details");
    }

    // ─── Panel ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn successful_creation_sets_status_and_mint() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, feed) = panel(provider);
        fill(&panel);
        assert!(panel.can_submit());

        let receipt = panel.submit().await.unwrap();
        let expected =
            format!("Token created successfully! Transaction signature: {}", receipt.signature);
        assert_eq!(panel.status().unwrap(), expected);
        let note = feed.latest().unwrap();
        assert_eq!(note.title, "Token created");
        assert_eq!(note.description, expected);
        assert_eq!(note.variant, Variant::Default);
        assert!(panel.error().is_none());
        assert!(panel.last_mint().is_some());
        assert!(!panel.is_busy());

        let network = connector.network(Cluster::Devnet);
        let state = network.state();
        assert_eq!(state.rent_requests, vec![MINT_SIZE]);
        assert_eq!(state.sent.len(), 1);
        // payer and mint both sign
        assert_eq!(state.sent[0][0], 2);
    }

    #[tokio::test]
    async fn wallet_not_connected() {
        let (panel, connector, feed) = panel(IdentityProvider::new());
        fill(&panel);
        assert!(!panel.can_submit());
        assert!(matches!(panel.submit().await, Err(PanelError::NoIdentity)));
        assert_eq!(panel.error().as_deref(), Some("Wallet not connected"));
        let note = feed.latest().unwrap();
        assert_eq!(note.title, "Wallet not connected");
        assert_eq!(note.variant, Variant::Destructive);
        assert!(connector.network(Cluster::Devnet).state().rent_requests.is_empty());
    }

    #[tokio::test]
    async fn network_failure_uses_generic_message() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, feed) = panel(provider);
        connector
            .network(Cluster::Devnet)
            .configure(|s| s.fail_send = Some("custom program error: 0x0".into()));
        fill(&panel);

        assert!(panel.submit().await.is_err());
        assert_eq!(panel.error().as_deref(), Some(FAILURE_MESSAGE));
        assert_eq!(feed.len(), 1);
        let note = feed.latest().unwrap();
        assert_eq!(note.title, "Token creation failed");
        assert_eq!(note.description, FAILURE_MESSAGE);
        assert_eq!(note.variant, Variant::Destructive);
        assert!(panel.status().is_none());
        assert!(panel.last_mint().is_none());
        assert!(!panel.is_busy());
    }

    #[tokio::test]
    async fn concurrent_submit_is_busy() {
        let (provider, _) = connected_provider(1);
        let (panel, connector, _) = panel(provider);
        let network = connector.network(Cluster::Devnet);
        let release = network.hold_sends();
        fill(&panel);

        let (first, second) = tokio::join!(panel.submit(), async {
            let second = panel.submit().await;
            release.notify_one();
            second
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(PanelError::Busy)));
        assert_eq!(network.state().sent.len(), 1);
    }
}
