//! In-memory fakes for the network and identity seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::endpoint::{Cluster, Connector, Endpoint};
use crate::error::PanelError;
use crate::identity::{Identity, IdentityProvider, KeypairIdentity};
use crate::lock;
use crate::network::NetworkClient;
use crate::types::{SubmissionStatus, TransactionDetail, TransactionRecord};
use chain_sol::SolKeypair;

pub(crate) fn signature_string(sig: &[u8; 64]) -> String {
    bs58::encode(sig).into_string()
}

/// Recorded calls and canned responses.
#[derive(Default)]
pub(crate) struct FakeState {
    pub blockhash_requests: usize,
    pub rent_requests: Vec<u64>,
    pub send_attempts: usize,
    pub sent: Vec<Vec<u8>>,
    pub status_lookups: Vec<String>,
    pub airdrops: Vec<([u8; 32], u64)>,
    pub history_requests: Vec<([u8; 32], usize)>,
    pub detail_requests: Vec<String>,

    pub rent: u64,
    pub status: Option<SubmissionStatus>,
    pub records: Vec<TransactionRecord>,
    pub detail: Option<TransactionDetail>,

    pub fail_send: Option<String>,
    pub fail_status: Option<String>,
    pub fail_airdrop: Option<String>,
    pub fail_history: Option<String>,
    pub fail_detail: Option<String>,
}

pub(crate) struct FakeNetwork {
    pub label: String,
    state: Mutex<FakeState>,
    /// When set, `send_transaction` waits for a notification first.
    gate: Mutex<Option<Arc<Notify>>>,
    /// Same for `transaction_detail`.
    detail_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeNetwork {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            state: Mutex::new(FakeState {
                rent: 1_461_600,
                ..FakeState::default()
            }),
            gate: Mutex::new(None),
            detail_gate: Mutex::new(None),
        }
    }

    pub fn configure(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut lock(&self.state));
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    pub fn hold_sends(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *lock(&self.gate) = Some(notify.clone());
        notify
    }

    pub fn hold_details(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *lock(&self.detail_gate) = Some(notify.clone());
        notify
    }
}

fn canned(failure: &Option<String>) -> Result<(), PanelError> {
    match failure {
        Some(message) => Err(PanelError::Transport(message.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl NetworkClient for FakeNetwork {
    async fn latest_blockhash(&self) -> Result<[u8; 32], PanelError> {
        self.state().blockhash_requests += 1;
        Ok([42u8; 32])
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: u64) -> Result<u64, PanelError> {
        let mut state = self.state();
        state.rent_requests.push(data_len);
        Ok(state.rent)
    }

    async fn send_transaction(&self, wire: &[u8]) -> Result<String, PanelError> {
        let gate = lock(&self.gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut state = self.state();
        state.send_attempts += 1;
        canned(&state.fail_send)?;
        state.sent.push(wire.to_vec());
        let mut sig = [0u8; 64];
        sig.copy_from_slice(&wire[1..65]);
        Ok(signature_string(&sig))
    }

    async fn signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SubmissionStatus>, PanelError> {
        let mut state = self.state();
        state.status_lookups.push(signature.to_string());
        canned(&state.fail_status)?;
        Ok(state.status.clone())
    }

    async fn request_airdrop(
        &self,
        address: &[u8; 32],
        lamports: u64,
    ) -> Result<String, PanelError> {
        let mut state = self.state();
        canned(&state.fail_airdrop)?;
        state.airdrops.push((*address, lamports));
        Ok(format!("airdrop-{}-{}", self.label, state.airdrops.len()))
    }

    async fn recent_transactions(
        &self,
        address: &[u8; 32],
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, PanelError> {
        let mut state = self.state();
        state.history_requests.push((*address, limit));
        canned(&state.fail_history)?;
        Ok(state.records.iter().take(limit).cloned().collect())
    }

    async fn transaction_detail(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionDetail>, PanelError> {
        let gate = lock(&self.detail_gate).clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut state = self.state();
        state.detail_requests.push(signature.to_string());
        canned(&state.fail_detail)?;
        Ok(state.detail.clone())
    }
}

/// Hands out one `FakeNetwork` per cluster, reused across reconnects.
pub(crate) struct FakeConnector {
    networks: Mutex<HashMap<Cluster, Arc<FakeNetwork>>>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self {
            networks: Mutex::new(HashMap::new()),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn network(&self, cluster: Cluster) -> Arc<FakeNetwork> {
        lock(&self.networks)
            .entry(cluster)
            .or_insert_with(|| Arc::new(FakeNetwork::new(cluster.name())))
            .clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Connector for FakeConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn NetworkClient>, PanelError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.network(endpoint.cluster))
    }
}

/// Identity whose signer always refuses.
pub(crate) struct RejectingIdentity {
    address: [u8; 32],
}

impl RejectingIdentity {
    pub fn new(address: [u8; 32]) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Identity for RejectingIdentity {
    fn address(&self) -> [u8; 32] {
        self.address
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<[u8; 64], PanelError> {
        Err(PanelError::Signing("user rejected the request".into()))
    }
}

/// Provider with a keypair identity already connected.
pub(crate) fn connected_provider(seed: u8) -> (IdentityProvider, [u8; 32]) {
    let provider = IdentityProvider::new();
    let address = provider.connect(Arc::new(KeypairIdentity::new(SolKeypair::from_seed(
        &[seed; 32],
    ))));
    (provider, address)
}

pub(crate) fn records(n: usize) -> Vec<TransactionRecord> {
    (0..n)
        .map(|i| TransactionRecord {
            signature: format!("sig{i}"),
            slot: 1_000 - i as u64,
            block_time: Some(1_700_000_000 - i as i64),
            succeeded: true,
            confirmation_status: None,
            memo: None,
        })
        .collect()
}
