//! The connected signer and the provider that holds it.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chain_sol::{bytes_to_address, SolKeypair};
use tracing::info;

use crate::error::PanelError;
use crate::lock;

/// A signer the dashboard can act for.
#[async_trait]
pub trait Identity: Send + Sync {
    /// 32-byte public key; also the fee payer of every submission.
    fn address(&self) -> [u8; 32];

    /// Sign a serialized transaction message. External wallets may refuse,
    /// which surfaces as `PanelError::Signing`.
    async fn sign_message(&self, message: &[u8]) -> Result<[u8; 64], PanelError>;
}

/// Identity backed by a keypair held in memory.
pub struct KeypairIdentity {
    keypair: SolKeypair,
}

impl KeypairIdentity {
    pub fn new(keypair: SolKeypair) -> Self {
        Self { keypair }
    }

    /// Load a Solana CLI keypair file (JSON array of 64 numbers).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PanelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PanelError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?;
        let keypair = SolKeypair::from_keypair_json(&json)?;
        Ok(Self::new(keypair))
    }
}

impl std::fmt::Debug for KeypairIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairIdentity")
            .field("address", &self.keypair.address())
            .finish()
    }
}

#[async_trait]
impl Identity for KeypairIdentity {
    fn address(&self) -> [u8; 32] {
        self.keypair.pubkey()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<[u8; 64], PanelError> {
        Ok(self.keypair.sign(message))
    }
}

/// Holds at most one active identity. Clones share the same slot, so every
/// panel sees the same connection state.
#[derive(Clone, Default)]
pub struct IdentityProvider {
    active: Arc<Mutex<Option<Arc<dyn Identity>>>>,
}

impl IdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `identity` the active one, replacing any previous identity.
    pub fn connect(&self, identity: Arc<dyn Identity>) -> [u8; 32] {
        let address = identity.address();
        info!(address = %bytes_to_address(&address), "identity connected");
        *lock(&self.active) = Some(identity);
        address
    }

    pub fn disconnect(&self) {
        if lock(&self.active).take().is_some() {
            info!("identity disconnected");
        }
    }

    pub fn current(&self) -> Option<Arc<dyn Identity>> {
        lock(&self.active).clone()
    }

    pub fn address(&self) -> Option<[u8; 32]> {
        lock(&self.active).as_ref().map(|identity| identity.address())
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.active).is_some()
    }
}

impl std::fmt::Debug for IdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityProvider")
            .field("address", &self.address().map(|a| bytes_to_address(&a)))
            .finish()
    }
}
