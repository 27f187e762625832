//! Ed25519 keypairs in the form Solana tooling uses.
//!
//! A Solana CLI keypair file is a JSON array of 64 numbers: the 32-byte
//! secret seed followed by the 32-byte public key.

use ed25519_dalek::{Signer, SigningKey};
use rand_core::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::address::bytes_to_address;
use crate::error::SolError;

/// An Ed25519 keypair. The secret half is zeroized on drop by
/// `ed25519-dalek`.
pub struct SolKeypair {
    signing_key: SigningKey,
}

impl SolKeypair {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut copy = *seed;
        let signing_key = SigningKey::from_bytes(&copy);
        copy.zeroize();
        Self { signing_key }
    }

    /// Parse a Solana CLI keypair JSON document.
    pub fn from_keypair_json(json: &str) -> Result<Self, SolError> {
        let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
            serde_json::from_str(json)
                .map_err(|e| SolError::InvalidKeypair(format!("not a JSON byte array: {e}")))?,
        );

        if bytes.len() != 64 {
            return Err(SolError::InvalidKeypair(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_seed(&seed);
        seed.zeroize();

        if keypair.pubkey()[..] != bytes[32..] {
            return Err(SolError::InvalidKeypair(
                "public key does not match secret key".into(),
            ));
        }

        Ok(keypair)
    }

    /// The 32-byte public key.
    pub fn pubkey(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The Base58 address of the public key.
    pub fn address(&self) -> String {
        bytes_to_address(&self.pubkey())
    }

    /// Sign `message`, returning the 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for SolKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolKeypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
