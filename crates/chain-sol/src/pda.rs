//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || ... || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")`, searched over bump seeds from 255 down to 0
//! until the digest is NOT a valid Ed25519 point (so no private key exists).

use sha2::{Digest, Sha256};

use crate::error::SolError;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Find a valid PDA for the given seeds and program, returning the address
/// and the bump seed that produced it.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), SolError> {
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(SolError::InvalidAddress(format!(
            "PDA seed is {} bytes, max {MAX_SEED_LEN}",
            seed.len()
        )));
    }

    for bump in (0u8..=255).rev() {
        if let Some(address) = create_program_address(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }

    Err(SolError::InvalidAddress(
        "could not find valid PDA bump seed".into(),
    ))
}

/// Attempt to create a PDA from seeds + bump + program_id.
///
/// Returns `None` if the digest falls on the Ed25519 curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &[u8; 32],
) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }
    Some(hash)
}

/// Check if 32 bytes decompress to an Ed25519 curve point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pda_is_not_on_curve() {
        let (address, _) = find_program_address(&[b"seed"], &[0xAB; 32]).unwrap();
        assert!(!is_on_curve(&address));
    }

    #[test]
    fn bump_reproduces_address() {
        let program = [0x11u8; 32];
        let (address, bump) = find_program_address(&[b"a", b"b"], &program).unwrap();
        assert_eq!(
            create_program_address(&[b"a", b"b"], bump, &program),
            Some(address)
        );
    }

    #[test]
    fn different_seeds_give_different_addresses() {
        let program = [0x22u8; 32];
        let (a, _) = find_program_address(&[b"one"], &program).unwrap();
        let (b, _) = find_program_address(&[b"two"], &program).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn oversized_seed_is_rejected() {
        let long = [0u8; 33];
        assert!(find_program_address(&[&long], &[0u8; 32]).is_err());
    }

    #[test]
    fn basepoint_is_on_curve() {
        // The Ed25519 basepoint (compressed form).
        let mut basepoint = [0x66u8; 32];
        basepoint[0] = 0x58;
        assert!(is_on_curve(&basepoint));
    }

    #[test]
    fn off_curve_bytes_detected() {
        // y = 0x0202...02 has no matching x coordinate.
        assert!(!is_on_curve(&[0x02; 32]));
    }
}
