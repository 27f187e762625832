//! System Program instructions.

use crate::transaction::{SolAccountMeta, SolInstruction};

/// The Solana System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: [u8; 32] = [
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
];

// System instruction indices (little-endian u32).
const CREATE_ACCOUNT_IX_INDEX: u32 = 0;
const TRANSFER_IX_INDEX: u32 = 2;

/// Build a System Program `Transfer` instruction moving `lamports` from
/// `from` (signer) to `to`.
pub fn build_transfer_instruction(from: &[u8; 32], to: &[u8; 32], lamports: u64) -> SolInstruction {
    // u32 LE instruction index + u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable_signer(*from),
            SolAccountMeta::writable(*to),
        ],
        data,
    }
}

/// Build a System Program `CreateAccount` instruction.
///
/// `from` funds the new account with `lamports`, allocates `space` bytes and
/// assigns it to `owner`. Both `from` and `new_account` must sign.
pub fn build_create_account_instruction(
    from: &[u8; 32],
    new_account: &[u8; 32],
    lamports: u64,
    space: u64,
    owner: &[u8; 32],
) -> SolInstruction {
    // u32 index + u64 lamports + u64 space + 32-byte owner = 52 bytes.
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&CREATE_ACCOUNT_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner);

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable_signer(*from),
            SolAccountMeta::writable_signer(*new_account),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;

    #[test]
    fn rent_sysvar_roundtrip() {
        assert_eq!(
            address::bytes_to_address(&SYSVAR_RENT_ID),
            "SysvarRent111111111111111111111111111111111"
        );
    }

    // -- Transfer -----------------------------------------------------------

    #[test]
    fn transfer_data_layout() {
        let ix = build_transfer_instruction(&[1u8; 32], &[2u8; 32], 1_000_000);
        assert_eq!(ix.data.len(), 12);
        assert_eq!(&ix.data[..4], &[2, 0, 0, 0]);
        assert_eq!(&ix.data[4..], &1_000_000u64.to_le_bytes());
        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn transfer_account_roles() {
        let from = [0xAAu8; 32];
        let to = [0xBBu8; 32];
        let ix = build_transfer_instruction(&from, &to, 500);

        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, from);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, to);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }

    // -- CreateAccount ------------------------------------------------------

    #[test]
    fn create_account_data_layout() {
        let owner = [0x06u8; 32];
        let ix = build_create_account_instruction(&[1u8; 32], &[2u8; 32], 1_461_600, 82, &owner);

        assert_eq!(ix.data.len(), 52);
        assert_eq!(&ix.data[..4], &[0, 0, 0, 0]);
        assert_eq!(
            u64::from_le_bytes(ix.data[4..12].try_into().unwrap()),
            1_461_600
        );
        assert_eq!(u64::from_le_bytes(ix.data[12..20].try_into().unwrap()), 82);
        assert_eq!(&ix.data[20..], &owner);
    }

    #[test]
    fn create_account_both_accounts_sign() {
        let ix = build_create_account_instruction(&[1u8; 32], &[2u8; 32], 1, 0, &[0u8; 32]);
        assert!(ix.accounts.iter().all(|a| a.is_signer && a.is_writable));
    }
}
