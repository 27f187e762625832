//! SPL Token and Associated Token Account instructions.
//!
//! Implements mint initialization, minting, associated token account (ATA)
//! creation and ATA address derivation without pulling in the `solana-sdk`
//! or the `spl-token` crates.

use crate::error::SolError;
use crate::pda::find_program_address;
use crate::system_program::{SYSTEM_PROGRAM_ID, SYSVAR_RENT_ID};
use crate::transaction::{SolAccountMeta, SolInstruction};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
];

/// Size in bytes of the SPL Token `Mint` account state.
pub const MINT_SIZE: u64 = 82;

// Token instruction tags.
const INITIALIZE_MINT_IX: u8 = 0;
const MINT_TO_IX: u8 = 7;

// ---------------------------------------------------------------------------
// Mint setup
// ---------------------------------------------------------------------------

/// Build an SPL Token `InitializeMint` instruction.
///
/// # Wire format
///
/// ```text
/// tag                     u8  (0)
/// decimals                u8
/// mint_authority          32 bytes
/// freeze_authority_option u8  (0 = none, 1 = some)
/// freeze_authority        32 bytes (zeroed when none)
/// ```
///
/// Total data: 67 bytes. Accounts: the mint (writable) and the rent sysvar.
pub fn build_initialize_mint_instruction(
    mint: &[u8; 32],
    decimals: u8,
    mint_authority: &[u8; 32],
    freeze_authority: Option<&[u8; 32]>,
) -> SolInstruction {
    let mut data = Vec::with_capacity(67);
    data.push(INITIALIZE_MINT_IX);
    data.push(decimals);
    data.extend_from_slice(mint_authority);
    match freeze_authority {
        Some(authority) => {
            data.push(1);
            data.extend_from_slice(authority);
        }
        None => {
            data.push(0);
            data.extend_from_slice(&[0u8; 32]);
        }
    }

    SolInstruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*mint),
            SolAccountMeta::readonly(SYSVAR_RENT_ID),
        ],
        data,
    }
}

/// Build an SPL Token `MintTo` instruction.
///
/// `amount` is in base units (`whole_tokens * 10^decimals`).
pub fn build_mint_to_instruction(
    mint: &[u8; 32],
    destination: &[u8; 32],
    authority: &[u8; 32],
    amount: u64,
) -> Result<SolInstruction, SolError> {
    if amount == 0 {
        return Err(SolError::TransactionBuildError(
            "mint amount must be > 0".into(),
        ));
    }

    // [7] (MintTo) + u64 LE amount = 9 bytes.
    let mut data = Vec::with_capacity(9);
    data.push(MINT_TO_IX);
    data.extend_from_slice(&amount.to_le_bytes());

    Ok(SolInstruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*mint),
            SolAccountMeta::writable(*destination),
            SolAccountMeta::readonly_signer(*authority),
        ],
        data,
    })
}

// ---------------------------------------------------------------------------
// Associated Token Account
// ---------------------------------------------------------------------------

/// Build an Associated Token Account program `Create` instruction.
///
/// The instruction carries no data; the account list alone identifies the
/// ATA to create for `owner` and `mint`, paid for by `payer`.
pub fn build_create_associated_token_account_instruction(
    payer: &[u8; 32],
    associated_account: &[u8; 32],
    owner: &[u8; 32],
    mint: &[u8; 32],
) -> SolInstruction {
    SolInstruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable_signer(*payer),
            SolAccountMeta::writable(*associated_account),
            SolAccountMeta::readonly(*owner),
            SolAccountMeta::readonly(*mint),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID),
            SolAccountMeta::readonly(TOKEN_PROGRAM_ID),
        ],
        data: Vec::new(),
    }
}

/// Derive the associated token account address for a wallet + mint pair.
///
/// Seeds: `[wallet_address, token_program_id, mint_address]`, derived from
/// the Associated Token Account program.
pub fn derive_associated_token_address(
    wallet: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], SolError> {
    find_program_address(
        &[wallet.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}
