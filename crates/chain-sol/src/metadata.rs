//! Token Metadata program (`metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`).
//!
//! Only `CreateMetadataAccountV3` is implemented, for fungible tokens with
//! no creators, collection, uses or royalties. Instruction arguments are
//! Borsh-encoded by hand:
//!
//! ```text
//! discriminator            u8 (33)
//! name / symbol / uri      u32 LE length + UTF-8 bytes, each
//! seller_fee_basis_points  u16 LE
//! creators                 Option tag u8 (0)
//! collection               Option tag u8 (0)
//! uses                     Option tag u8 (0)
//! is_mutable               bool u8
//! collection_details       Option tag u8 (0)
//! ```

use crate::error::SolError;
use crate::pda::find_program_address;
use crate::system_program::SYSTEM_PROGRAM_ID;
use crate::transaction::{SolAccountMeta, SolInstruction};

/// Token Metadata program ID: `metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`
pub const TOKEN_METADATA_PROGRAM_ID: [u8; 32] = [
    0x0b, 0x70, 0x65, 0xb1, 0xe3, 0xd1, 0x7c, 0x45, 0x38, 0x9d, 0x52, 0x7f, 0x6b, 0x04, 0xc3,
    0xcd, 0x58, 0xb8, 0x6c, 0x73, 0x1a, 0xa0, 0xfd, 0xb5, 0x49, 0xb6, 0xd1, 0xbc, 0x03, 0xf8,
    0x29, 0x46,
];

/// Seed prefix of every metadata account PDA.
pub const METADATA_SEED: &[u8] = b"metadata";

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

const CREATE_METADATA_ACCOUNT_V3_IX: u8 = 33;

/// Descriptive metadata attached to a mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenMetadata {
    /// Check the program's field length limits (in bytes).
    pub fn validate(&self) -> Result<(), SolError> {
        check_len("name", &self.name, MAX_NAME_LENGTH)?;
        check_len("symbol", &self.symbol, MAX_SYMBOL_LENGTH)?;
        check_len("uri", &self.uri, MAX_URI_LENGTH)
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), SolError> {
    if value.len() > max {
        return Err(SolError::InvalidMetadata(format!(
            "{field} is {} bytes, max {max}",
            value.len()
        )));
    }
    Ok(())
}

/// Derive the metadata account for `mint`:
/// seeds `["metadata", metadata_program_id, mint]`.
pub fn derive_metadata_address(mint: &[u8; 32]) -> Result<[u8; 32], SolError> {
    find_program_address(
        &[METADATA_SEED, &TOKEN_METADATA_PROGRAM_ID, mint.as_ref()],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Build a `CreateMetadataAccountV3` instruction.
#[allow(clippy::too_many_arguments)]
pub fn build_create_metadata_v3_instruction(
    metadata_account: &[u8; 32],
    mint: &[u8; 32],
    mint_authority: &[u8; 32],
    payer: &[u8; 32],
    update_authority: &[u8; 32],
    metadata: &TokenMetadata,
    is_mutable: bool,
) -> Result<SolInstruction, SolError> {
    metadata.validate()?;

    let mut data = Vec::with_capacity(
        1 + 12 + metadata.name.len() + metadata.symbol.len() + metadata.uri.len() + 6,
    );
    data.push(CREATE_METADATA_ACCOUNT_V3_IX);
    put_borsh_string(&mut data, &metadata.name);
    put_borsh_string(&mut data, &metadata.symbol);
    put_borsh_string(&mut data, &metadata.uri);
    data.extend_from_slice(&0u16.to_le_bytes()); // seller_fee_basis_points
    data.push(0); // creators: None
    data.push(0); // collection: None
    data.push(0); // uses: None
    data.push(is_mutable as u8);
    data.push(0); // collection_details: None

    Ok(SolInstruction {
        program_id: TOKEN_METADATA_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*metadata_account),
            SolAccountMeta::readonly(*mint),
            SolAccountMeta::readonly_signer(*mint_authority),
            SolAccountMeta::writable_signer(*payer),
            SolAccountMeta::readonly(*update_authority),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
        data,
    })
}

fn put_borsh_string(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}
