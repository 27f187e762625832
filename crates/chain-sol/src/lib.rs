//! Solana protocol primitives for the dashboard.
//!
//! This crate handles Solana addresses, keypairs, program-derived addresses,
//! the instruction builders the dashboard needs (System, SPL Token,
//! Associated Token Account, Token Metadata), and the compact binary wire
//! format, all without pulling in `solana-sdk` (which drags in tokio and 200+
//! transitive dependencies).
//!
//! Instead we implement Solana's compact binary wire format by hand, using
//! `ed25519-dalek` for Ed25519 signing and `bs58` for Base58 encoding.

pub mod address;
pub mod error;
pub mod keypair;
pub mod metadata;
pub mod pda;
pub mod spl_token;
pub mod system_program;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{address_to_bytes, bytes_to_address, parse_address, validate_address};
pub use error::SolError;
pub use keypair::SolKeypair;
pub use metadata::{
    build_create_metadata_v3_instruction, derive_metadata_address, TokenMetadata,
    TOKEN_METADATA_PROGRAM_ID,
};
pub use pda::find_program_address;
pub use spl_token::{
    build_create_associated_token_account_instruction, build_initialize_mint_instruction,
    build_mint_to_instruction, derive_associated_token_address, ASSOCIATED_TOKEN_PROGRAM_ID,
    MINT_SIZE, TOKEN_PROGRAM_ID,
};
pub use system_program::{
    build_create_account_instruction, build_transfer_instruction, SYSTEM_PROGRAM_ID,
    SYSVAR_RENT_ID,
};
pub use transaction::{
    assemble_signed_transaction, compile_transaction, encode_compact_u16, serialize_message,
    sign_transaction, CompiledInstruction, SolAccountMeta, SolInstruction, SolTransaction,
};
