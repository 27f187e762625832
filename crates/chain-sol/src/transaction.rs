//! Manual Solana transaction wire format and signing.
//!
//! We build Solana transactions entirely by hand, without `solana-sdk`.
//! The wire format is a compact binary layout documented here:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! Signatures appear in the same order as the first `num_required_sigs`
//! account keys, so a transaction with co-signers (e.g. a freshly generated
//! mint account) carries one slot per signer.

use ed25519_dalek::{Signature, VerifyingKey};

use crate::address::bytes_to_address;
use crate::error::SolError;
use crate::keypair::SolKeypair;

/// Account indices are a single byte on the wire.
const MAX_ACCOUNT_KEYS: usize = 256;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

fn put_compact_len(buf: &mut Vec<u8>, len: usize, what: &str) -> Result<(), SolError> {
    let len = u16::try_from(len).map_err(|_| {
        SolError::TransactionBuildError(format!("too many {what} for compact-u16: {len}"))
    })?;
    buf.extend_from_slice(&encode_compact_u16(len));
    Ok(())
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SolAccountMeta {
    pub fn writable_signer(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable: true,
        }
    }

    pub fn readonly_signer(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: true,
            is_writable: false,
        }
    }

    pub fn writable(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: [u8; 32]) -> Self {
        Self {
            pubkey,
            is_signer: false,
            is_writable: false,
        }
    }
}

/// A Solana instruction (before it is compiled into a transaction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled, unsigned Solana transaction message.
#[derive(Debug, Clone)]
pub struct SolTransaction {
    /// All account keys referenced by this transaction, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<[u8; 32]>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,

    /// Recent blockhash (32 bytes).
    pub recent_blockhash: [u8; 32],

    /// Compiled instructions (account references replaced with indices).
    pub compiled_instructions: Vec<CompiledInstruction>,
}

impl SolTransaction {
    /// The accounts whose signatures the transaction requires, in slot order.
    pub fn signer_keys(&self) -> &[[u8; 32]] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// The fee payer (always the first signer).
    pub fn fee_payer(&self) -> &[u8; 32] {
        &self.account_keys[0]
    }
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the transaction's `account_keys` array.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    /// Index into `account_keys` for the program to invoke.
    pub program_id_index: u8,
    /// Indices into `account_keys` for each account the instruction reads/writes.
    pub account_indices: Vec<u8>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

/// Compile instructions into a transaction message with a single fee payer.
///
/// The fee payer is always a writable signer and is placed at index 0 in the
/// account keys. Instruction order is preserved exactly.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "transaction has no instructions".into(),
        ));
    }

    struct AccountEntry {
        pubkey: [u8; 32],
        is_signer: bool,
        is_writable: bool,
    }

    // Instruction account lists are tiny, so a Vec scan beats a map here.
    let mut entries: Vec<AccountEntry> = Vec::new();
    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);
    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    if entries.len() > MAX_ACCOUNT_KEYS {
        return Err(SolError::TransactionBuildError(format!(
            "{} accounts exceed the {MAX_ACCOUNT_KEYS} account limit",
            entries.len()
        )));
    }

    // Stable sort: within a category insertion order is kept, so the fee
    // payer (inserted first, writable signer) stays at index 0.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    let header_count = |what: &str, count: usize| {
        u8::try_from(count).map_err(|_| {
            SolError::TransactionBuildError(format!("{count} {what} do not fit the message header"))
        })
    };
    let num_signers = header_count("signers", entries.iter().filter(|e| e.is_signer).count())?;
    let num_readonly_signed = header_count(
        "read-only signers",
        entries.iter().filter(|e| e.is_signer && !e.is_writable).count(),
    )?;
    let num_readonly_unsigned = header_count(
        "read-only accounts",
        entries.iter().filter(|e| !e.is_signer && !e.is_writable).count(),
    )?;

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();
    let index_of = |key: &[u8; 32]| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| u8::try_from(i).ok())
            .ok_or_else(|| {
                SolError::TransactionBuildError(format!(
                    "account {} not in account keys",
                    bytes_to_address(key)
                ))
            })
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled.push(CompiledInstruction {
            program_id_index: index_of(&ix.program_id)?,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(512);

    // Header: 3 bytes.
    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    put_compact_len(&mut buf, tx.account_keys.len(), "account keys")?;
    for key in &tx.account_keys {
        buf.extend_from_slice(key);
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    put_compact_len(&mut buf, tx.compiled_instructions.len(), "instructions")?;
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        put_compact_len(&mut buf, ix.account_indices.len(), "instruction accounts")?;
        buf.extend_from_slice(&ix.account_indices);

        put_compact_len(&mut buf, ix.data.len(), "instruction data bytes")?;
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Assemble the wire transaction from a serialized `message` and the
/// signatures collected for it.
///
/// Each `(pubkey, signature)` pair is placed in the slot of the matching
/// signer. Every required signer must be covered and every signature must
/// verify against the message; extra signatures for non-signers are an error.
pub fn assemble_signed_transaction(
    tx: &SolTransaction,
    message: &[u8],
    signatures: &[([u8; 32], [u8; 64])],
) -> Result<Vec<u8>, SolError> {
    let signers = tx.signer_keys();

    if let Some((extra, _)) = signatures.iter().find(|(k, _)| !signers.contains(k)) {
        return Err(SolError::SigningError(format!(
            "{} is not a signer of this transaction",
            bytes_to_address(extra)
        )));
    }

    let mut wire = Vec::with_capacity(3 + signers.len() * 64 + message.len());
    put_compact_len(&mut wire, signers.len(), "signatures")?;

    for signer in signers {
        let (_, sig_bytes) = signatures
            .iter()
            .find(|(k, _)| k == signer)
            .ok_or_else(|| {
                SolError::SigningError(format!(
                    "missing signature for {}",
                    bytes_to_address(signer)
                ))
            })?;

        let vk = VerifyingKey::from_bytes(signer).map_err(|e| {
            SolError::SigningError(format!("signer is not an ed25519 key: {e}"))
        })?;
        vk.verify_strict(message, &Signature::from_bytes(sig_bytes))
            .map_err(|_| {
                SolError::SigningError(format!(
                    "signature for {} does not verify",
                    bytes_to_address(signer)
                ))
            })?;

        wire.extend_from_slice(sig_bytes);
    }

    wire.extend_from_slice(message);
    Ok(wire)
}

/// Sign a transaction with local keypairs and serialize it to wire format.
pub fn sign_transaction(tx: &SolTransaction, signers: &[&SolKeypair]) -> Result<Vec<u8>, SolError> {
    let message = serialize_message(tx)?;
    let signatures: Vec<([u8; 32], [u8; 64])> = signers
        .iter()
        .map(|kp| (kp.pubkey(), kp.sign(&message)))
        .collect();
    assemble_signed_transaction(tx, &message, &signatures)
}
