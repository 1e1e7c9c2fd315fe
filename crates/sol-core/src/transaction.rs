//! Legacy transaction messages: compilation, serialization, signing.
//!
//! Wire layout, all counts compact-u16 unless noted:
//!
//! ```text
//! signatures      count, then 64 bytes each
//! header          required sigs (u8), readonly signed (u8), readonly unsigned (u8)
//! account keys    count, then 32 bytes each
//! blockhash       32 bytes
//! instructions    count, then per instruction:
//!                 program index (u8), account indices (count + u8 each),
//!                 data (count + bytes)
//! ```

use crate::address::{encode_address, Pubkey};
use crate::error::SolError;
use crate::keypair::Keypair;

/// Account keys a legacy message can index with a u8.
const MAX_ACCOUNT_KEYS: usize = 256;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode `value` as compact-u16: 7 bits per byte, high bit set while more
/// bytes follow. One byte below 0x80, two below 0x4000, three above.
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut rest = u32::from(value);
    let mut out = Vec::with_capacity(3);

    loop {
        let low = (rest & 0x7f) as u8;
        rest >>= 7;
        if rest == 0 {
            out.push(low);
            return out;
        }
        out.push(low | 0x80);
    }
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let value = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("{what} count {len} exceeds u16")))?;
    Ok(encode_compact_u16(value))
}

fn push_compact(buf: &mut Vec<u8>, len: usize, what: &str) -> Result<(), SolError> {
    buf.extend_from_slice(&compact_len(len, what)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// One account slot of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SolAccountMeta {
    pub fn writable(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An uncompiled instruction: program, account slots, opaque data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: Pubkey,
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

impl SolInstruction {
    /// Whether any account slot of this instruction is `pubkey`.
    pub fn references(&self, pubkey: &Pubkey) -> bool {
        self.accounts.iter().any(|meta| meta.pubkey == *pubkey)
    }
}

/// A compiled message, ready to serialize and sign.
///
/// `account_keys` is grouped as writable signers (fee payer at 0), readonly
/// signers, writable non-signers, readonly non-signers. The three header
/// counts describe those group boundaries.
#[derive(Debug, Clone)]
pub struct SolTransaction {
    pub account_keys: Vec<Pubkey>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub compiled_instructions: Vec<CompiledInstruction>,
}

impl SolTransaction {
    /// The accounts whose signatures this message requires, in slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.num_required_signatures as usize]
    }
}

/// An instruction with its program and accounts replaced by positions in
/// `SolTransaction::account_keys`.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

fn header_count(count: usize, what: &str) -> Result<u8, SolError> {
    u8::try_from(count).map_err(|_| {
        SolError::TransactionBuildError(format!("{count} {what} accounts do not fit the header"))
    })
}

/// Compile `instructions` into a message paid for by `fee_payer`.
///
/// Every key appears once with the union of the permissions it is given;
/// program ids join as readonly non-signers. The fee payer sits at index 0.
/// Instruction order is kept as given.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "no instructions to compile".into(),
        ));
    }

    // (key, signer, writable) in first-seen order, payer first.
    let mut keys: Vec<(Pubkey, bool, bool)> = vec![(*fee_payer, true, true)];
    let slots = instructions.iter().flat_map(|ix| {
        ix.accounts
            .iter()
            .map(|meta| (meta.pubkey, meta.is_signer, meta.is_writable))
            .chain(std::iter::once((ix.program_id, false, false)))
    });
    for (pubkey, signer, writable) in slots {
        match keys.iter_mut().find(|(key, _, _)| *key == pubkey) {
            Some((_, is_signer, is_writable)) => {
                *is_signer |= signer;
                *is_writable |= writable;
            }
            None => keys.push((pubkey, signer, writable)),
        }
    }

    if keys.len() > MAX_ACCOUNT_KEYS {
        return Err(SolError::TransactionBuildError(format!(
            "{} account keys exceeds the limit of {MAX_ACCOUNT_KEYS}",
            keys.len()
        )));
    }

    // Stable: the payer stays ahead of the other writable signers.
    keys.sort_by_key(|&(_, signer, writable)| (!signer, !writable));

    let signed = keys.iter().filter(|(_, signer, _)| *signer).count();
    let readonly_signed = keys.iter().filter(|(_, s, w)| *s && !*w).count();
    let readonly_unsigned = keys.iter().filter(|(_, s, w)| !*s && !*w).count();

    let account_keys: Vec<Pubkey> = keys.into_iter().map(|(key, _, _)| key).collect();
    let index_of = |key: &Pubkey| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .and_then(|i| u8::try_from(i).ok())
            .ok_or_else(|| {
                SolError::TransactionBuildError(format!(
                    "{} not in account keys",
                    encode_address(key)
                ))
            })
    };

    let compiled_instructions = instructions
        .iter()
        .map(|ix| -> Result<CompiledInstruction, SolError> {
            Ok(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                account_indices: ix
                    .accounts
                    .iter()
                    .map(|meta| index_of(&meta.pubkey))
                    .collect::<Result<Vec<u8>, SolError>>()?,
                data: ix.data.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SolTransaction {
        num_required_signatures: header_count(signed, "signer")?,
        num_readonly_signed: header_count(readonly_signed, "readonly signer")?,
        num_readonly_unsigned: header_count(readonly_unsigned, "readonly")?,
        account_keys,
        recent_blockhash: *recent_blockhash,
        compiled_instructions,
    })
}

/// The message bytes that every signer signs.
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut out = vec![
        tx.num_required_signatures,
        tx.num_readonly_signed,
        tx.num_readonly_unsigned,
    ];

    push_compact(&mut out, tx.account_keys.len(), "account key")?;
    out.extend(tx.account_keys.iter().flatten());
    out.extend_from_slice(&tx.recent_blockhash);

    push_compact(&mut out, tx.compiled_instructions.len(), "instruction")?;
    for compiled in &tx.compiled_instructions {
        out.push(compiled.program_id_index);
        push_compact(&mut out, compiled.account_indices.len(), "account index")?;
        out.extend_from_slice(&compiled.account_indices);
        push_compact(&mut out, compiled.data.len(), "data byte")?;
        out.extend_from_slice(&compiled.data);
    }

    Ok(out)
}

/// Sign `tx` with `signers` and return the wire transaction.
///
/// Every required signer of the message must be present in `signers`; extra
/// keypairs are ignored. Signatures are written in the message's signer
/// order. The result is ready for `sendTransaction`.
pub fn sign_transaction(tx: &SolTransaction, signers: &[&Keypair]) -> Result<Vec<u8>, SolError> {
    let message = serialize_message(tx)?;

    let signatures = tx
        .signer_keys()
        .iter()
        .map(|key| {
            signers
                .iter()
                .find(|kp| kp.pubkey() == *key)
                .map(|kp| kp.sign(&message))
                .ok_or_else(|| SolError::MissingSigner(encode_address(key)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut wire = compact_len(signatures.len(), "signature")?;
    wire.reserve(64 * signatures.len() + message.len());
    wire.extend(signatures.iter().flatten());
    wire.extend_from_slice(&message);

    Ok(wire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SYSTEM_PROGRAM_ID;
    use ed25519_dalek::{Signature, VerifyingKey};

    const PROGRAM: Pubkey = [0x77u8; 32];

    fn ix(accounts: Vec<SolAccountMeta>, tag: u8) -> SolInstruction {
        SolInstruction {
            program_id: PROGRAM,
            accounts,
            data: vec![tag],
        }
    }

    #[test]
    fn compact_u16_byte_widths() {
        let cases: [(u16, &[u8]); 6] = [
            (0, &[0x00]),
            (0x7f, &[0x7f]),
            (0x80, &[0x80, 0x01]),
            (0x3fff, &[0xff, 0x7f]),
            (0x4000, &[0x80, 0x80, 0x01]),
            (u16::MAX, &[0xff, 0xff, 0x03]),
        ];
        for (value, expected) in cases {
            assert_eq!(encode_compact_u16(value), expected, "value {value:#x}");
        }
    }

    #[test]
    fn compact_len_rejects_oversized_counts() {
        assert!(compact_len(70_000, "account key").is_err());
    }

    #[test]
    fn compile_rejects_empty_instruction_list() {
        let result = compile_transaction(&[], &[1u8; 32], &[0u8; 32]);
        assert!(result.is_err());
    }

    #[test]
    fn fee_payer_is_first_even_when_seen_later() {
        let payer = [0x01u8; 32];
        let other_signer = [0x02u8; 32];
        let first = ix(vec![SolAccountMeta::writable(other_signer, true)], 0);
        let second = ix(vec![SolAccountMeta::writable(payer, true)], 1);

        let tx = compile_transaction(&[first, second], &payer, &[0u8; 32]).unwrap();
        assert_eq!(tx.account_keys[0], payer);
        assert_eq!(tx.signer_keys(), &[payer, other_signer]);
    }

    #[test]
    fn account_categories_are_sorted() {
        let payer = [0x01u8; 32];
        let ro_signer = [0x02u8; 32];
        let writable = [0x03u8; 32];
        let readonly = [0x04u8; 32];

        let instruction = ix(
            vec![
                SolAccountMeta::readonly(readonly, false),
                SolAccountMeta::writable(writable, false),
                SolAccountMeta::readonly(ro_signer, true),
            ],
            0,
        );
        let tx = compile_transaction(&[instruction], &payer, &[0u8; 32]).unwrap();

        assert_eq!(
            tx.account_keys,
            vec![payer, ro_signer, writable, readonly, PROGRAM]
        );
        assert_eq!(tx.num_required_signatures, 2);
        assert_eq!(tx.num_readonly_signed, 1);
        assert_eq!(tx.num_readonly_unsigned, 2);
    }

    #[test]
    fn duplicate_accounts_merge_permissions() {
        let payer = [0x01u8; 32];
        let shared = [0x05u8; 32];
        let a = ix(vec![SolAccountMeta::readonly(shared, false)], 0);
        let b = ix(vec![SolAccountMeta::writable(shared, false)], 1);

        let tx = compile_transaction(&[a, b], &payer, &[0u8; 32]).unwrap();
        // payer, shared (writable), program
        assert_eq!(tx.account_keys.len(), 3);
        assert_eq!(tx.account_keys[1], shared);
        assert_eq!(tx.num_readonly_unsigned, 1);
    }

    #[test]
    fn instruction_order_is_preserved() {
        let payer = [0x01u8; 32];
        let ixs: Vec<_> = (0..4).map(|tag| ix(vec![], tag)).collect();
        let tx = compile_transaction(&ixs, &payer, &[0u8; 32]).unwrap();
        let tags: Vec<u8> = tx.compiled_instructions.iter().map(|c| c.data[0]).collect();
        assert_eq!(tags, vec![0, 1, 2, 3]);
    }

    #[test]
    fn references_checks_account_slots() {
        let target = [0x09u8; 32];
        let instruction = ix(vec![SolAccountMeta::readonly(target, false)], 0);
        assert!(instruction.references(&target));
        assert!(!instruction.references(&SYSTEM_PROGRAM_ID));
    }

    #[test]
    fn message_layout_header_and_blockhash() {
        let payer = [0x01u8; 32];
        let blockhash = [0xCCu8; 32];
        let tx = compile_transaction(&[ix(vec![], 9)], &payer, &blockhash).unwrap();
        let msg = serialize_message(&tx).unwrap();

        assert_eq!(&msg[..3], &[1, 0, 1]);
        // header(3) + compact(2 keys)(1) + 2 * 32
        let offset = 3 + 1 + 64;
        assert_eq!(&msg[offset..offset + 32], &blockhash);
        // one instruction: program index 1, no accounts, one data byte
        assert_eq!(&msg[offset + 32..], &[1, 1, 0, 1, 9]);
    }

    #[test]
    fn multi_signer_transaction_verifies() {
        let payer = Keypair::from_secret(&[0x42u8; 32]);
        let mint = Keypair::from_secret(&[0x43u8; 32]);
        let instruction = ix(
            vec![
                SolAccountMeta::writable(mint.pubkey(), true),
                SolAccountMeta::writable(payer.pubkey(), true),
            ],
            0,
        );
        let tx = compile_transaction(&[instruction], &payer.pubkey(), &[0xAB; 32]).unwrap();

        // Signer order in the slice does not matter.
        let wire = sign_transaction(&tx, &[&mint, &payer]).unwrap();
        assert_eq!(wire[0], 2);

        let message = &wire[1 + 128..];
        for (slot, key) in tx.signer_keys().iter().enumerate() {
            let start = 1 + slot * 64;
            let sig_bytes: [u8; 64] = wire[start..start + 64].try_into().unwrap();
            let vk = VerifyingKey::from_bytes(key).unwrap();
            assert!(vk
                .verify_strict(message, &Signature::from_bytes(&sig_bytes))
                .is_ok());
        }
    }

    #[test]
    fn missing_signer_is_reported() {
        let payer = Keypair::from_secret(&[0x42u8; 32]);
        let mint = Keypair::from_secret(&[0x43u8; 32]);
        let instruction = ix(vec![SolAccountMeta::writable(mint.pubkey(), true)], 0);
        let tx = compile_transaction(&[instruction], &payer.pubkey(), &[0u8; 32]).unwrap();

        let err = sign_transaction(&tx, &[&payer]).unwrap_err();
        assert!(matches!(err, SolError::MissingSigner(_)));
    }

    #[test]
    fn signing_is_deterministic() {
        let payer = Keypair::from_secret(&[0x55u8; 32]);
        let tx = compile_transaction(&[ix(vec![], 1)], &payer.pubkey(), &[0x99; 32]).unwrap();
        let a = sign_transaction(&tx, &[&payer]).unwrap();
        let b = sign_transaction(&tx, &[&payer]).unwrap();
        assert_eq!(a, b);
    }
}
