//! Transaction under construction.
//!
//! A draft is owned by exactly one builder at a time; every append goes
//! through `&mut self`. Besides the instruction list it remembers which
//! associated token accounts were already resolved for it, so asking for the
//! same (mint, owner) pair twice never appends a second creation.

use std::collections::HashMap;

use sol_core::{compile_transaction, encode_address, Pubkey, SolInstruction, SolTransaction};

use crate::error::StakeError;

/// (mint, owner) → associated token account.
type ResolvedAccounts = HashMap<(Pubkey, Pubkey), Pubkey>;

#[derive(Debug, Clone)]
pub struct TransactionDraft {
    payer: Pubkey,
    instructions: Vec<SolInstruction>,
    resolved: ResolvedAccounts,
}

/// Draft state captured before an operation, restored if it fails.
#[derive(Debug)]
pub(crate) struct Checkpoint {
    instructions: usize,
    resolved: ResolvedAccounts,
}

impl TransactionDraft {
    pub fn new(payer: Pubkey) -> Self {
        Self {
            payer,
            instructions: Vec::new(),
            resolved: HashMap::new(),
        }
    }

    /// Fee payer and first signer.
    pub fn payer(&self) -> &Pubkey {
        &self.payer
    }

    /// Append `instruction`. `label` names it in logs only.
    pub fn add(&mut self, label: &str, instruction: SolInstruction) {
        log::debug!(
            "draft += {label} (program {}, data {}{})",
            encode_address(&instruction.program_id),
            hex::encode(&instruction.data[..instruction.data.len().min(8)]),
            if instruction.data.len() > 8 { "…" } else { "" },
        );
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[SolInstruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Required signers: the payer, then every signer account in the order
    /// it first appears across the instructions.
    pub fn signers(&self) -> Vec<Pubkey> {
        let mut signers = vec![self.payer];
        for meta in self.instructions.iter().flat_map(|ix| &ix.accounts) {
            if meta.is_signer && !signers.contains(&meta.pubkey) {
                signers.push(meta.pubkey);
            }
        }
        signers
    }

    /// Associated account already resolved in this draft for (mint, owner).
    pub fn resolved_account(&self, mint: &Pubkey, owner: &Pubkey) -> Option<Pubkey> {
        self.resolved.get(&(*mint, *owner)).copied()
    }

    pub(crate) fn record_resolved(&mut self, mint: Pubkey, owner: Pubkey, address: Pubkey) {
        self.resolved.insert((mint, owner), address);
    }

    /// Compile into a legacy message with the payer at index 0.
    pub fn compile(&self, recent_blockhash: &[u8; 32]) -> Result<SolTransaction, StakeError> {
        Ok(compile_transaction(
            &self.instructions,
            &self.payer,
            recent_blockhash,
        )?)
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            instructions: self.instructions.len(),
            resolved: self.resolved.clone(),
        }
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        if self.instructions.len() > checkpoint.instructions {
            log::debug!(
                "draft rollback drops {} instruction(s)",
                self.instructions.len() - checkpoint.instructions
            );
        }
        self.instructions.truncate(checkpoint.instructions);
        self.resolved = checkpoint.resolved;
    }
}
