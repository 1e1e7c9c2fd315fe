//! Program-derived addresses.
//!
//! A PDA is `SHA-256(seed_0 || .. || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")` for the highest bump in `255..=0` whose digest
//! does NOT decompress to an Ed25519 point. The search is a pure function of
//! its inputs, so the same program and seeds always give the same
//! `(address, bump)`.

use sha2::{Digest, Sha256};

use crate::address::{is_on_curve, Pubkey};
use crate::error::SolError;

/// Appended to every PDA preimage.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Seeds per derivation, bump included.
pub const MAX_SEEDS: usize = 16;

/// Bytes per seed.
pub const MAX_SEED_LEN: usize = 32;

/// A derived address and the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Find the canonical program address for `seeds` under `program_id`.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<ProgramAddress, SolError> {
    check_seeds(seeds)?;

    for bump in (0u8..=255).rev() {
        let candidate = hash_seeds(seeds, bump, program_id);
        if !is_on_curve(&candidate) {
            return Ok(ProgramAddress {
                address: candidate,
                bump,
            });
        }
    }

    Err(SolError::DerivationExhausted)
}

/// Recreate a program address from a known bump.
///
/// Fails if the result lands on the curve, i.e. the bump is not viable.
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Pubkey,
) -> Result<Pubkey, SolError> {
    check_seeds(seeds)?;

    let candidate = hash_seeds(seeds, bump, program_id);
    if is_on_curve(&candidate) {
        return Err(SolError::InvalidSeeds(format!(
            "bump {bump} yields an on-curve address"
        )));
    }
    Ok(candidate)
}

fn check_seeds(seeds: &[&[u8]]) -> Result<(), SolError> {
    // The bump occupies one seed slot.
    let total = seeds.len() + 1;
    if total > MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "{total} seeds exceeds the limit of {MAX_SEEDS}"
        )));
    }
    if let Some((i, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, s)| s.len() > MAX_SEED_LEN)
    {
        return Err(SolError::InvalidSeeds(format!(
            "seed {i} is {} bytes, limit is {MAX_SEED_LEN}",
            seed.len()
        )));
    }
    Ok(())
}

fn hash_seeds(seeds: &[&[u8]], bump: u8, program_id: &Pubkey) -> Pubkey {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::decode_address;

    fn stake_program() -> Pubkey {
        decode_address("stkBL96RZkjY5ine4TvPihGqW8UHJfch2cokjAPzV8i").unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let program = stake_program();
        let a = find_program_address(&[b"identifier"], &program).unwrap();
        let b = find_program_address(&[b"identifier"], &program).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn known_identifier_address() {
        let pda = find_program_address(&[b"identifier"], &stake_program()).unwrap();
        assert_eq!(
            crate::address::encode_address(&pda.address),
            "5XxrkhNcR3fv7CcVKijVjz6cFx2WeB5tdLd4GEq24n1J"
        );
        assert_eq!(pda.bump, 255);
    }

    #[test]
    fn known_pool_address_needs_lower_bump() {
        // Bump 255 lands on the curve for identifier 1, so the search steps down.
        let id = 1u64.to_le_bytes();
        let pda = find_program_address(&[b"stake-pool", &id], &stake_program()).unwrap();
        assert_eq!(
            crate::address::encode_address(&pda.address),
            "E8ZryYZD7VrhEsxQvUiach7x1Mn1XeZ1RSzZmXBLWL8G"
        );
        assert_eq!(pda.bump, 254);
    }

    #[test]
    fn derived_address_is_off_curve() {
        let pda = find_program_address(&[b"anything", &[7u8; 32]], &stake_program()).unwrap();
        assert!(!is_on_curve(&pda.address));
    }

    #[test]
    fn create_with_found_bump_matches_find() {
        let program = stake_program();
        let id = 1u64.to_le_bytes();
        let seeds: [&[u8]; 2] = [b"stake-pool", &id];
        let found = find_program_address(&seeds, &program).unwrap();
        let created = create_program_address(&seeds, found.bump, &program).unwrap();
        assert_eq!(created, found.address);
    }

    #[test]
    fn create_with_on_curve_bump_fails() {
        let id = 1u64.to_le_bytes();
        let result = create_program_address(&[b"stake-pool", &id], 255, &stake_program());
        assert!(matches!(result, Err(SolError::InvalidSeeds(_))));
    }

    #[test]
    fn seed_order_matters() {
        let program = stake_program();
        let a = find_program_address(&[b"ab", b"cd"], &program).unwrap();
        let b = find_program_address(&[b"cd", b"ab"], &program).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn program_id_scopes_the_address() {
        let a = find_program_address(&[b"identifier"], &stake_program()).unwrap();
        let b = find_program_address(&[b"identifier"], &[0x11u8; 32]).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn oversized_seed_is_rejected() {
        let long = [0u8; 33];
        let err = find_program_address(&[&long], &stake_program()).unwrap_err();
        assert!(err.to_string().contains("seed 0 is 33 bytes"));
    }

    #[test]
    fn too_many_seeds_are_rejected() {
        let seeds: Vec<&[u8]> = (0..MAX_SEEDS).map(|_| b"x".as_slice()).collect();
        let err = find_program_address(&seeds, &stake_program()).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }

    #[test]
    fn fifteen_seeds_plus_bump_is_allowed() {
        let seeds: Vec<&[u8]> = (0..MAX_SEEDS - 1).map(|_| b"x".as_slice()).collect();
        assert!(find_program_address(&seeds, &stake_program()).is_ok());
    }
}
