//! Anchor framing around Borsh payloads.
//!
//! Anchor prefixes instruction data with `sha256("global:<name>")[..8]`
//! and account data with `sha256("account:<Name>")[..8]`. Whatever follows
//! is the Borsh encoding of the handler's arguments or the account struct.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::error::StakeError;

pub type Discriminator = [u8; 8];

fn sighash(namespace: &str, name: &str) -> Discriminator {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Discriminator of an instruction handler, e.g. `"init_pool"`.
pub fn instruction_discriminator(name: &str) -> Discriminator {
    sighash("global", name)
}

/// Discriminator of an account type, e.g. `"Identifier"`.
pub fn account_discriminator(name: &str) -> Discriminator {
    sighash("account", name)
}

fn framed<T: BorshSerialize>(
    discriminator: Discriminator,
    payload: &T,
) -> Result<Vec<u8>, StakeError> {
    let mut data = discriminator.to_vec();
    payload
        .serialize(&mut data)
        .map_err(|e| StakeError::InvalidArgument(format!("borsh encoding failed: {e}")))?;
    Ok(data)
}

/// Instruction data for handler `name` with Borsh-encoded `args`.
pub fn instruction_data<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>, StakeError> {
    framed(instruction_discriminator(name), args)
}

/// Account data for an Anchor account of type `name`.
pub fn account_data<T: BorshSerialize>(name: &str, account: &T) -> Result<Vec<u8>, StakeError> {
    framed(account_discriminator(name), account)
}

/// Decode an Anchor account of type `name`.
///
/// Bytes past the decoded struct are ignored; Anchor accounts are often
/// allocated larger than their contents.
pub fn decode_account<T: BorshDeserialize>(name: &str, data: &[u8]) -> Result<T, StakeError> {
    let expected = account_discriminator(name);
    let Some((found, mut body)) = data.split_first_chunk::<8>() else {
        return Err(StakeError::InvalidArgument(format!(
            "account data is {} bytes, shorter than a discriminator",
            data.len()
        )));
    };
    if *found != expected {
        return Err(StakeError::InvalidArgument(format!(
            "discriminator mismatch: expected {}, found {}",
            hex::encode(expected),
            hex::encode(found)
        )));
    }
    T::deserialize(&mut body)
        .map_err(|e| StakeError::InvalidArgument(format!("{name} account truncated: {e}")))
}
