use serde::{Deserialize, Serialize};
use sol_core::{decode_address, encode_address, Pubkey};

use crate::error::StakeError;
use crate::seeds::{STAKE_POOL_PROGRAM_ID, TOKEN_MANAGER_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID};

/// Program ids as they appear in a JSON config file (Base58 strings).
///
/// Missing fields fall back to the mainnet deployments, so `{}` is a valid
/// config and a devnet deployment only overrides what differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StakeConfig {
    pub stake_pool_program: String,
    pub token_manager_program: String,
    pub token_metadata_program: String,
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            stake_pool_program: encode_address(&STAKE_POOL_PROGRAM_ID),
            token_manager_program: encode_address(&TOKEN_MANAGER_PROGRAM_ID),
            token_metadata_program: encode_address(&TOKEN_METADATA_PROGRAM_ID),
        }
    }
}

impl StakeConfig {
    pub fn from_json(json: &str) -> Result<Self, StakeError> {
        serde_json::from_str(json).map_err(|e| StakeError::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, StakeError> {
        serde_json::to_string_pretty(self).map_err(|e| StakeError::InvalidConfig(e.to_string()))
    }

    /// Decode every program id, naming the first field that fails.
    pub fn program_ids(&self) -> Result<ProgramIds, StakeError> {
        let decode = |field: &str, value: &str| {
            decode_address(value).map_err(|e| StakeError::InvalidConfig(format!("{field}: {e}")))
        };

        Ok(ProgramIds {
            stake_pool: decode("stake_pool_program", &self.stake_pool_program)?,
            token_manager: decode("token_manager_program", &self.token_manager_program)?,
            token_metadata: decode("token_metadata_program", &self.token_metadata_program)?,
        })
    }
}

/// Decoded program ids used by derivation and instruction building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    pub stake_pool: Pubkey,
    pub token_manager: Pubkey,
    pub token_metadata: Pubkey,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            stake_pool: STAKE_POOL_PROGRAM_ID,
            token_manager: TOKEN_MANAGER_PROGRAM_ID,
            token_metadata: TOKEN_METADATA_PROGRAM_ID,
        }
    }
}
