//! Core identifier types shared across the resolution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// EntryId: 1-based identifier of a registry entry
pub type EntryId = u64;

/// Address of a registry contract on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryAddress {
    chain_id: u64,
    address: String,
}

impl RegistryAddress {
    /// Create a registry address. The contract address is compared case-insensitively.
    pub fn new(chain_id: u64, address: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: address.into().trim().to_ascii_lowercase(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for RegistryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eip155:{}:{}", self.chain_id, self.address)
    }
}
