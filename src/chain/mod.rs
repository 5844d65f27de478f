//! Chain Collaborator
//!
//! Read-only view of a registry contract. Transport, ABI encoding and multicall aggregation
//! live behind [`ChainReader`]; this crate only describes which reads it needs and how a
//! batch reports per-call outcomes.

pub mod batch;

use crate::error::ResolverError;
use crate::types::{EntryId, RegistryAddress};
use async_trait::async_trait;

pub use batch::{BatchResolver, EntryField};

/// A single read-only registry method invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryCall {
    /// `totalSupply()`
    TotalSupply,
    /// `tokenURI(uint256)`
    TokenUri(EntryId),
    /// `ownerOf(uint256)`
    OwnerOf(EntryId),
}

impl RegistryCall {
    /// Solidity method name of the call.
    pub fn method_name(&self) -> &'static str {
        match self {
            RegistryCall::TotalSupply => "totalSupply",
            RegistryCall::TokenUri(_) => "tokenURI",
            RegistryCall::OwnerOf(_) => "ownerOf",
        }
    }
}

/// Decoded return value of a registry read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainValue {
    Uint(u64),
    Text(String),
    Address(String),
}

/// Per-call outcome of a batched read, aligned with the request by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCallResult<T> {
    Success(T),
    Failure,
}

impl<T> BatchCallResult<T> {
    pub fn success(self) -> Option<T> {
        match self {
            BatchCallResult::Success(value) => Some(value),
            BatchCallResult::Failure => None,
        }
    }
}

/// Read access to registry contracts.
///
/// Implementations wrap an RPC node and a multicall aggregator.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Perform one read-only call.
    async fn read_one(
        &self,
        registry: &RegistryAddress,
        call: RegistryCall,
    ) -> Result<ChainValue, ResolverError>;

    /// Perform all `calls` in one aggregated request.
    ///
    /// Must isolate sub-call failures: a reverting or undecodable call yields
    /// [`BatchCallResult::Failure`] at its position. The returned vector has exactly one
    /// element per call, in request order. `Err` is reserved for failure of the whole batch.
    async fn read_batch(
        &self,
        registry: &RegistryAddress,
        calls: &[RegistryCall],
    ) -> Result<Vec<BatchCallResult<ChainValue>>, ResolverError>;
}
