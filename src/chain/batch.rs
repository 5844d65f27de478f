//! Batched per-entry reads (`tokenURI`, `ownerOf`) with per-call failure tolerance.

use super::{ChainReader, ChainValue, RegistryCall};
use crate::error::ResolverError;
use crate::types::{EntryId, RegistryAddress};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-entry field resolved by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    TokenUri,
    Owner,
}

impl EntryField {
    fn call_for(self, id: EntryId) -> RegistryCall {
        match self {
            EntryField::TokenUri => RegistryCall::TokenUri(id),
            EntryField::Owner => RegistryCall::OwnerOf(id),
        }
    }

    /// Accept only the value kind this field returns; anything else counts as a failed call.
    fn decode(self, value: ChainValue) -> Option<String> {
        match (self, value) {
            (EntryField::TokenUri, ChainValue::Text(uri)) => Some(uri),
            (EntryField::Owner, ChainValue::Address(owner)) => Some(owner),
            _ => None,
        }
    }
}

/// Resolves one field for many entries through a single aggregated read.
#[derive(Clone)]
pub struct BatchResolver {
    chain: Arc<dyn ChainReader>,
}

impl BatchResolver {
    pub fn new(chain: Arc<dyn ChainReader>) -> Self {
        Self { chain }
    }

    /// Resolve `field` for every id, keeping only successful sub-calls in input order.
    ///
    /// Empty `ids` returns immediately without a chain call.
    pub async fn resolve_many(
        &self,
        registry: &RegistryAddress,
        ids: &[EntryId],
        field: EntryField,
    ) -> Result<Vec<(EntryId, String)>, ResolverError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let calls: Vec<RegistryCall> = ids.iter().map(|id| field.call_for(*id)).collect();
        let results = self.chain.read_batch(registry, &calls).await?;

        if results.len() != ids.len() {
            return Err(ResolverError::Upstream(format!(
                "batch {} for {} returned {} results for {} calls",
                calls[0].method_name(),
                registry,
                results.len(),
                ids.len()
            )));
        }

        let resolved: Vec<(EntryId, String)> = ids
            .iter()
            .zip(results)
            .filter_map(|(id, result)| {
                result
                    .success()
                    .and_then(|value| field.decode(value))
                    .map(|value| (*id, value))
            })
            .collect();

        let dropped = ids.len() - resolved.len();
        if dropped > 0 {
            warn!(
                registry = %registry,
                field = ?field,
                requested = ids.len(),
                dropped,
                "Dropped entries whose on-chain read failed"
            );
        } else {
            debug!(registry = %registry, field = ?field, resolved = resolved.len(), "Batch resolved");
        }

        Ok(resolved)
    }

    /// `tokenURI` for each id.
    pub async fn resolve_uris(
        &self,
        registry: &RegistryAddress,
        ids: &[EntryId],
    ) -> Result<Vec<(EntryId, String)>, ResolverError> {
        self.resolve_many(registry, ids, EntryField::TokenUri).await
    }

    /// `ownerOf` for each id.
    pub async fn resolve_owners(
        &self,
        registry: &RegistryAddress,
        ids: &[EntryId],
    ) -> Result<Vec<(EntryId, String)>, ResolverError> {
        self.resolve_many(registry, ids, EntryField::Owner).await
    }
}
