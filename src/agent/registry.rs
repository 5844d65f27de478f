//! Registry resolution pipeline.
//!
//! `resolve_page` runs count -> plan -> batch `tokenURI` -> bounded fetch -> validate, in that
//! order. Only the count read and the batch aggregation can fail the call; every later
//! per-entry failure is folded into that entry's document.

use crate::agent::domain::{AgentDocument, PartialAgent};
use crate::cache::{CountCache, CountCacheStats};
use crate::chain::{BatchResolver, ChainReader, ChainValue, RegistryCall};
use crate::concurrency::fetch_all;
use crate::config::{FetchConfig, ResolverConfig};
use crate::error::ResolverError;
use crate::fetch::{fetch_document, normalize_token_uri, DocumentSource, HttpDocumentSource};
use crate::page::plan_page;
use crate::types::{EntryId, RegistryAddress};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// One registry entry with its resolved metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAgent {
    pub entry_id: EntryId,
    /// URI as stored on chain, before any gateway rewrite
    pub token_uri: String,
    pub document: AgentDocument,
}

/// Resolves registry pages into agent documents.
///
/// The count cache is shared: pass the same `Arc<CountCache>` to every resolver in a process.
pub struct RegistryResolver {
    chain: Arc<dyn ChainReader>,
    source: Arc<dyn DocumentSource>,
    counts: Arc<CountCache>,
    batch: BatchResolver,
    fetch: FetchConfig,
}

impl RegistryResolver {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        source: Arc<dyn DocumentSource>,
        counts: Arc<CountCache>,
        fetch: FetchConfig,
    ) -> Self {
        Self {
            batch: BatchResolver::new(chain.clone()),
            chain,
            source,
            counts,
            fetch,
        }
    }

    /// Build a resolver with an HTTP document source and a fresh count cache.
    pub fn from_config(
        chain: Arc<dyn ChainReader>,
        config: &ResolverConfig,
    ) -> Result<Self, ResolverError> {
        config.validate()?;
        let source = HttpDocumentSource::new(&config.fetch.http_source_config())?;
        let counts = CountCache::new(config.count_cache.ttl());
        Ok(Self::new(
            chain,
            Arc::new(source),
            Arc::new(counts),
            config.fetch.clone(),
        ))
    }

    /// Total entries in the registry, served from the count cache when fresh.
    pub async fn total_count(&self, registry: &RegistryAddress) -> Result<u64, ResolverError> {
        self.counts
            .get_or_fetch(registry, || async {
                match self.chain.read_one(registry, RegistryCall::TotalSupply).await? {
                    ChainValue::Uint(total) => Ok(total),
                    other => Err(ResolverError::Upstream(format!(
                        "totalSupply for {} returned {:?}",
                        registry, other
                    ))),
                }
            })
            .await
    }

    /// Resolve page `page` (0-based) of `page_size` entries.
    ///
    /// Entries whose `tokenURI` read fails are omitted; every other entry yields one
    /// document, in id order. An empty result means there is nothing at this page.
    pub async fn resolve_page(
        &self,
        registry: &RegistryAddress,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<ResolvedAgent>, ResolverError> {
        let start = Instant::now();
        let total = self.total_count(registry).await?;

        let ids = plan_page(page, page_size, total);
        if ids.is_empty() {
            debug!(registry = %registry, page, page_size, total, "Page is past the end of the registry");
            return Ok(Vec::new());
        }

        let uris = self.batch.resolve_uris(registry, &ids).await?;
        let resolved = self.fetch_documents(uris).await;

        let partial = resolved.iter().filter(|r| !r.document.is_full()).count();
        info!(
            registry = %registry,
            page,
            page_size,
            total,
            planned = ids.len(),
            resolved = resolved.len(),
            partial,
            duration_ms = start.elapsed().as_millis(),
            "Resolved registry page"
        );

        Ok(resolved)
    }

    /// Resolve a single entry through a direct `tokenURI` read.
    pub async fn resolve_entry(
        &self,
        registry: &RegistryAddress,
        entry_id: EntryId,
    ) -> Result<ResolvedAgent, ResolverError> {
        let token_uri = match self
            .chain
            .read_one(registry, RegistryCall::TokenUri(entry_id))
            .await?
        {
            ChainValue::Text(uri) => uri,
            other => {
                return Err(ResolverError::Upstream(format!(
                    "tokenURI({}) for {} returned {:?}",
                    entry_id, registry, other
                )))
            }
        };

        let target = normalize_token_uri(&token_uri, self.fetch.ipfs_gateway.as_deref());
        let document = fetch_document(self.source.as_ref(), &target).await;
        Ok(ResolvedAgent {
            entry_id,
            token_uri,
            document,
        })
    }

    /// Owners of the given entries; entries whose `ownerOf` read fails are omitted.
    pub async fn resolve_owners(
        &self,
        registry: &RegistryAddress,
        ids: &[EntryId],
    ) -> Result<Vec<(EntryId, String)>, ResolverError> {
        self.batch.resolve_owners(registry, ids).await
    }

    /// Force the next count read for `registry` to hit the chain.
    pub fn invalidate_count(&self, registry: &RegistryAddress) {
        self.counts.invalidate(registry);
    }

    pub fn count_cache_stats(&self) -> CountCacheStats {
        self.counts.stats()
    }

    async fn fetch_documents(&self, uris: Vec<(EntryId, String)>) -> Vec<ResolvedAgent> {
        let source = self.source.as_ref();
        let gateway = self.fetch.ipfs_gateway.as_deref();

        let documents = fetch_all(
            uris.clone(),
            self.fetch.worker_limit,
            |(_, token_uri): (EntryId, String), _| async move {
                let target = normalize_token_uri(&token_uri, gateway);
                Ok::<_, Infallible>(fetch_document(source, &target).await)
            },
        )
        .await;

        uris.into_iter()
            .zip(documents)
            .map(|((entry_id, token_uri), document)| ResolvedAgent {
                entry_id,
                token_uri,
                document: document.unwrap_or_else(|| {
                    PartialAgent::from_error("Fetch error: task aborted").into()
                }),
            })
            .collect()
    }
}
