//! Registry Resolver: On-chain Agent Registry Resolution
//!
//! Resolves pages of an on-chain agent registry into validated agent records. Each page is
//! counted, planned, batch-resolved to metadata URIs on chain, fetched with bounded
//! concurrency and validated, degrading to partial records instead of failing the page.

pub mod agent;
pub mod cache;
pub mod chain;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod page;
pub mod types;

pub use agent::{AgentDocument, FullAgent, PartialAgent, RegistryResolver, ResolvedAgent};
pub use cache::CountCache;
pub use chain::{BatchCallResult, ChainReader, ChainValue, RegistryCall};
pub use error::{FetchError, ResolverError};
pub use fetch::{DocumentSource, HttpDocument};
pub use types::{EntryId, RegistryAddress};
