//! Agent Records
//!
//! Agent registration documents and the pipeline that resolves registry entries into them.

pub mod domain;
mod registry;

pub use domain::{
    AgentDocument, Endpoint, EndpointTarget, FullAgent, PartialAgent, Registration, TrustModel,
    REGISTRATION_TYPE,
};
pub use registry::{RegistryResolver, ResolvedAgent};
