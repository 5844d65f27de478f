//! Agent registration documents.
//!
//! A document fetched from an entry's `tokenURI` is either a [`FullAgent`] that passed strict
//! validation, or a [`PartialAgent`] holding only the fields that validated on their own plus
//! the reason strict validation failed.

pub mod validation;

use serde::{Deserialize, Serialize};

pub use validation::{is_http_url, validate};

/// Required value of the document's `type` field.
pub const REGISTRATION_TYPE: &str = "https://eips.ethereum.org/EIPS/eip-8004#registration-v1";

/// Service endpoint advertised by an agent, tagged by its `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Endpoint {
    #[serde(rename = "A2A")]
    A2a(EndpointTarget),
    #[serde(rename = "MCP")]
    Mcp(EndpointTarget),
    #[serde(rename = "OASF")]
    Oasf(EndpointTarget),
    #[serde(rename = "ENS")]
    Ens(EndpointTarget),
    #[serde(rename = "DID")]
    Did(EndpointTarget),
    #[serde(rename = "agentWallet")]
    AgentWallet(EndpointTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointTarget {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Endpoint {
    pub fn target(&self) -> &EndpointTarget {
        match self {
            Endpoint::A2a(t)
            | Endpoint::Mcp(t)
            | Endpoint::Oasf(t)
            | Endpoint::Ens(t)
            | Endpoint::Did(t)
            | Endpoint::AgentWallet(t) => t,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Endpoint::A2a(_) => "A2A",
            Endpoint::Mcp(_) => "MCP",
            Endpoint::Oasf(_) => "OASF",
            Endpoint::Ens(_) => "ENS",
            Endpoint::Did(_) => "DID",
            Endpoint::AgentWallet(_) => "agentWallet",
        }
    }
}

/// Link from the document back to a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub agent_id: u64,
    /// CAIP-10 style `eip155:<chain>:<address>`
    pub agent_registry: String,
}

/// Trust model an agent declares support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrustModel {
    Reputation,
    CryptoEconomic,
    TeeAttestation,
}

/// Document that passed strict validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAgent {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub endpoints: Vec<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrations: Option<Vec<Registration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_trust: Option<Vec<TrustModel>>,
}

/// Best-effort document: every present field passed its own validator.
///
/// The error is never empty; construct through [`PartialAgent::from_error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialAgent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<Endpoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrations: Option<Vec<Registration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_trust: Option<Vec<TrustModel>>,
    #[serde(deserialize_with = "deserialize_error")]
    error: String,
}

fn non_empty_error(error: String) -> String {
    if error.trim().is_empty() {
        "Unknown validation error".to_string()
    } else {
        error
    }
}

fn deserialize_error<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    String::deserialize(deserializer).map(non_empty_error)
}

impl PartialAgent {
    /// Document with no salvaged fields.
    pub fn from_error(error: impl Into<String>) -> Self {
        let error = non_empty_error(error.into());
        Self {
            kind: None,
            name: None,
            description: None,
            image: None,
            endpoints: None,
            registrations: None,
            supported_trust: None,
            error,
        }
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// True when nothing besides the error survived.
    pub fn is_error_only(&self) -> bool {
        self.kind.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.endpoints.is_none()
            && self.registrations.is_none()
            && self.supported_trust.is_none()
    }
}

/// Result of resolving one metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentDocument {
    Partial(PartialAgent),
    Full(FullAgent),
}

impl AgentDocument {
    pub fn is_full(&self) -> bool {
        matches!(self, AgentDocument::Full(_))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            AgentDocument::Full(agent) => Some(&agent.name),
            AgentDocument::Partial(agent) => agent.name.as_deref(),
        }
    }

    /// Validation or fetch error, for partial documents.
    pub fn error(&self) -> Option<&str> {
        match self {
            AgentDocument::Full(_) => None,
            AgentDocument::Partial(agent) => Some(agent.error()),
        }
    }

    pub fn as_full(&self) -> Option<&FullAgent> {
        match self {
            AgentDocument::Full(agent) => Some(agent),
            AgentDocument::Partial(_) => None,
        }
    }

    pub fn as_partial(&self) -> Option<&PartialAgent> {
        match self {
            AgentDocument::Full(_) => None,
            AgentDocument::Partial(agent) => Some(agent),
        }
    }
}

impl From<FullAgent> for AgentDocument {
    fn from(agent: FullAgent) -> Self {
        AgentDocument::Full(agent)
    }
}

impl From<PartialAgent> for AgentDocument {
    fn from(agent: PartialAgent) -> Self {
        AgentDocument::Partial(agent)
    }
}
