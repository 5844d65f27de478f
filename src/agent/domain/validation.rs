//! Two-pass validation of agent registration documents.
//!
//! The strict pass deserializes the whole document and checks every field. When it fails,
//! the salvage pass re-checks each top-level field and each list element in isolation and
//! keeps whatever passes, carrying the strict pass's error message unchanged.

use super::{
    AgentDocument, Endpoint, FullAgent, PartialAgent, Registration, TrustModel,
    REGISTRATION_TYPE,
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Validate a raw JSON document into a full or partial agent.
pub fn validate(raw: &Value) -> AgentDocument {
    match validate_strict(raw) {
        Ok(agent) => AgentDocument::Full(agent),
        Err(error) => AgentDocument::Partial(salvage(raw, error)),
    }
}

/// True for absolute `http://` or `https://` URLs with a host.
pub fn is_http_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn validate_strict(raw: &Value) -> Result<FullAgent, String> {
    let agent: FullAgent = serde_json::from_value(raw.clone()).map_err(|e| e.to_string())?;

    check_kind(&agent.kind)?;
    check_image(&agent.image)?;
    for (index, endpoint) in agent.endpoints.iter().enumerate() {
        check_endpoint(endpoint).map_err(|e| format!("invalid value for `endpoints[{}]`: {}", index, e))?;
    }
    if let Some(registrations) = &agent.registrations {
        for (index, registration) in registrations.iter().enumerate() {
            check_registration(registration)
                .map_err(|e| format!("invalid value for `registrations[{}]`: {}", index, e))?;
        }
    }

    Ok(agent)
}

fn check_kind(kind: &str) -> Result<(), String> {
    if kind != REGISTRATION_TYPE {
        return Err(format!(
            "invalid value for `type`: expected \"{}\", found \"{}\"",
            REGISTRATION_TYPE, kind
        ));
    }
    Ok(())
}

fn check_image(image: &str) -> Result<(), String> {
    if !is_http_url(image) {
        return Err(format!(
            "invalid value for `image`: expected an http(s) URL, found \"{}\"",
            image
        ));
    }
    Ok(())
}

fn check_endpoint(endpoint: &Endpoint) -> Result<(), String> {
    let target = &endpoint.target().endpoint;
    let valid = match endpoint {
        Endpoint::A2a(_) | Endpoint::Mcp(_) | Endpoint::Oasf(_) => is_http_url(target),
        Endpoint::Ens(_) => target.len() > ".eth".len() && target.ends_with(".eth"),
        Endpoint::Did(_) => target.starts_with("did:") && target.len() > "did:".len(),
        Endpoint::AgentWallet(_) => is_caip10_address(target),
    };
    if valid {
        Ok(())
    } else {
        Err(format!("{} endpoint \"{}\" is malformed", endpoint.kind(), target))
    }
}

fn check_registration(registration: &Registration) -> Result<(), String> {
    if !is_caip10_address(&registration.agent_registry) {
        return Err(format!(
            "agentRegistry \"{}\" is not an eip155 address",
            registration.agent_registry
        ));
    }
    Ok(())
}

/// `eip155:<chain id>:0x<40 hex digits>`
fn is_caip10_address(candidate: &str) -> bool {
    let mut parts = candidate.split(':');
    let (Some("eip155"), Some(chain), Some(address), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    !chain.is_empty()
        && chain.chars().all(|c| c.is_ascii_digit())
        && hex.len() == 40
        && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn salvage(raw: &Value, error: String) -> PartialAgent {
    let mut partial = PartialAgent::from_error(error);
    let Some(fields) = raw.as_object() else {
        return partial;
    };

    partial.kind = string_field(fields, "type").filter(|kind| check_kind(kind).is_ok());
    partial.name = string_field(fields, "name");
    partial.description = string_field(fields, "description");
    partial.image = string_field(fields, "image").filter(|image| check_image(image).is_ok());
    partial.endpoints = salvage_list(fields.get("endpoints"), check_endpoint);
    partial.registrations = salvage_list(fields.get("registrations"), check_registration);
    partial.supported_trust =
        salvage_list::<TrustModel>(fields.get("supportedTrust"), |_| Ok(()));

    partial
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Keep the list elements that deserialize and pass `check`; `None` when none survive.
fn salvage_list<T: DeserializeOwned>(
    value: Option<&Value>,
    check: impl Fn(&T) -> Result<(), String>,
) -> Option<Vec<T>> {
    let items = value?.as_array()?;
    let valid: Vec<T> = items
        .iter()
        .filter_map(|item| serde_json::from_value::<T>(item.clone()).ok())
        .filter(|item| check(item).is_ok())
        .collect();
    if valid.is_empty() {
        None
    } else {
        Some(valid)
    }
}
