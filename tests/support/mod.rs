//! In-memory chain and document fakes shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use registry_resolver::agent::REGISTRATION_TYPE;
use registry_resolver::{
    BatchCallResult, ChainReader, ChainValue, DocumentSource, EntryId, FetchError, HttpDocument,
    RegistryAddress, RegistryCall, ResolverError,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn registry() -> RegistryAddress {
    RegistryAddress::new(8453, "0x8004A818BFB912233c491871b3d84c89A494BD9e")
}

pub fn uri(id: EntryId) -> String {
    format!("https://agents.example.com/{}.json", id)
}

/// A registration document that passes strict validation.
pub fn agent_json(name: &str) -> Value {
    json!({
        "type": REGISTRATION_TYPE,
        "name": name,
        "description": format!("{} does agent things", name),
        "image": "https://agents.example.com/avatar.png",
        "endpoints": [
            { "name": "A2A", "endpoint": "https://agents.example.com/a2a", "version": "0.3.0" }
        ],
        "supportedTrust": ["reputation"]
    })
}

/// Registry with dense ids `1..=total`, each pointing at [`uri`] unless overridden.
pub struct FakeChain {
    total: AtomicUsize,
    overrides: Mutex<HashMap<EntryId, String>>,
    failing: Mutex<HashSet<EntryId>>,
    count_unreachable: AtomicBool,
    batch_unreachable: AtomicBool,
    pub count_reads: AtomicUsize,
    pub batch_reads: AtomicUsize,
}

impl FakeChain {
    pub fn new(total: usize) -> Arc<Self> {
        Arc::new(Self {
            total: AtomicUsize::new(total),
            overrides: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            count_unreachable: AtomicBool::new(false),
            batch_unreachable: AtomicBool::new(false),
            count_reads: AtomicUsize::new(0),
            batch_reads: AtomicUsize::new(0),
        })
    }

    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    pub fn set_uri(&self, id: EntryId, uri: &str) {
        self.overrides.lock().insert(id, uri.to_string());
    }

    pub fn fail_entry(&self, id: EntryId) {
        self.failing.lock().insert(id);
    }

    pub fn fail_count(&self) {
        self.count_unreachable.store(true, Ordering::SeqCst);
    }

    pub fn fail_batches(&self) {
        self.batch_unreachable.store(true, Ordering::SeqCst);
    }

    fn read(&self, call: RegistryCall) -> Option<ChainValue> {
        let total = self.total.load(Ordering::SeqCst) as EntryId;
        match call {
            RegistryCall::TotalSupply => Some(ChainValue::Uint(total)),
            RegistryCall::TokenUri(id) | RegistryCall::OwnerOf(id)
                if id == 0 || id > total || self.failing.lock().contains(&id) =>
            {
                None
            }
            RegistryCall::TokenUri(id) => Some(ChainValue::Text(
                self.overrides
                    .lock()
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| uri(id)),
            )),
            RegistryCall::OwnerOf(id) => Some(ChainValue::Address(format!("0x{:040x}", id))),
        }
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn read_one(
        &self,
        _registry: &RegistryAddress,
        call: RegistryCall,
    ) -> Result<ChainValue, ResolverError> {
        if call == RegistryCall::TotalSupply {
            self.count_reads.fetch_add(1, Ordering::SeqCst);
            if self.count_unreachable.load(Ordering::SeqCst) {
                return Err(ResolverError::Upstream("rpc unreachable".to_string()));
            }
        }
        self.read(call).ok_or_else(|| {
            ResolverError::Upstream(format!("{} reverted", call.method_name()))
        })
    }

    async fn read_batch(
        &self,
        _registry: &RegistryAddress,
        calls: &[RegistryCall],
    ) -> Result<Vec<BatchCallResult<ChainValue>>, ResolverError> {
        self.batch_reads.fetch_add(1, Ordering::SeqCst);
        if self.batch_unreachable.load(Ordering::SeqCst) {
            return Err(ResolverError::Upstream("multicall unreachable".to_string()));
        }
        Ok(calls
            .iter()
            .map(|call| match self.read(*call) {
                Some(value) => BatchCallResult::Success(value),
                None => BatchCallResult::Failure,
            })
            .collect())
    }
}

/// Scripted HTTP response.
#[derive(Clone)]
pub enum FakeResponse {
    Json(Value),
    Body(&'static str),
    Status(u16, &'static str),
    Error(FetchError),
}

/// Document source serving scripted responses, tracking concurrency.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, FakeResponse>>,
    delay: Mutex<HashMap<String, Duration>>,
    pub requested: Mutex<Vec<String>>,
    active: AtomicUsize,
    pub peak_active: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, response: FakeResponse) {
        self.responses.lock().insert(url.to_string(), response);
    }

    pub fn delay(&self, url: &str, delay: Duration) {
        self.delay.lock().insert(url.to_string(), delay);
    }

    /// Serve a valid document at [`uri`] for every id.
    pub fn serve_agents(&self, ids: impl IntoIterator<Item = EntryId>) {
        for id in ids {
            self.respond(&uri(id), FakeResponse::Json(agent_json(&format!("agent-{}", id))));
        }
    }

    pub fn request_count(&self) -> usize {
        self.requested.lock().len()
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn get_json(&self, url: &str) -> Result<HttpDocument, FetchError> {
        self.requested.lock().push(url.to_string());
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now, Ordering::SeqCst);

        let delay = self.delay.lock().get(url).copied();
        tokio::time::sleep(delay.unwrap_or(Duration::from_millis(1))).await;

        let response = self.responses.lock().get(url).cloned();
        self.active.fetch_sub(1, Ordering::SeqCst);

        let ok = |body: Vec<u8>| HttpDocument {
            status: 200,
            status_text: "OK".to_string(),
            body,
        };
        match response {
            Some(FakeResponse::Json(value)) => Ok(ok(value.to_string().into_bytes())),
            Some(FakeResponse::Body(body)) => Ok(ok(body.as_bytes().to_vec())),
            Some(FakeResponse::Status(status, text)) => Ok(HttpDocument {
                status,
                status_text: text.to_string(),
                body: Vec::new(),
            }),
            Some(FakeResponse::Error(e)) => Err(e),
            None => Ok(HttpDocument {
                status: 404,
                status_text: "Not Found".to_string(),
                body: Vec::new(),
            }),
        }
    }
}
