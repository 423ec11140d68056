use crate::domain_port::*;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) enum Canned {
    Body(Value),
    Unreachable,
    Rejected(u16),
    Decode,
}

/// Counts calls and answers every request with the same canned outcome.
pub(crate) struct StubIntrospectionClient {
    canned: Canned,
    calls: AtomicUsize,
    last_query: Mutex<Vec<(String, String)>>,
    last_endpoint: Mutex<Option<String>>,
}

impl StubIntrospectionClient {
    pub(crate) fn new(canned: Canned) -> Self {
        Self {
            canned,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(Vec::new()),
            last_endpoint: Mutex::new(None),
        }
    }

    pub(crate) fn body(value: Value) -> Self {
        Self::new(Canned::Body(value))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_query(&self) -> Vec<(String, String)> {
        self.last_query.lock().unwrap().clone()
    }

    pub(crate) fn last_endpoint(&self) -> Option<String> {
        self.last_endpoint.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IntrospectionClient for StubIntrospectionClient {
    async fn introspect(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<ProviderResponse, IntrospectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = request.query.clone();
        *self.last_endpoint.lock().unwrap() = Some(request.endpoint.to_string());

        match &self.canned {
            Canned::Body(Value::Object(map)) => Ok(map.clone()),
            Canned::Body(_) | Canned::Decode => {
                Err(IntrospectionError::Decode("expected a JSON object".into()))
            }
            Canned::Unreachable => Err(IntrospectionError::Unreachable(
                "connection refused".into(),
            )),
            Canned::Rejected(status) => Err(IntrospectionError::Rejected { status: *status }),
        }
    }
}
