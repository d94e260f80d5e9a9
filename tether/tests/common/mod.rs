#![allow(dead_code)]

use serde_json::Value;
use std::sync::{Arc, Mutex};
use tether::testing::{EchoTransport, RecordingTransport};
use tether::{Bridge, Envelope, EventRegistry, Handler, Payload};

// ============================================================================
// Order Recording
// ============================================================================

/// Shared log of which handler ran, in order.
#[derive(Clone, Default)]
pub struct OrderLog(Arc<Mutex<Vec<usize>>>);

impl OrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that appends `id` to the log.
    pub fn handler(&self, id: usize) -> Handler {
        let log = self.0.clone();
        Handler::new(move |_| log.lock().unwrap().push(id))
    }

    pub fn take(&self) -> Vec<usize> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

// ============================================================================
// Bridges
// ============================================================================

/// A bridge whose native side answers every envelope with `reply(envelope)`.
pub fn echo_bridge<F>(reply: F) -> Bridge
where
    F: Fn(&Envelope) -> Option<Payload> + Send + Sync + 'static,
{
    let registry = Arc::new(EventRegistry::new());
    let transport = EchoTransport::new(registry.clone(), reply);
    Bridge::builder()
        .registry(registry)
        .transport(transport)
        .build()
}

/// A bridge over a recording transport that never replies.
pub fn silent_bridge() -> (Bridge, RecordingTransport) {
    let transport = RecordingTransport::new();
    (Bridge::new(transport.clone()), transport)
}

/// Reply with a native-side error payload.
pub fn remote_error(message: &str, code: Value) -> Payload {
    serde_json::json!({"errors": {"message": message, "errorCode": code}})
}
