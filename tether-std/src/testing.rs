//! Testing utilities for Tether.
//!
//! This module provides doubles that make registry, RPC and bridge tests easier.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records every payload it receives
//! - [`CountingHandler`]: A handler that counts invocations
//! - [`RecordingTransport`]: A transport that records envelopes and can be switched off
//! - [`EchoTransport`]: A transport that replies synchronously through a registry

use crate::registry::EventRegistry;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use tether_core::{BridgeError, Envelope, Handler, Payload, Result, Transport};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records all payloads it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new();
/// registry.subscribe("tick", recorder.handler())?;
///
/// registry.dispatch("tick", &json!(1));
/// assert_eq!(recorder.payloads(), vec![json!(1)]);
/// ```
#[derive(Clone)]
pub struct RecordingHandler {
    payloads: Arc<Mutex<Vec<Payload>>>,
    handler: Handler,
}

impl RecordingHandler {
    /// Create a new recording handler.
    pub fn new() -> Self {
        let payloads = Arc::new(Mutex::new(Vec::new()));
        let sink = payloads.clone();
        let handler = Handler::new(move |payload| lock(&sink).push(payload.clone()));
        Self { payloads, handler }
    }

    /// The handler to subscribe. Every clone has the same identity.
    pub fn handler(&self) -> Handler {
        self.handler.clone()
    }

    /// Get a clone of the recorded payloads.
    pub fn payloads(&self) -> Vec<Payload> {
        lock(&self.payloads).clone()
    }

    /// Get the number of recorded payloads.
    pub fn count(&self) -> usize {
        lock(&self.payloads).len()
    }

    /// Clear all recorded payloads.
    pub fn clear(&self) {
        lock(&self.payloads).clear();
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
#[derive(Clone)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
    handler: Handler,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handler = Handler::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        Self { count, handler }
    }

    /// The handler to subscribe.
    pub fn handler(&self) -> Handler {
        self.handler.clone()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Recording Transport
// ============================================================================

/// A transport that records every envelope sent through it.
///
/// Availability can be toggled to simulate a bridge disappearing.
#[derive(Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Envelope>>>,
    available: Arc<AtomicBool>,
}

impl RecordingTransport {
    /// Create a new, available recording transport.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get a clone of the sent envelopes.
    pub fn envelopes(&self) -> Vec<Envelope> {
        lock(&self.sent).clone()
    }

    /// Simulate the native bridge appearing or disappearing.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        if !self.is_available() {
            return Err(BridgeError::TransportUnavailable {
                transport: self.name().to_owned(),
            });
        }
        lock(&self.sent).push(envelope.clone());
        Ok(())
    }
}

// ============================================================================
// Echo Transport
// ============================================================================

/// A simulated native side that answers each envelope synchronously.
///
/// `reply` maps an outbound envelope to the payload sent back under the same
/// event type; `None` means no reply. Replies are dispatched into `registry`
/// before `send` returns.
///
/// # Example
///
/// ```rust,ignore
/// let echo = EchoTransport::new(registry.clone(), |_| Some(json!("pong")));
/// ```
pub struct EchoTransport<F> {
    registry: Arc<EventRegistry>,
    reply: F,
    sent: Arc<Mutex<Vec<Envelope>>>,
}

impl<F> EchoTransport<F>
where
    F: Fn(&Envelope) -> Option<Payload> + Send + Sync + 'static,
{
    /// Create an echo transport replying into `registry`.
    pub fn new(registry: Arc<EventRegistry>, reply: F) -> Self {
        Self {
            registry,
            reply,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the envelopes received from the web side.
    pub fn envelopes(&self) -> Vec<Envelope> {
        lock(&self.sent).clone()
    }
}

impl<F> Transport for EchoTransport<F>
where
    F: Fn(&Envelope) -> Option<Payload> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "echo"
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        lock(&self.sent).push(envelope.clone());
        if let Some(payload) = (self.reply)(envelope) {
            self.registry.dispatch(&envelope.event_type, &payload);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recording_handler_identity() {
        let recorder = RecordingHandler::new();
        assert_eq!(recorder.handler(), recorder.clone().handler());

        recorder.handler().call(&json!("a"));
        assert_eq!(recorder.payloads(), vec![json!("a")]);

        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_recording_transport_toggle() {
        let transport = RecordingTransport::new();
        transport.set_available(false);
        assert!(transport.send(&Envelope::new("x", None)).is_err());

        transport.set_available(true);
        transport.send(&Envelope::new("x", None)).unwrap();
        assert_eq!(transport.envelopes().len(), 1);
    }

    #[test]
    fn test_echo_transport_dispatches_reply() {
        let registry = Arc::new(EventRegistry::new());
        let counter = CountingHandler::new();
        registry.subscribe("ping", counter.handler()).unwrap();

        let echo = EchoTransport::new(registry.clone(), |_| Some(json!("pong")));
        echo.send(&Envelope::new("ping", None)).unwrap();

        assert_eq!(counter.count(), 1);
        assert_eq!(echo.envelopes().len(), 1);
    }
}
