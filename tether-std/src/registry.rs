//! Event registry: the subscription table and dispatch-by-type.
//!
//! The registry maps an event-type name to an ordered list of handlers.
//! Dispatch snapshots the list and releases the table lock before invoking
//! anything, so handlers may subscribe, unsubscribe or dispatch re-entrantly
//! without corrupting the pass in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tether_core::{BridgeError, Handler, Payload, Result, SubscriptionId};
use tracing::{debug, trace};

#[derive(Clone)]
struct Entry {
    id: SubscriptionId,
    handler: Handler,
    once: bool,
}

type Table = HashMap<String, Vec<Entry>>;

/// A table of event handlers keyed by event type.
///
/// Insertion order determines dispatch order. A type whose last handler is
/// removed disappears from the table entirely.
///
/// # Example
///
/// ```rust
/// use tether_core::Handler;
/// use tether_std::registry::EventRegistry;
/// use serde_json::json;
///
/// let registry = EventRegistry::new();
/// let handler = Handler::new(|payload| println!("got {payload}"));
///
/// registry.subscribe("ready", handler.clone()).unwrap();
/// assert_eq!(registry.dispatch("ready", &json!({})), 1);
///
/// registry.unsubscribe("ready", Some(&handler)).unwrap();
/// assert!(registry.is_empty());
/// ```
pub struct EventRegistry {
    table: Mutex<Table>,
    next_id: AtomicU64,
}

impl EventRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // No handler ever runs under this lock, so a poisoned table is still consistent.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `handler` to the list for `event_type`.
    pub fn subscribe(&self, event_type: &str, handler: Handler) -> Result<SubscriptionId> {
        self.insert(event_type, handler, false)
    }

    /// Append a handler that runs at most once, then deregisters itself.
    ///
    /// The entry is removed synchronously before the handler is invoked, so a
    /// re-entrant dispatch of the same type cannot run it a second time.
    pub fn subscribe_once(&self, event_type: &str, handler: Handler) -> Result<SubscriptionId> {
        self.insert(event_type, handler, true)
    }

    fn insert(&self, event_type: &str, handler: Handler, once: bool) -> Result<SubscriptionId> {
        validate_event_type(event_type)?;
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock()
            .entry(event_type.to_owned())
            .or_default()
            .push(Entry { id, handler, once });
        debug!(event_type, %id, once, "subscribed");
        Ok(id)
    }

    /// Remove handlers for `event_type`.
    ///
    /// With `None`, the whole list is dropped. With `Some(handler)`, only
    /// entries equal to `handler` are removed (one-shot entries included) and
    /// the rest keep their relative order.
    pub fn unsubscribe(&self, event_type: &str, handler: Option<&Handler>) -> Result<()> {
        validate_event_type(event_type)?;
        let mut table = self.lock();
        match handler {
            None => {
                if let Some(entries) = table.remove(event_type) {
                    debug!(event_type, removed = entries.len(), "unsubscribed all");
                }
            }
            Some(handler) => {
                if let Some(entries) = table.get_mut(event_type) {
                    let before = entries.len();
                    entries.retain(|e| e.handler != *handler);
                    debug!(event_type, removed = before - entries.len(), "unsubscribed");
                    if entries.is_empty() {
                        table.remove(event_type);
                    }
                }
            }
        }
        Ok(())
    }

    /// Remove exactly one entry by id. Returns whether it was present.
    pub fn remove(&self, event_type: &str, id: SubscriptionId) -> bool {
        let mut table = self.lock();
        let Some(entries) = table.get_mut(event_type) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|e| e.id == id) else {
            return false;
        };
        entries.remove(pos);
        if entries.is_empty() {
            table.remove(event_type);
        }
        true
    }

    /// Invoke every handler subscribed to `event_type`, in subscription order.
    ///
    /// Unknown types are a no-op. Returns the number of handlers invoked.
    pub fn dispatch(&self, event_type: &str, payload: &Payload) -> usize {
        let snapshot = match self.lock().get(event_type) {
            Some(entries) => entries.clone(),
            None => {
                trace!(event_type, "no subscribers");
                return 0;
            }
        };

        let mut invoked = 0;
        for entry in snapshot {
            if entry.once && !self.remove(event_type, entry.id) {
                // Already consumed by a re-entrant dispatch.
                continue;
            }
            entry.handler.call(payload);
            invoked += 1;
        }
        trace!(event_type, invoked, "dispatched");
        invoked
    }

    /// Number of handlers currently subscribed to `event_type`.
    pub fn handler_count(&self, event_type: &str) -> usize {
        self.lock().get(event_type).map_or(0, Vec::len)
    }

    /// All event types with at least one handler, sorted.
    pub fn event_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.lock().keys().cloned().collect();
        types.sort();
        types
    }

    /// Check if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.lock().clear();
        debug!("registry cleared");
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("event_types", &self.event_types())
            .finish()
    }
}

/// Fails with `InvalidArgument` unless `event_type` is a non-empty string.
pub fn validate_event_type(event_type: &str) -> Result<()> {
    if event_type.is_empty() {
        return Err(BridgeError::invalid("type", "event type must be a non-empty string"));
    }
    Ok(())
}
