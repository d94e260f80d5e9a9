//! Request/response calls against the native side.
//!
//! An RPC call is one outbound emit plus one correlated one-shot inbound
//! handler, raced against a timeout. Whichever of {reply, timeout} fires first
//! completes the call; the loser only cleans up. A reply that arrives after
//! the timeout finds no handler and is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! let client = RpcClient::new(registry, transport);
//! let user = client
//!     .call(RpcRequest::new("getUser", json!({"id": 7})).with_timeout(Duration::from_secs(2)))?
//!     .await?;
//! ```

use crate::registry::{EventRegistry, validate_event_type};
use crate::transport::emit_to_native;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;
use tether_core::{BridgeError, Handler, Payload, Result, SharedTransport, SubscriptionId};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::debug;

/// Reply window used when a request does not set its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// A single RPC invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// Event type used both for the request and its reply.
    pub event_type: String,
    /// Request payload. Must be a JSON object.
    pub data: Payload,
    /// Reply window; the client default applies when `None`.
    pub timeout: Option<Duration>,
}

impl RpcRequest {
    /// Create a request with the client's default timeout.
    pub fn new(event_type: impl Into<String>, data: Payload) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            timeout: None,
        }
    }

    /// Set the reply window. `Duration::ZERO` times out immediately.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check the request shape: non-empty type, object data.
    pub fn validate(&self) -> Result<()> {
        validate_event_type(&self.event_type)?;
        if !self.data.is_object() {
            return Err(BridgeError::invalid(
                "data",
                format!("expected an object, got {}", json_kind(&self.data)),
            ));
        }
        Ok(())
    }

    /// Build a request from loosely typed JSON arguments.
    ///
    /// Expects `{"type": string, "data": object, "timeout"?: number}` with the
    /// timeout in milliseconds. The error names the first failing field.
    pub fn from_json(args: &Value) -> Result<Self> {
        let Some(fields) = args.as_object() else {
            return Err(BridgeError::invalid(
                "args",
                format!("expected an object, got {}", json_kind(args)),
            ));
        };

        let event_type = match fields.get("type") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(BridgeError::invalid("type", "must not be empty"));
            }
            Some(other) => {
                return Err(BridgeError::invalid(
                    "type",
                    format!("expected a string, got {}", json_kind(other)),
                ));
            }
            None => return Err(BridgeError::invalid("type", "missing")),
        };

        let data = match fields.get("data") {
            Some(data) if data.is_object() => data.clone(),
            Some(other) => {
                return Err(BridgeError::invalid(
                    "data",
                    format!("expected an object, got {}", json_kind(other)),
                ));
            }
            None => return Err(BridgeError::invalid("data", "missing")),
        };

        let timeout = match fields.get("timeout") {
            None => None,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(ms) if ms < 0.0 => {
                    return Err(BridgeError::invalid(
                        "timeout",
                        "negative timeouts are rejected; use 0 to time out immediately",
                    ));
                }
                Some(ms) => match Duration::try_from_secs_f64(ms / 1000.0) {
                    Ok(timeout) => Some(timeout),
                    Err(_) => {
                        return Err(BridgeError::invalid(
                            "timeout",
                            "too large to represent as a duration",
                        ));
                    }
                },
                None => {
                    return Err(BridgeError::invalid(
                        "timeout",
                        "not representable as a number of milliseconds",
                    ));
                }
            },
            Some(other) => {
                return Err(BridgeError::invalid(
                    "timeout",
                    format!("expected a number, got {}", json_kind(other)),
                ));
            }
        };

        Ok(Self {
            event_type,
            data,
            timeout,
        })
    }
}

/// Validate loosely typed RPC arguments without issuing a call.
pub fn validate_rpc_input(args: &Value) -> Result<()> {
    RpcRequest::from_json(args).map(|_| ())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Interpret a reply payload: an object carrying a non-null `errors` key is a
/// remote failure, anything else is the result.
pub fn interpret_reply(payload: &Payload) -> Result<Payload> {
    match payload.get("errors") {
        Some(errors) if !errors.is_null() => {
            let message = errors
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| errors.as_str())
                .map(str::to_owned)
                .unwrap_or_else(|| errors.to_string());
            let code = errors.get("errorCode").filter(|c| !c.is_null()).cloned();
            Err(BridgeError::Remote { message, code })
        }
        _ => Ok(payload.clone()),
    }
}

struct Completion {
    tx: oneshot::Sender<Result<Payload>>,
    timer: Option<AbortHandle>,
}

/// First writer wins: whoever takes the completion delivers the result.
type Slot = Arc<Mutex<Option<Completion>>>;

fn take(slot: &Slot) -> Option<Completion> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Issues RPC calls over an event registry and a transport.
#[derive(Clone)]
pub struct RpcClient {
    registry: Arc<EventRegistry>,
    transport: SharedTransport,
    default_timeout: Duration,
}

impl RpcClient {
    /// Create a client using [`DEFAULT_TIMEOUT`].
    pub fn new(registry: Arc<EventRegistry>, transport: SharedTransport) -> Self {
        Self {
            registry,
            transport,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the timeout applied to requests that don't carry one.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Get the configured default timeout.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Issue a call.
    ///
    /// Validation, transport and runtime failures are returned synchronously,
    /// before anything is registered or left armed. Remote errors and
    /// timeouts arrive through the returned [`PendingCall`].
    pub fn call(&self, request: RpcRequest) -> Result<PendingCall> {
        request.validate()?;
        let runtime = Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;
        let RpcRequest {
            event_type,
            data,
            timeout,
        } = request;
        let timeout = timeout.unwrap_or(self.default_timeout);

        let (tx, rx) = oneshot::channel();
        let slot: Slot = Arc::new(Mutex::new(Some(Completion { tx, timer: None })));

        let reply_slot = slot.clone();
        let reply_type = event_type.clone();
        let id = self.registry.subscribe_once(
            &event_type,
            Handler::new(move |payload| {
                let Some(completion) = take(&reply_slot) else {
                    return;
                };
                if let Some(timer) = completion.timer {
                    timer.abort();
                }
                debug!(event_type = %reply_type, "rpc reply received");
                let _ = completion.tx.send(interpret_reply(payload));
            }),
        )?;

        self.arm_timer(&runtime, &slot, &event_type, id, timeout);

        if let Err(err) = emit_to_native(&*self.transport, &event_type, Some(data)) {
            if let Some(completion) = take(&slot) {
                if let Some(timer) = completion.timer {
                    timer.abort();
                }
            }
            self.registry.remove(&event_type, id);
            return Err(err);
        }

        debug!(event_type = %event_type, ?timeout, "rpc issued");
        Ok(PendingCall { event_type, rx })
    }

    fn arm_timer(
        &self,
        runtime: &Handle,
        slot: &Slot,
        event_type: &str,
        id: SubscriptionId,
        timeout: Duration,
    ) {
        if timeout.is_zero() {
            expire(&self.registry, slot, event_type, id, timeout);
            return;
        }

        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        // A reply may already have landed through a concurrent dispatch.
        let Some(completion) = guard.as_mut() else {
            return;
        };
        let registry = self.registry.clone();
        let timer_slot = slot.clone();
        let event_type = event_type.to_owned();
        let task = runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            expire(&registry, &timer_slot, &event_type, id, timeout);
        });
        completion.timer = Some(task.abort_handle());
    }
}

fn expire(
    registry: &EventRegistry,
    slot: &Slot,
    event_type: &str,
    id: SubscriptionId,
    elapsed: Duration,
) {
    let Some(completion) = take(slot) else {
        return;
    };
    registry.remove(event_type, id);
    debug!(event_type, ?elapsed, "rpc timed out");
    let _ = completion.tx.send(Err(BridgeError::Timeout {
        event_type: event_type.to_owned(),
        elapsed,
    }));
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("transport", &self.transport.name())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

/// The asynchronous completion of an RPC call.
///
/// Resolves to the reply payload, or to `Remote`, `Timeout` or `Cancelled`.
/// Dropping it does not cancel the call; the timeout still cleans up.
#[derive(Debug)]
#[must_use = "the call's result is only observable by awaiting it"]
pub struct PendingCall {
    event_type: String,
    rx: oneshot::Receiver<Result<Payload>>,
}

impl PendingCall {
    /// The event type this call is waiting on.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl Future for PendingCall {
    type Output = Result<Payload>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(BridgeError::Cancelled)))
    }
}
