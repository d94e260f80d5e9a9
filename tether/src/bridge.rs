//! The bridge facade handed to the embedding application.
//!
//! A [`Bridge`] owns (or shares) one event registry, one transport chosen at
//! construction, and the inbound pump that feeds native envelopes into
//! dispatch. Several bridges can coexist; nothing is process-global.

use crate::config::BridgeConfig;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tether_core::{
    BridgeError, Envelope, Handler, Payload, Result, SharedTransport, SubscriptionId, Transport,
};
use tether_std::registry::EventRegistry;
use tether_std::rpc::{PendingCall, RpcClient, RpcRequest, validate_rpc_input};
use tether_std::transport::{UnavailableTransport, emit_to_native};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::debug;

/// Builder for constructing a [`Bridge`].
///
/// # Example
///
/// ```rust
/// use tether::{Bridge, ChannelTransport};
/// use std::time::Duration;
///
/// let (transport, _to_native) = ChannelTransport::new();
/// let bridge = Bridge::builder()
///     .transport(transport)
///     .default_timeout(Duration::from_secs(5))
///     .build();
/// assert_eq!(bridge.transport_name(), "channel");
/// ```
pub struct BridgeBuilder {
    config: BridgeConfig,
    default_timeout: Option<Duration>,
    transport: Option<SharedTransport>,
    registry: Option<Arc<EventRegistry>>,
}

impl BridgeBuilder {
    /// Create a builder with default configuration and no transport.
    pub fn new() -> Self {
        Self {
            config: BridgeConfig::default(),
            default_timeout: None,
            transport: None,
            registry: None,
        }
    }

    /// Apply a configuration, replacing any earlier
    /// [`default_timeout`](Self::default_timeout).
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self.default_timeout = None;
        self
    }

    /// Set the default RPC timeout. Kept at full precision.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Select the native transport.
    pub fn transport<T: Transport>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Select an already shared transport.
    pub fn shared_transport(mut self, transport: SharedTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use an existing registry instead of creating a fresh one.
    pub fn registry(mut self, registry: Arc<EventRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the bridge.
    ///
    /// Without a transport the bridge falls back to [`UnavailableTransport`]:
    /// subscriptions work, emits fail with `TransportUnavailable`.
    pub fn build(self) -> Bridge {
        let registry = self.registry.unwrap_or_default();
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UnavailableTransport) as SharedTransport);
        let default_timeout = self
            .default_timeout
            .unwrap_or_else(|| self.config.default_timeout());
        let rpc = RpcClient::new(registry.clone(), transport.clone())
            .with_default_timeout(default_timeout);
        debug!(transport = transport.name(), "bridge built");
        Bridge {
            registry,
            transport,
            rpc,
            inbound: Mutex::new(None),
        }
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bidirectional messaging bridge between the web layer and the native host.
pub struct Bridge {
    registry: Arc<EventRegistry>,
    transport: SharedTransport,
    rpc: RpcClient,
    inbound: Mutex<Option<JoinHandle<()>>>,
}

impl Bridge {
    /// Create a new bridge builder.
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    /// Create a bridge over `transport` with default configuration.
    pub fn new<T: Transport>(transport: T) -> Self {
        Self::builder().transport(transport).build()
    }

    /// The registry this bridge dispatches into.
    pub fn registry(&self) -> &Arc<EventRegistry> {
        &self.registry
    }

    /// Name of the selected transport.
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Subscribe to events of `event_type` from the native side.
    pub fn on(&self, event_type: &str, handler: impl Into<Handler>) -> Result<SubscriptionId> {
        self.registry.subscribe(event_type, handler.into())
    }

    /// Unsubscribe `handler`, or every handler when `None`.
    ///
    /// Handlers are matched by identity, and that includes subscriptions made
    /// through [`once`](Self::once): `off(type, Some(&h))` also cancels a
    /// pending `once(type, h)`. Entries registered internally by
    /// [`rpc`](Self::rpc) are never matched by a caller's handler.
    pub fn off(&self, event_type: &str, handler: Option<&Handler>) -> Result<()> {
        self.registry.unsubscribe(event_type, handler)
    }

    /// Subscribe a handler that runs at most once.
    pub fn once(&self, event_type: &str, handler: impl Into<Handler>) -> Result<SubscriptionId> {
        self.registry.subscribe_once(event_type, handler.into())
    }

    /// Fire-and-forget an event to the native side. `data` defaults to `{}`.
    pub fn emit(&self, event_type: &str, data: Option<Payload>) -> Result<()> {
        emit_to_native(&*self.transport, event_type, data)
    }

    /// Issue a request/reply call against the native side.
    pub fn rpc(&self, request: RpcRequest) -> Result<PendingCall> {
        self.rpc.call(request)
    }

    /// Validate loosely typed RPC arguments without issuing a call.
    pub fn validate_rpc_input(&self, args: &Value) -> Result<()> {
        validate_rpc_input(args)
    }

    /// Dispatch an inbound envelope. Returns the number of handlers invoked.
    pub fn deliver(&self, envelope: &Envelope) -> usize {
        self.registry.dispatch(&envelope.event_type, &envelope.data)
    }

    /// Decode and dispatch an inbound envelope in JSON text form.
    pub fn deliver_json(&self, text: &str) -> Result<usize> {
        let envelope = Envelope::from_json(text)?;
        Ok(self.deliver(&envelope))
    }

    /// Attach the inbound channel from the native side.
    ///
    /// Spawns a task that dispatches envelopes in arrival order until the
    /// channel closes or the bridge is torn down. Attaching again replaces
    /// the previous channel.
    pub fn attach(&self, mut inbound: UnboundedReceiver<Envelope>) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;
        let registry = self.registry.clone();
        let task = runtime.spawn(async move {
            while let Some(envelope) = inbound.recv().await {
                registry.dispatch(&envelope.event_type, &envelope.data);
            }
            debug!("inbound channel closed");
        });

        let previous = self.inbound_slot().replace(task);
        if let Some(previous) = previous {
            previous.abort();
            debug!("replaced inbound channel");
        }
        Ok(())
    }

    /// Whether an inbound pump is currently running.
    pub fn is_attached(&self) -> bool {
        self.inbound_slot()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Clear every subscription and detach from the inbound channel.
    ///
    /// Safe to call more than once. Pending RPC calls still complete through
    /// their timeout.
    pub fn teardown(&self) {
        if let Some(task) = self.inbound_slot().take() {
            task.abort();
        }
        self.registry.clear();
        debug!(transport = self.transport.name(), "bridge torn down");
    }

    fn inbound_slot(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inbound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        if let Some(task) = self.inbound_slot().take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("transport", &self.transport.name())
            .field("registry", &self.registry)
            .field("rpc", &self.rpc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_std::testing::{RecordingHandler, RecordingTransport};

    #[test]
    fn test_default_transport_is_unavailable() {
        let bridge = Bridge::builder().build();
        assert_eq!(bridge.transport_name(), "unavailable");
        assert!(matches!(
            bridge.emit("ready", None),
            Err(BridgeError::TransportUnavailable { .. })
        ));
    }

    #[test]
    fn test_emit_goes_through_transport() {
        let transport = RecordingTransport::new();
        let bridge = Bridge::new(transport.clone());

        bridge.emit("save", Some(json!({"id": 3}))).unwrap();
        assert_eq!(
            transport.envelopes(),
            vec![Envelope::new("save", Some(json!({"id": 3})))]
        );
    }

    #[test]
    fn test_deliver_json_defaults_data() {
        let bridge = Bridge::new(RecordingTransport::new());
        let recorder = RecordingHandler::new();
        bridge.on("ready", recorder.handler()).unwrap();

        assert_eq!(bridge.deliver_json(r#"{"type":"ready"}"#).unwrap(), 1);
        assert_eq!(recorder.payloads(), vec![json!({})]);
    }

    #[test]
    fn test_attach_requires_runtime() {
        let bridge = Bridge::new(RecordingTransport::new());
        let (_tx, rx) = tokio::sync::mpsc::unbounded_channel();
        assert!(matches!(bridge.attach(rx), Err(BridgeError::NoRuntime)));
        assert!(!bridge.is_attached());
    }

    #[test]
    fn test_builder_timeout_reaches_rpc() {
        let bridge = Bridge::builder()
            .default_timeout(Duration::from_millis(750))
            .build();
        assert_eq!(bridge.rpc.default_timeout(), Duration::from_millis(750));
    }

    #[test]
    fn test_sub_millisecond_timeout_is_not_truncated() {
        let bridge = Bridge::builder()
            .default_timeout(Duration::from_micros(500))
            .build();
        assert_eq!(bridge.rpc.default_timeout(), Duration::from_micros(500));
    }

    #[test]
    fn test_config_after_timeout_wins() {
        let bridge = Bridge::builder()
            .default_timeout(Duration::from_micros(500))
            .config(BridgeConfig {
                default_timeout_ms: 2_000,
            })
            .build();
        assert_eq!(bridge.rpc.default_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(EventRegistry::new());
        let a = Bridge::builder().registry(registry.clone()).build();
        let b = Bridge::builder().registry(registry.clone()).build();

        let recorder = RecordingHandler::new();
        a.on("tick", recorder.handler()).unwrap();
        b.deliver(&Envelope::new("tick", Some(json!(1))));

        assert_eq!(recorder.count(), 1);
    }
}
