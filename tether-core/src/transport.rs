//! The native transport seam.
//!
//! The core never talks to a platform API directly. It hands outbound
//! envelopes to a [`Transport`] and receives inbound envelopes through a
//! channel the embedding application wires up. Concrete transports are chosen
//! once, at initialization.

use crate::error::Result;
use crate::message::Envelope;
use std::sync::Arc;

/// Outbound half of a native bridge.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a native transport",
    label = "missing `Transport` implementation",
    note = "Transports must implement `name`, `is_available` and `send`."
)]
pub trait Transport: Send + Sync + 'static {
    /// Human-readable transport name (e.g. "channel", "json").
    fn name(&self) -> &str;

    /// Whether a native bridge is reachable right now.
    ///
    /// Checked on every emit, so a transport may come and go at runtime.
    fn is_available(&self) -> bool {
        true
    }

    /// Deliver an envelope to the native side.
    ///
    /// Fails with [`BridgeError::TransportUnavailable`] if no bridge is present.
    ///
    /// [`BridgeError::TransportUnavailable`]: crate::BridgeError::TransportUnavailable
    fn send(&self, envelope: &Envelope) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        (**self).send(envelope)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        (**self).send(envelope)
    }
}

/// A type-erased transport shared between the registry-facing facade and the
/// RPC layer.
pub type SharedTransport = Arc<dyn Transport>;
