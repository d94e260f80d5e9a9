//! Stub transport for contexts without a native bridge (desktop, CI, tests).

use tether_core::{BridgeError, Envelope, Result, Transport};

/// Transport used when no native bridge is present.
///
/// Every send fails with `TransportUnavailable`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTransport;

impl Transport for UnavailableTransport {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        tracing::warn!(
            event_type = %envelope.event_type,
            "send called on unavailable transport"
        );
        Err(BridgeError::TransportUnavailable {
            transport: self.name().to_owned(),
        })
    }
}
