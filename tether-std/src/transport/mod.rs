//! Concrete native transports and the outbound emit path.
//!
//! | Transport | Native side receives | Use Case |
//! |-----------|----------------------|----------|
//! | [`ChannelTransport`] | `Envelope` values | hosts that accept structured messages |
//! | [`JsonTransport`] | JSON text | bridges that only pass strings |
//! | [`UnavailableTransport`] | nothing | no native bridge in this context |

mod channel;
mod json;
mod unavailable;

pub use channel::ChannelTransport;
pub use json::JsonTransport;
pub use unavailable::UnavailableTransport;

use crate::registry::validate_event_type;
use tether_core::{BridgeError, Envelope, Payload, Result, Transport};
use tracing::{trace, warn};

/// Send a fire-and-forget event to the native side.
///
/// `data` defaults to `{}`. The subscription table is not touched. Fails with
/// `TransportUnavailable` if the transport reports no bridge at call time.
pub fn emit_to_native<T>(transport: &T, event_type: &str, data: Option<Payload>) -> Result<()>
where
    T: Transport + ?Sized,
{
    validate_event_type(event_type)?;
    if !transport.is_available() {
        warn!(transport = transport.name(), event_type, "no native bridge available");
        return Err(BridgeError::TransportUnavailable {
            transport: transport.name().to_owned(),
        });
    }
    let envelope = Envelope::new(event_type, data);
    trace!(transport = transport.name(), event_type, "emitting to native");
    transport.send(&envelope)
}
