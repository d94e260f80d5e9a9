//! Channel transport for hosts that accept structured messages.

use tether_core::{BridgeError, Envelope, Result, Transport};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Forwards envelopes over an unbounded tokio channel to the native host.
///
/// The transport is available for as long as the receiving half is alive.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: UnboundedSender<Envelope>,
}

impl ChannelTransport {
    /// Create a transport and the receiver the host reads from.
    pub fn new() -> (Self, UnboundedReceiver<Envelope>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Wrap an existing sender.
    pub fn from_sender(tx: UnboundedSender<Envelope>) -> Self {
        Self { tx }
    }
}

impl Transport for ChannelTransport {
    fn name(&self) -> &str {
        "channel"
    }

    fn is_available(&self) -> bool {
        !self.tx.is_closed()
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        self.tx
            .send(envelope.clone())
            .map_err(|_| BridgeError::TransportUnavailable {
                transport: self.name().to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_reaches_receiver() {
        let (transport, mut rx) = ChannelTransport::new();
        let envelope = Envelope::new("ping", Some(json!("hi")));

        transport.send(&envelope).unwrap();
        assert_eq!(rx.try_recv().unwrap(), envelope);
    }

    #[test]
    fn test_closed_receiver_is_unavailable() {
        let (transport, rx) = ChannelTransport::new();
        assert!(transport.is_available());

        drop(rx);
        assert!(!transport.is_available());
        assert!(transport.send(&Envelope::new("ping", None)).is_err());
    }
}
