//! Standard handler implementations.

use tether_core::Handler;

/// A handler that logs every payload it observes.
///
/// Subscribe it next to real handlers to watch traffic on a type without
/// affecting dispatch.
pub fn logging_handler(label: &'static str) -> Handler {
    Handler::new(move |payload| {
        tracing::info!(label, %payload, "event observed");
    })
}

/// A handler that forwards every payload to a tokio channel.
///
/// Lets async code await events the registry delivers synchronously. Payloads
/// are dropped once the receiver is gone.
pub fn channel_handler(tx: tokio::sync::mpsc::UnboundedSender<tether_core::Payload>) -> Handler {
    Handler::new(move |payload| {
        let _ = tx.send(payload.clone());
    })
}
