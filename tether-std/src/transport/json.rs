//! JSON-string transport for bridges that only pass text.

use tether_core::{Envelope, Result, Transport};

/// Serializes each envelope to JSON text and hands it to a sink.
///
/// # Example
///
/// ```rust
/// use tether_core::{Envelope, Transport};
/// use tether_std::transport::JsonTransport;
///
/// let transport = JsonTransport::new(|text| println!("-> native: {text}"));
/// transport.send(&Envelope::new("ready", None)).unwrap();
/// ```
pub struct JsonTransport<F> {
    sink: F,
}

impl<F> JsonTransport<F>
where
    F: Fn(String) + Send + Sync + 'static,
{
    /// Create a transport writing to `sink`.
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<F> Transport for JsonTransport<F>
where
    F: Fn(String) + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "json"
    }

    fn send(&self, envelope: &Envelope) -> Result<()> {
        let text = envelope.to_json()?;
        (self.sink)(text);
        Ok(())
    }
}
