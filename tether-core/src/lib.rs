//! # tether-core
//!
//! Core types for the Tether webview/native messaging bridge.
//!
//! This crate has minimal dependencies and is what transports and host-side
//! integrations import when they don't need the registry or RPC machinery
//! from `tether-std`.
//!
//! # Building Blocks
//!
//! - [`Envelope`]: the `{type, data}` unit exchanged with the native host
//! - [`Handler`]: a shared function invoked with an event payload
//! - [`SubscriptionId`]: identifies one registry entry
//! - [`Transport`]: the outbound seam to the native side
//!
//! # Error Types
//!
//! - [`BridgeError`] - the single error type, with a [`Result`] alias

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler;
mod message;
mod transport;

// Re-exports
pub use error::{BridgeError, Result};
pub use handler::{Handler, SubscriptionId};
pub use message::{Envelope, Payload, empty_object};
pub use transport::{SharedTransport, Transport};
