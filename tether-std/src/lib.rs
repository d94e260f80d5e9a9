//! # tether-std
//!
//! Standard implementations for the Tether webview/native messaging bridge.
//!
//! This crate provides:
//! - **Event registry**: [`EventRegistry`](registry::EventRegistry), the
//!   subscription table with subscribe, one-shot subscribe and dispatch
//! - **RPC layer**: [`RpcClient`](rpc::RpcClient) and
//!   [`PendingCall`](rpc::PendingCall), request/reply with timeout
//! - **Transports**: channel, JSON-string and unavailable stubs, plus
//!   [`emit_to_native`](transport::emit_to_native)
//! - **Standard handlers**: logging and channel forwarding
//! - **Testing utilities**: recording doubles and an echo transport

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use tether_core;

// Modules
pub mod handlers;
pub mod registry;
pub mod rpc;
pub mod testing;
pub mod transport;
