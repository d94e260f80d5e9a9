//! # tether - WebView/Native Messaging Bridge
//!
//! `tether` connects a web UI running inside a native application's embedded
//! browser view to the host application. The web layer can:
//!
//! - emit fire-and-forget events to the native side ([`Bridge::emit`])
//! - subscribe to events coming from the native side ([`Bridge::on`],
//!   [`Bridge::once`], [`Bridge::off`])
//! - make request/reply calls with a timeout ([`Bridge::rpc`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tether::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), BridgeError> {
//! let (transport, _to_native) = ChannelTransport::new();
//! let (_from_native_tx, from_native) = tokio::sync::mpsc::unbounded_channel();
//!
//! let bridge = Bridge::new(transport);
//! bridge.attach(from_native)?;
//!
//! bridge.on("themeChanged", Handler::new(|theme| println!("theme: {theme}")))?;
//! bridge.emit("ready", None)?;
//!
//! let user = bridge.rpc(RpcRequest::new("getUser", json!({"id": 7})))?.await?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bridge;
mod config;

pub use bridge::{Bridge, BridgeBuilder};
pub use config::BridgeConfig;

pub use tether_core::{
    // Errors
    BridgeError,
    // Wire
    Envelope,
    // Handlers
    Handler,
    Payload,
    Result,
    SharedTransport,
    SubscriptionId,
    // Transport seam
    Transport,
    empty_object,
};

// Registry and RPC
pub use tether_std::{
    registry::EventRegistry,
    rpc::{DEFAULT_TIMEOUT, PendingCall, RpcClient, RpcRequest, validate_rpc_input},
};

// Transports
pub use tether_std::transport::{
    ChannelTransport, JsonTransport, UnavailableTransport, emit_to_native,
};

/// Standard handler implementations.
pub mod handlers {
    #![allow(clippy::wildcard_imports)]
    pub use tether_std::handlers::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use tether_std::testing::*;
}

/// Prelude module - common imports for Tether.
///
/// # Usage
///
/// ```rust,ignore
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bridge, BridgeBuilder, BridgeConfig, BridgeError, ChannelTransport, Envelope, Handler,
        JsonTransport, Payload, PendingCall, RpcRequest, SubscriptionId, Transport,
    };
}
