//! Event handlers and subscription identity.
//!
//! A [`Handler`] is a shared, side-effecting function over a payload. It has no
//! identity beyond the function object itself: clones of one handler compare
//! equal, separately constructed handlers never do. That equality is what
//! unsubscribing by handler matches on.

use crate::message::Payload;
use std::fmt;
use std::sync::Arc;

/// A unary, side-effecting function invoked with an event payload.
///
/// # Example
///
/// ```rust
/// use tether_core::Handler;
///
/// let a = Handler::new(|payload| println!("{payload}"));
/// let b = a.clone();
/// let c = Handler::new(|payload| println!("{payload}"));
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn(&Payload) + Send + Sync + 'static>);

impl Handler {
    /// Wrap a closure as a handler.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the handler.
    pub fn call(&self, payload: &Payload) {
        (self.0)(payload)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl<F> From<F> for Handler
where
    F: Fn(&Payload) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Handler::new(f)
    }
}

/// Identifies a single entry in a subscription table.
///
/// Ids are unique per registry and increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_call_invokes_closure() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handler = Handler::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        handler.call(&json!("ping"));
        handler.clone().call(&json!("ping"));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_identity_is_per_construction() {
        fn noop(_: &Payload) {}
        let a = Handler::new(noop);
        let b = Handler::new(noop);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
