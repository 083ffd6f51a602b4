//! Observer list
//!
//! Zero-argument callbacks fired on store events.

use std::sync::Arc;

use parking_lot::Mutex;

/// A subscriber callback
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// A list of subscribers for one event
#[derive(Default)]
pub struct Observers {
    callbacks: Mutex<Vec<Callback>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; earlier subscribers are kept
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks.lock().push(Arc::new(callback));
    }

    /// Invoke every subscriber in registration order.
    ///
    /// The list is cloned first so a callback may subscribe again without
    /// deadlocking.
    pub fn notify(&self) {
        let callbacks = self.callbacks.lock().clone();
        for callback in &callbacks {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.len())
            .finish()
    }
}
