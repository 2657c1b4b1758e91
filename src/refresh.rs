//! Page-wide refresh signal.
//!
//! Views subscribe a handler when they mount and drop the returned
//! [`Subscription`] when they tear down. A successful mutation calls
//! [`RefreshBus::emit`], which runs every current handler once. The periodic
//! fallback is just another emitter.

use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex, MutexGuard, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::debug;

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: Mutex<BTreeMap<u64, Handler>>,
}

impl Registry {
    fn handlers(&self) -> MutexGuard<'_, BTreeMap<u64, Handler>> {
        self.handlers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Clone, Default)]
pub struct RefreshBus {
    registry: Arc<Registry>,
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every subscribed handler once and returns how many ran.
    pub fn emit(&self) -> usize {
        // Handlers may subscribe or unsubscribe; never call them under the lock.
        let handlers: Vec<Handler> = self.registry.handlers().values().cloned().collect();
        for handler in &handlers {
            handler();
        }
        debug!(subscribers = handlers.len(), "refresh signal emitted");
        handlers.len()
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.handlers().insert(id, Arc::new(handler));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.handlers().len()
    }

    /// Emits on a fixed interval until the returned task is aborted.
    pub fn spawn_periodic(&self, interval: Duration) -> JoinHandle<()> {
        let bus = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; views already fetched on mount.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                bus.emit();
            }
        })
    }
}

/// Removes its handler from the bus when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.handlers().remove(&self.id);
        }
    }
}
