//! Render notifications.
//!
//! A render notification is a one-way, fire-and-forget signal telling the
//! display side that a render pass may now observe new graph state. It is
//! usually raised on the algorithm thread and consumed on the driver
//! thread, so every sink here is `Send + Sync`.
//!
//! Two kinds of sink are supported:
//!
//! - Callbacks registered with [`RenderNotifier::subscribe`]. They run on
//!   the emitting thread and must not block; in particular a callback must
//!   never call back into the controller's `step`. A callback may subscribe
//!   or unsubscribe (itself included); the change applies from the next
//!   emit.
//! - Channels created with [`RenderNotifier::channel`]. Closed channels are
//!   dropped on the next emit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use parking_lot::{Mutex, RwLock};

use super::state::RunId;

/// Where a render notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    /// The algorithm reached a checkpoint.
    Checkpoint,
    /// The driver's `step` returned.
    Step,
}

/// "The graph may have changed, please re-render."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderEvent {
    /// Run the event belongs to.
    pub run: RunId,
    /// Checkpoints the run had reached when the event was raised.
    pub checkpoint: u64,
    pub origin: EventOrigin,
}

/// Identifies a callback registered with one [`RenderNotifier`].
///
/// IDs are unique per notifier, not across notifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

type Callback = Arc<dyn Fn(&RenderEvent) + Send + Sync>;

/// A callback sink.
struct Subscriber {
    id: SubscriberId,
    notify: Callback,
}

/// Fans render events out to every registered sink.
#[derive(Default)]
pub struct RenderNotifier {
    subscribers: RwLock<Vec<Subscriber>>,
    channels: Mutex<Vec<mpsc::Sender<RenderEvent>>>,
    next_subscriber: AtomicU64,
}

impl RenderNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It is invoked on whichever thread emits.
    pub fn subscribe<F>(&self, notify: F) -> SubscriberId
    where
        F: Fn(&RenderEvent) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Subscriber {
            id,
            notify: Arc::new(notify),
        });
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Open a channel that receives every subsequent event.
    pub fn channel(&self) -> mpsc::Receiver<RenderEvent> {
        let (tx, rx) = mpsc::channel();
        self.channels.lock().push(tx);
        rx
    }

    /// Deliver an event to every sink.
    ///
    /// Callbacks run after the subscriber list lock is released, so they
    /// may register or remove callbacks themselves.
    pub fn emit(&self, event: RenderEvent) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .read()
            .iter()
            .map(|s| Arc::clone(&s.notify))
            .collect();
        for notify in callbacks {
            notify(&event);
        }
        self.channels.lock().retain(|tx| tx.send(event).is_ok());
    }

    /// Number of live sinks.
    pub fn sink_count(&self) -> usize {
        self.subscribers.read().len() + self.channels.lock().len()
    }
}

impl std::fmt::Debug for RenderNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderNotifier")
            .field("subscribers", &self.subscribers.read().len())
            .field("channels", &self.channels.lock().len())
            .finish()
    }
}
