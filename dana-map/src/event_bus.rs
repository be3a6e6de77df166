//! Map events and the listeners subscribed to them.
//!
//! Listeners are named, not stored as closures: the owner of the bus looks
//! up who wants an event and routes it. A [`Subscription`] is the only way
//! to remove a listener, and it is consumed on removal.

/// Camera/viewport events that invalidate pixel-space drawings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEvent {
    MoveEnd,
    Resize,
}

/// Who receives an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Heatmap,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a Subscription leaks the listener; pass it to EventBus::unsubscribe"]
pub struct Subscription {
    id: u64,
}

#[derive(Debug)]
struct Entry {
    id: u64,
    listener: Listener,
    events: Vec<MapEvent>,
}

#[derive(Debug, Default)]
pub struct EventBus {
    next_id: u64,
    entries: Vec<Entry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener, events: &[MapEvent]) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            listener,
            events: events.to_vec(),
        });
        Subscription { id }
    }

    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != subscription.id);
        before != self.entries.len()
    }

    /// Listeners for `event`, in subscription order.
    pub fn listeners_for(&self, event: MapEvent) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|e| e.events.contains(&event))
            .map(|e| e.listener)
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_subscribed(&self, listener: Listener) -> bool {
        self.entries.iter().any(|e| e.listener == listener)
    }
}
