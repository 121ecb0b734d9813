use std::collections::HashSet;

pub type PeerId = String;

/// A named collaboration room in the signaling index.
///
/// A topic is nothing more than its subscriber set: it is created lazily
/// when the first peer subscribes and the broker deletes it the moment the
/// set becomes empty, so an entry in the index always has at least one
/// subscriber. Topic names are opaque to the broker; callers namespace them
/// (application prefix + room code) to avoid collisions.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashSet<PeerId>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashSet::new(),
        }
    }

    /// Adds a subscriber. Subscribing twice has no effect.
    pub fn subscribe(&mut self, id: PeerId) {
        self.subscribers.insert(id);
    }

    /// Removes a subscriber. Unknown subscribers are a no-op.
    pub fn unsubscribe(&mut self, id: &PeerId) {
        self.subscribers.remove(id);
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn peer_count(&self) -> usize {
        self.subscribers.len()
    }
}
