use std::collections::HashMap;

use tracing::{debug, warn};
use tungstenite::Bytes;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::topic::{PeerId, Topic};
use crate::peer::Peer;

/// The connection registry and topic index of the signaling broker.
///
/// The broker tracks every live connection together with the set of rooms it
/// has joined, and fans published frames out to the other subscribers of a
/// room. The peer/topic relation is kept symmetric: every mutation updates
/// `Peer::topics` and `Topic::subscribers` inside the same `&mut self` call,
/// so callers that serialize access (the server wraps the broker in a mutex)
/// never observe a half-updated relation.
#[derive(Debug, Default)]
pub struct Broker {
    pub(crate) topics: HashMap<String, Topic>,
    pub(crate) peers: HashMap<PeerId, Peer>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly upgraded connection. The peer starts alive and
    /// subscribed to nothing.
    pub fn register_peer(&mut self, peer: Peer) {
        self.peers.insert(peer.id.clone(), peer);
    }

    /// Subscribes a peer to every room in the list, creating rooms lazily.
    /// Subscribing to a room the peer is already in is a no-op.
    pub fn subscribe(&mut self, peer_id: &PeerId, topics: &[String]) {
        let Some(peer) = self.peers.get_mut(peer_id) else {
            return;
        };
        for name in topics {
            let topic = self
                .topics
                .entry(name.clone())
                .or_insert_with(|| Topic::new(name));
            topic.subscribe(peer_id.clone());
            peer.topics.insert(name.clone());
        }
    }

    /// Unsubscribes a peer from every room in the list. A room left with no
    /// subscribers is removed from the index immediately. Leaving a room the
    /// peer never joined is a no-op.
    pub fn unsubscribe(&mut self, peer_id: &PeerId, topics: &[String]) {
        for name in topics {
            let emptied = match self.topics.get_mut(name) {
                Some(topic) => {
                    topic.unsubscribe(peer_id);
                    topic.is_empty()
                }
                None => false,
            };
            if emptied {
                self.topics.remove(name);
            }
            if let Some(peer) = self.peers.get_mut(peer_id) {
                peer.topics.remove(name);
            }
        }
    }

    /// Fans a raw text frame out to every subscriber of `topic` except the
    /// sender. The frame is forwarded verbatim; an unknown or empty topic
    /// drops it silently. Fire-and-forget: a peer whose outbound channel is
    /// already closed is skipped and torn down by its own connection task.
    ///
    /// Returns the number of peers the frame was queued for.
    pub fn publish(&self, sender_id: &PeerId, topic: &str, frame: &str) -> usize {
        let Some(t) = self.topics.get(topic) else {
            debug!(topic, "publish to unknown topic dropped");
            return 0;
        };
        let mut delivered = 0;
        for sub_id in &t.subscribers {
            if sub_id == sender_id {
                continue;
            }
            match self.peers.get(sub_id) {
                Some(peer) => {
                    if peer.send(WsMessage::text(frame)) {
                        delivered += 1;
                    } else {
                        warn!(peer = %sub_id, "failed to queue frame, peer is closing");
                    }
                }
                None => warn!(peer = %sub_id, "subscriber missing from registry"),
            }
        }
        delivered
    }

    /// Marks a peer live again. Called when a transport-level Pong arrives.
    pub fn mark_alive(&mut self, peer_id: &PeerId) {
        if let Some(peer) = self.peers.get_mut(peer_id) {
            peer.alive = true;
        }
    }

    /// One liveness-monitor tick.
    ///
    /// Peers that never answered the previous Ping are evicted: a close
    /// frame is queued best-effort and their rooms are cleaned up as if they
    /// had disconnected. Every remaining peer is then re-armed (`alive`
    /// cleared) and sent a fresh transport-level Ping, so a silent peer
    /// survives at most two sweep intervals.
    ///
    /// Returns the ids of the evicted peers.
    pub fn sweep(&mut self) -> Vec<PeerId> {
        let dead: Vec<PeerId> = self
            .peers
            .values()
            .filter(|p| !p.alive)
            .map(|p| p.id.clone())
            .collect();
        for id in &dead {
            if let Some(peer) = self.peers.get(id) {
                peer.send(WsMessage::Close(None));
            }
            warn!(peer = %id, "missed two heartbeats, evicting");
            self.disconnect(id);
        }
        for peer in self.peers.values_mut() {
            peer.alive = false;
            peer.send(WsMessage::Ping(Bytes::new()));
        }
        dead
    }

    /// Tears a connection down: removes the peer from every room it joined,
    /// deleting rooms that become empty, then forgets the peer itself. This
    /// is the single cleanup path for close frames, transport errors, and
    /// heartbeat eviction alike; calling it for an unknown peer is a no-op.
    pub fn disconnect(&mut self, peer_id: &PeerId) {
        let Some(peer) = self.peers.remove(peer_id) else {
            return;
        };
        for name in &peer.topics {
            let emptied = match self.topics.get_mut(name) {
                Some(topic) => {
                    topic.unsubscribe(peer_id);
                    topic.is_empty()
                }
                None => false,
            };
            if emptied {
                self.topics.remove(name);
            }
        }
        debug!(peer = %peer_id, "connection cleaned up");
    }

    /// Current subscriber count for a room, zero if the room does not exist.
    /// A racy snapshot: the count can change the instant after it is read.
    pub fn peer_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Topic::peer_count)
    }
}
