use std::collections::HashSet;

use tokio::sync::mpsc::UnboundedSender;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::topic::PeerId;

/// One registered signaling connection.
///
/// A peer has no persisted identity; the id is minted at upgrade time and
/// dies with the socket. `topics` mirrors the topic index: every room name
/// held here also lists this peer in its subscriber set.
#[derive(Debug)]
pub struct Peer {
    /// Identifier assigned at upgrade time.
    pub id: PeerId,

    /// Channel feeding this peer's outbound WebSocket writer task.
    pub sender: UnboundedSender<WsMessage>,

    /// Heartbeat flag: cleared by each liveness sweep, set again when the
    /// peer answers with a transport-level Pong.
    pub alive: bool,

    /// Names of every room this peer is currently subscribed to.
    pub topics: HashSet<String>,
}

impl Peer {
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: format!("peer-{}", uuid::Uuid::new_v4()),
            sender,
            alive: true,
            topics: HashSet::new(),
        }
    }

    /// Queues a frame on the outbound channel. Returns false if the writer
    /// task is gone, which means the connection is already shutting down.
    pub fn send(&self, msg: WsMessage) -> bool {
        self.sender.send(msg).is_ok()
    }
}
