use serde::{Deserialize, Serialize};

/// Inbound signaling frames, tagged by their `type` field.
///
/// A frame with an unknown or missing tag fails to parse; the dispatcher
/// logs and drops it without touching the connection. A publish frame may
/// carry arbitrary payload fields (SDP offers, ICE candidates) beyond
/// `topic` — only the topic is extracted here, because the raw frame text is
/// what gets forwarded to the other subscribers.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    Subscribe {
        #[serde(default)]
        topics: Vec<String>,
    },

    Unsubscribe {
        #[serde(default)]
        topics: Vec<String>,
    },

    Publish {
        topic: String,
    },

    Ping,
}

/// Frames originated by the broker itself rather than relayed from a peer.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    Pong,
}
