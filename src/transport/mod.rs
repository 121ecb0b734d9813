//! The `transport` module is responsible for network communication with
//! signaling clients over WebSockets.
//!
//! It defines the JSON frame protocol spoken between peers and the broker,
//! and implements the WebSocket server itself: the accept loop, the
//! handshake path check, per-connection reader/writer tasks, and the
//! heartbeat sweeper that keeps the registry free of dead connections.

pub mod message;
pub mod websocket;
