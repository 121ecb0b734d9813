//! The `peer` module defines the representation of one signaling connection.
//!
//! It provides the `Peer` struct, which holds a connection's identifier, the
//! channel feeding its outbound writer task, its heartbeat flag, and the set
//! of rooms it has joined.

pub mod session;
pub use session::Peer;
