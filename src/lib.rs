//! # peerhub
//!
//! `peerhub` is a WebRTC signaling and room rendezvous broker. Browser peers
//! connect over WebSocket, subscribe to named topics (collaboration rooms),
//! and exchange SDP/ICE handshake frames with the other subscribers of the
//! same topic. The broker relays frames verbatim and never inspects payloads;
//! document sync happens entirely peer-to-peer on the client side.
//!
//! ## Core Modules
//!
//! - `broker`: the connection registry and topic index, message fan-out, and
//!   the liveness sweep that evicts unresponsive peers.
//! - `peer`: one registered WebSocket connection and its outbound channel.
//! - `transport`: the JSON signaling protocol and the WebSocket server.
//! - `query`: the read-only HTTP endpoint reporting room occupancy.
//! - `config`: layered server configuration (file + environment).
//! - `utils`: shared helpers such as logging initialization.

pub mod broker;
pub mod config;
pub mod peer;
pub mod query;
pub mod transport;
pub mod utils;
