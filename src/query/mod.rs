//! The `query` module exposes the room-existence check outside the
//! WebSocket protocol: a read-only HTTP endpoint that clients hit before
//! joining a room, to warn the user when the room is empty or nonexistent.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::broker::Broker;

/// Snapshot of a room's occupancy, as reported to HTTP clients.
///
/// Advisory only: the count can change the instant after the response is
/// sent, so callers must not treat it as a guarantee.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    pub exists: bool,
    pub peer_count: usize,
}

/// Builds the query router: `GET /rooms/{room}/check`.
pub fn router(broker: Arc<Mutex<Broker>>) -> Router {
    Router::new()
        .route("/rooms/{room}/check", get(check_room))
        .with_state(broker)
}

async fn check_room(
    State(broker): State<Arc<Mutex<Broker>>>,
    Path(room): Path<String>,
) -> Json<RoomStatus> {
    let peer_count = broker.lock().unwrap().peer_count(&room);
    Json(RoomStatus {
        exists: peer_count > 0,
        peer_count,
    })
}

/// Serves the room-existence endpoint until the listener fails.
pub async fn start_query_server(addr: String, broker: Arc<Mutex<Broker>>) {
    let listener = tokio::net::TcpListener::bind(&addr).await.expect("Can't bind");
    info!("room query endpoint listening on http://{}", addr);
    axum::serve(listener, router(broker)).await.ok();
}
