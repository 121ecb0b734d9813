use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::accept_hdr_async;
use tracing::{debug, error, info};
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::Broker;
use crate::broker::topic::PeerId;
use crate::config::SignalingSettings;
use crate::peer::Peer;
use crate::transport::message::{ReplyMessage, SignalMessage};

/// Runs the signaling WebSocket server until the listener fails.
///
/// Accepts upgrades on `settings.path` only, registers each connection with
/// the broker, and keeps the liveness sweeper running for as long as the
/// listener is open.
pub async fn start_websocket_server(
    addr: &str,
    broker: Arc<Mutex<Broker>>,
    settings: SignalingSettings,
) {
    let listener = TcpListener::bind(addr).await.expect("Can't bind");
    info!("signaling server listening on ws://{}{}", addr, settings.path);

    let sweeper = spawn_liveness_sweeper(
        broker.clone(),
        Duration::from_secs(settings.heartbeat_interval_secs),
    );

    while let Ok((stream, _)) = listener.accept().await {
        let broker = broker.clone();
        let path = settings.path.clone();
        tokio::spawn(async move {
            handle_connection(stream, broker, path).await;
        });
    }

    // The listener is gone, so no timer may outlive the server.
    sweeper.abort();
}

/// Starts the recurring heartbeat sweep: each tick evicts peers that never
/// answered the previous Ping and re-arms the rest.
fn spawn_liveness_sweeper(
    broker: Arc<Mutex<Broker>>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick of a tokio interval completes immediately; the
        // sweep should only start one full period after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = broker.lock().unwrap().sweep();
            if !evicted.is_empty() {
                info!(count = evicted.len(), "evicted unresponsive peers");
            }
        }
    })
}

async fn handle_connection(stream: TcpStream, broker: Arc<Mutex<Broker>>, path: String) {
    let callback = |req: &Request, resp: Response| {
        if req.uri().path() == path {
            Ok(resp)
        } else {
            debug!(path = req.uri().path(), "rejecting upgrade on unknown path");
            let mut not_found = ErrorResponse::new(Some("not found".into()));
            *not_found.status_mut() = StatusCode::NOT_FOUND;
            Err(not_found)
        }
    };

    let ws_stream = match accept_hdr_async(stream, callback).await {
        Ok(ws) => ws,
        Err(e) => {
            debug!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Everything outbound goes through this queue; only the writer task
    // touches the sink, so a slow peer never blocks anyone else.
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let peer_id = {
        let peer = Peer::new(tx.clone());
        let id = peer.id.clone();
        broker.lock().unwrap().register_peer(peer);
        id
    };
    info!(peer = %peer_id, "peer connected");

    let writer_peer = peer_id.clone();
    let mut writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, WsMessage::Close(_));
            if let Err(e) = ws_sender.send(msg).await {
                debug!(peer = %writer_peer, "send failed: {}", e);
                break;
            }
            // A queued close frame means the broker evicted this peer; stop
            // writing so the socket is released instead of lingering until
            // the OS gives up on the dead connection.
            if closing {
                break;
            }
        }
    });

    let reader_broker = broker.clone();
    let reader_peer = peer_id.clone();
    let mut reader = tokio::spawn(async move {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    handle_text_frame(&reader_broker, &reader_peer, &tx, text.as_str());
                }
                // Transport-level liveness signal, independent of the JSON
                // ping/pong messages of the protocol.
                Ok(WsMessage::Pong(_)) => reader_broker.lock().unwrap().mark_alive(&reader_peer),
                Ok(WsMessage::Close(_)) => break,
                // Binary frames and inbound pings carry nothing for the broker;
                // pings are answered by the protocol layer on its own.
                Ok(_) => {}
                Err(e) => {
                    debug!(peer = %reader_peer, "transport error: {}", e);
                    break;
                }
            }
        }
    });

    // Whichever side finishes first takes the other down with it, so an
    // evicted connection does not keep a reader parked on a dead socket.
    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    broker.lock().unwrap().disconnect(&peer_id);
    info!(peer = %peer_id, "peer disconnected");
}

/// Dispatches one inbound text frame.
///
/// Malformed or unrecognized frames are logged and dropped; they never close
/// the connection. The application-level `ping` is answered on the sender's
/// own queue, bypassing the topic index entirely.
pub(crate) fn handle_text_frame(
    broker: &Arc<Mutex<Broker>>,
    peer_id: &PeerId,
    reply: &UnboundedSender<WsMessage>,
    text: &str,
) {
    match serde_json::from_str::<SignalMessage>(text) {
        Ok(SignalMessage::Subscribe { topics }) => {
            broker.lock().unwrap().subscribe(peer_id, &topics);
            debug!(peer = %peer_id, ?topics, "subscribed");
        }
        Ok(SignalMessage::Unsubscribe { topics }) => {
            broker.lock().unwrap().unsubscribe(peer_id, &topics);
            debug!(peer = %peer_id, ?topics, "unsubscribed");
        }
        Ok(SignalMessage::Publish { topic }) => {
            // The entire original frame is forwarded, not just the payload.
            let delivered = broker.lock().unwrap().publish(peer_id, &topic, text);
            debug!(peer = %peer_id, topic, delivered, "published");
        }
        Ok(SignalMessage::Ping) => match serde_json::to_string(&ReplyMessage::Pong) {
            Ok(pong) => {
                let _ = reply.send(WsMessage::text(pong));
            }
            Err(e) => error!("failed to serialize pong reply: {}", e),
        },
        Err(e) => {
            debug!(peer = %peer_id, "ignoring unrecognized frame: {}", e);
        }
    }
}
