use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tungstenite::protocol::Message as WsMessage;

use super::Broker;
use super::topic::{PeerId, Topic};
use crate::peer::Peer;

fn register_peer(broker: &mut Broker) -> (PeerId, UnboundedReceiver<WsMessage>) {
    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    let peer = Peer::new(tx);
    let id = peer.id.clone();
    broker.register_peer(peer);
    (id, rx)
}

fn recv_text(rx: &mut UnboundedReceiver<WsMessage>) -> String {
    match rx.try_recv().expect("expected a queued frame") {
        WsMessage::Text(text) => text.to_string(),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

#[test]
fn test_topic_new() {
    let topic = Topic::new("app-room-42");
    assert_eq!(topic.name, "app-room-42");
    assert!(topic.subscribers.is_empty());
}

#[test]
fn test_topic_subscribe_and_unsubscribe() {
    let mut topic = Topic::new("app-room-42");
    topic.subscribe("peer-1".to_string());
    assert!(topic.subscribers.contains("peer-1"));
    assert_eq!(topic.peer_count(), 1);

    topic.unsubscribe(&"peer-1".to_string());
    assert!(topic.is_empty());
}

#[test]
fn test_broker_new() {
    let broker = Broker::new();
    assert!(broker.topics.is_empty());
    assert!(broker.peers.is_empty());
}

#[test]
fn test_register_and_disconnect_peer() {
    let mut broker = Broker::new();
    let (id, _rx) = register_peer(&mut broker);
    assert!(broker.peers.contains_key(&id));

    broker.disconnect(&id);
    assert!(!broker.peers.contains_key(&id));
}

#[test]
fn test_subscribe_links_both_sides() {
    let mut broker = Broker::new();
    let (id, _rx) = register_peer(&mut broker);

    broker.subscribe(&id, &["room-1".to_string(), "room-2".to_string()]);

    for room in ["room-1", "room-2"] {
        assert!(broker.topics.get(room).unwrap().subscribers.contains(&id));
        assert!(broker.peers.get(&id).unwrap().topics.contains(room));
    }
}

#[test]
fn test_subscribe_is_idempotent() {
    let mut broker = Broker::new();
    let (id, _rx) = register_peer(&mut broker);

    broker.subscribe(&id, &["room-1".to_string()]);
    broker.subscribe(&id, &["room-1".to_string()]);

    assert_eq!(broker.peer_count("room-1"), 1);
    assert_eq!(broker.peers.get(&id).unwrap().topics.len(), 1);
}

#[test]
fn test_subscribe_unregistered_peer_is_noop() {
    let mut broker = Broker::new();
    broker.subscribe(&"peer-ghost".to_string(), &["room-1".to_string()]);
    assert!(broker.topics.is_empty());
}

#[test]
fn test_unsubscribe_removes_empty_topic() {
    let mut broker = Broker::new();
    let (id, _rx) = register_peer(&mut broker);

    broker.subscribe(&id, &["room-1".to_string(), "room-2".to_string()]);
    broker.unsubscribe(&id, &["room-1".to_string()]);

    // The emptied room is gone from the index entirely, not left empty.
    assert!(!broker.topics.contains_key("room-1"));
    assert_eq!(broker.peer_count("room-1"), 0);
    assert_eq!(broker.peer_count("room-2"), 1);
    assert!(!broker.peers.get(&id).unwrap().topics.contains("room-1"));
}

#[test]
fn test_unsubscribe_keeps_topic_with_other_subscribers() {
    let mut broker = Broker::new();
    let (a, _rx_a) = register_peer(&mut broker);
    let (b, _rx_b) = register_peer(&mut broker);

    broker.subscribe(&a, &["room-1".to_string()]);
    broker.subscribe(&b, &["room-1".to_string()]);
    broker.unsubscribe(&a, &["room-1".to_string()]);

    assert_eq!(broker.peer_count("room-1"), 1);
    assert!(broker.topics.get("room-1").unwrap().subscribers.contains(&b));
}

#[test]
fn test_unsubscribe_unknown_topic_is_noop() {
    let mut broker = Broker::new();
    let (id, _rx) = register_peer(&mut broker);
    broker.unsubscribe(&id, &["never-joined".to_string()]);
    assert!(broker.topics.is_empty());
}

#[test]
fn test_publish_skips_sender() {
    let mut broker = Broker::new();
    let (a, mut rx_a) = register_peer(&mut broker);
    let (b, mut rx_b) = register_peer(&mut broker);
    let (c, mut rx_c) = register_peer(&mut broker);

    for id in [&a, &b, &c] {
        broker.subscribe(id, &["room-42".to_string()]);
    }

    let frame = r#"{"type":"publish","topic":"room-42","sdp":"v=0 offer"}"#;
    let delivered = broker.publish(&a, "room-42", frame);

    assert_eq!(delivered, 2);
    assert_eq!(recv_text(&mut rx_b), frame);
    assert_eq!(recv_text(&mut rx_c), frame);
    assert!(rx_a.try_recv().is_err());
}

#[test]
fn test_publish_unknown_topic_is_dropped() {
    let mut broker = Broker::new();
    let (a, mut rx_a) = register_peer(&mut broker);

    let delivered = broker.publish(&a, "nowhere", r#"{"type":"publish","topic":"nowhere"}"#);

    assert_eq!(delivered, 0);
    assert!(rx_a.try_recv().is_err());
}

#[test]
fn test_publish_survives_closed_subscriber_channel() {
    let mut broker = Broker::new();
    let (a, _rx_a) = register_peer(&mut broker);
    let (b, rx_b) = register_peer(&mut broker);
    let (c, mut rx_c) = register_peer(&mut broker);

    for id in [&b, &c] {
        broker.subscribe(id, &["room-42".to_string()]);
    }
    // b's writer task is gone; the fan-out must still reach c.
    drop(rx_b);

    let frame = r#"{"type":"publish","topic":"room-42","candidate":"..."}"#;
    let delivered = broker.publish(&a, "room-42", frame);

    assert_eq!(delivered, 1);
    assert_eq!(recv_text(&mut rx_c), frame);
}

#[test]
fn test_disconnect_cleans_all_topics() {
    let mut broker = Broker::new();
    let (a, _rx_a) = register_peer(&mut broker);
    let (b, _rx_b) = register_peer(&mut broker);

    broker.subscribe(&a, &["solo".to_string(), "shared".to_string()]);
    broker.subscribe(&b, &["shared".to_string()]);

    broker.disconnect(&a);

    assert!(!broker.peers.contains_key(&a));
    assert_eq!(broker.peer_count("solo"), 0);
    assert!(!broker.topics.contains_key("solo"));
    assert_eq!(broker.peer_count("shared"), 1);
}

#[test]
fn test_disconnect_unknown_peer_is_noop() {
    let mut broker = Broker::new();
    broker.disconnect(&"peer-ghost".to_string());
    assert!(broker.peers.is_empty());
}

#[test]
fn test_sweep_pings_and_rearms_live_peers() {
    let mut broker = Broker::new();
    let (id, mut rx) = register_peer(&mut broker);

    let evicted = broker.sweep();

    assert!(evicted.is_empty());
    assert!(!broker.peers.get(&id).unwrap().alive);
    assert!(matches!(rx.try_recv(), Ok(WsMessage::Ping(_))));
}

#[test]
fn test_sweep_evicts_silent_peer_on_second_tick() {
    let mut broker = Broker::new();
    let (quiet, mut rx_quiet) = register_peer(&mut broker);
    let (chatty, mut rx_chatty) = register_peer(&mut broker);
    broker.subscribe(&quiet, &["room-42".to_string()]);

    // First tick arms both peers; only one answers.
    assert!(broker.sweep().is_empty());
    broker.mark_alive(&chatty);

    let evicted = broker.sweep();
    assert_eq!(evicted, vec![quiet.clone()]);
    assert!(!broker.peers.contains_key(&quiet));
    assert!(broker.peers.contains_key(&chatty));

    // The evicted peer's rooms are cleaned up with it.
    assert_eq!(broker.peer_count("room-42"), 0);
    assert!(!broker.topics.contains_key("room-42"));

    // Quiet peer saw the first Ping and then a Close; the survivor saw two Pings.
    assert!(matches!(rx_quiet.try_recv(), Ok(WsMessage::Ping(_))));
    assert!(matches!(rx_quiet.try_recv(), Ok(WsMessage::Close(_))));
    assert!(matches!(rx_chatty.try_recv(), Ok(WsMessage::Ping(_))));
    assert!(matches!(rx_chatty.try_recv(), Ok(WsMessage::Ping(_))));
}

#[test]
fn test_mark_alive_unknown_peer_is_noop() {
    let mut broker = Broker::new();
    broker.mark_alive(&"peer-ghost".to_string());
    assert!(broker.peers.is_empty());
}

#[test]
fn test_peer_count_snapshot() {
    let mut broker = Broker::new();
    let (a, _rx_a) = register_peer(&mut broker);
    let (b, _rx_b) = register_peer(&mut broker);

    assert_eq!(broker.peer_count("room-42"), 0);
    broker.subscribe(&a, &["room-42".to_string()]);
    assert_eq!(broker.peer_count("room-42"), 1);
    broker.subscribe(&b, &["room-42".to_string()]);
    assert_eq!(broker.peer_count("room-42"), 2);
}
