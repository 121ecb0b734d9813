use std::sync::{Arc, Mutex};

use peerhub::broker::Broker;
use peerhub::config::load_config;
use peerhub::query::start_query_server;
use peerhub::transport::websocket::start_websocket_server;
use peerhub::utils::logging;

#[tokio::main]
async fn main() {
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.logging);

    let broker = Arc::new(Mutex::new(Broker::new()));

    let query_addr = format!("{}:{}", config.server.host, config.server.query_port);
    tokio::spawn(start_query_server(query_addr, broker.clone()));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    start_websocket_server(&addr, broker, config.signaling).await;
}
