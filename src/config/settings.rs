use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Covers the listeners, the signaling protocol parameters, and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub signaling: SignalingSettings,
    pub logging: LoggingSettings,
}

/// Listener settings: bind host, the signaling WebSocket port, and the port
/// for the plain-HTTP room query endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub query_port: u16,
}

/// Signaling protocol parameters: the upgrade path served by the WebSocket
/// listener and the transport heartbeat interval.
#[derive(Debug, Deserialize, Clone)]
pub struct SignalingSettings {
    pub path: String,
    pub heartbeat_interval_secs: u64,
}

/// Logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub signaling: Option<PartialSignalingSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

/// Partial server settings.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub query_port: Option<u16>,
}

/// Partial signaling settings.
#[derive(Debug, Deserialize)]
pub struct PartialSignalingSettings {
    pub path: Option<String>,
    pub heartbeat_interval_secs: Option<u64>,
}

/// Partial logging settings.
#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 4444,
                query_port: 4445,
            },
            signaling: SignalingSettings {
                path: "/signaling".to_string(),
                heartbeat_interval_secs: 30,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
