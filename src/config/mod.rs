mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LoggingSettings, ServerSettings, Settings, SignalingSettings};

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a `Settings` struct containing the server, signaling, and logging
/// configurations
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
            query_port: partial
                .server
                .as_ref()
                .and_then(|s| s.query_port)
                .unwrap_or(default.server.query_port),
        },
        signaling: SignalingSettings {
            path: partial
                .signaling
                .as_ref()
                .and_then(|s| s.path.clone())
                .unwrap_or(default.signaling.path),
            heartbeat_interval_secs: partial
                .signaling
                .as_ref()
                .and_then(|s| s.heartbeat_interval_secs)
                .unwrap_or(default.signaling.heartbeat_interval_secs),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}
