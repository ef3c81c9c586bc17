//! Session configuration.

use std::time::Duration;

use crate::errors::ConfigError;

/// Default per-call response deadline.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause before re-dialing a lost connection.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Which endpoint path the session attaches to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WsChannel {
    /// Calls and events over one socket, at `/`.
    #[default]
    Combined,
    /// Calls only, at `/api`.
    Api,
    /// Events only, at `/event`.
    Event,
}

impl WsChannel {
    fn path(self) -> &'static str {
        match self {
            Self::Combined => "",
            Self::Api => "api",
            Self::Event => "event",
        }
    }
}

/// How decoded events are handed to listener chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// One worker runs chains to completion, in arrival order.
    #[default]
    Serialized,
    /// Every event runs as its own task, with no ordering guarantee.
    Concurrent,
}

/// Connection and session parameters.
///
/// Plain data; fill the fields directly or start from
/// [`ConnectConfig::new`] and override with struct-update syntax.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Endpoint path.
    pub channel: WsChannel,
    /// Bearer credential, sent as `Authorization` during the handshake.
    pub access_token: Option<String>,
    /// Account id the session controls.
    pub self_id: i64,
    /// Listener concurrency model, fixed for the session's lifetime.
    pub dispatch: DispatchMode,
    /// How long each call waits for its response.
    pub call_timeout: Duration,
    /// Pause between losing the socket and re-dialing.
    pub reconnect_delay: Duration,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 6700,
            channel: WsChannel::Combined,
            access_token: None,
            self_id: 0,
            dispatch: DispatchMode::Serialized,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

impl ConnectConfig {
    /// A config with defaults for everything but the endpoint and
    /// account.
    pub fn new(host: impl Into<String>, port: u16, self_id: i64) -> Self {
        Self {
            host: host.into(),
            port,
            self_id,
            ..Self::default()
        }
    }

    /// Read configuration from `ONEBOT_*` environment variables.
    ///
    /// `ONEBOT_SELF_ID` is required. `ONEBOT_HOST`, `ONEBOT_PORT`,
    /// `ONEBOT_ACCESS_TOKEN`, `ONEBOT_CHANNEL` (`combined`/`api`/`event`),
    /// `ONEBOT_DISPATCH` (`serialized`/`concurrent`),
    /// `ONEBOT_CALL_TIMEOUT_MS`, and `ONEBOT_RECONNECT_DELAY_MS` fall
    /// back to defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("ONEBOT_HOST") {
            config.host = host;
        }
        if let Some(port) = parsed::<u16>("ONEBOT_PORT")? {
            config.port = port;
        }
        config.self_id =
            parsed::<i64>("ONEBOT_SELF_ID")?.ok_or(ConfigError::MissingVar("ONEBOT_SELF_ID"))?;
        config.access_token = std::env::var("ONEBOT_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());
        if let Ok(raw) = std::env::var("ONEBOT_CHANNEL") {
            config.channel = match raw.as_str() {
                "" | "combined" => WsChannel::Combined,
                "api" => WsChannel::Api,
                "event" => WsChannel::Event,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: "ONEBOT_CHANNEL",
                        value: raw,
                    });
                }
            };
        }
        if let Ok(raw) = std::env::var("ONEBOT_DISPATCH") {
            config.dispatch = match raw.as_str() {
                "serialized" => DispatchMode::Serialized,
                "concurrent" => DispatchMode::Concurrent,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: "ONEBOT_DISPATCH",
                        value: raw,
                    });
                }
            };
        }
        if let Some(ms) = parsed::<u64>("ONEBOT_CALL_TIMEOUT_MS")? {
            config.call_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parsed::<u64>("ONEBOT_RECONNECT_DELAY_MS")? {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// The websocket endpoint this config dials.
    pub(crate) fn url(&self) -> String {
        format!("ws://{}:{}/{}", self.host, self.port, self.channel.path())
    }
}

fn parsed<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value: raw }),
        Err(_) => Ok(None),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_match_protocol_conventions() {
        let config = ConnectConfig::default();
        assert_eq!(config.port, 6700);
        assert_eq!(config.channel, WsChannel::Combined);
        assert_eq!(config.dispatch, DispatchMode::Serialized);
        assert_eq!(config.call_timeout, Duration::from_secs(5));
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
    }

    #[test]
    fn url_includes_the_channel_path() {
        let mut config = ConnectConfig::new("example.test", 9001, 1);
        assert_eq!(config.url(), "ws://example.test:9001/");
        config.channel = WsChannel::Api;
        assert_eq!(config.url(), "ws://example.test:9001/api");
        config.channel = WsChannel::Event;
        assert_eq!(config.url(), "ws://example.test:9001/event");
    }

    #[test]
    fn from_env_requires_the_account_id() {
        // ONEBOT_SELF_ID is never set in the test environment
        assert_matches!(
            ConnectConfig::from_env(),
            Err(ConfigError::MissingVar("ONEBOT_SELF_ID"))
        );
    }
}
