//! Client error types.

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors that can occur while establishing a session.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The endpoint could not be reached or refused the handshake.
    #[error("websocket handshake with {url} failed: {source}")]
    Handshake {
        /// The endpoint that was dialed.
        url: String,
        /// The underlying handshake failure.
        #[source]
        source: tungstenite::Error,
    },

    /// The access token cannot be carried in an HTTP header.
    #[error("access token is not a valid header value")]
    InvalidToken,
}

/// Errors returned for one specific call.
///
/// Connection-level trouble never surfaces here by itself; it shows up
/// as [`CallError::Disconnected`] on calls issued while the socket is
/// down and is otherwise handled by the reconnect supervisor.
#[derive(Debug, Error)]
pub enum CallError {
    /// No socket right now; the request was not sent.
    #[error("not connected")]
    Disconnected,

    /// No matching response arrived within the deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The drop-policy rate limiter refused admission; the request was
    /// never sent.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The server answered with a non-zero retcode.
    #[error("server rejected call with retcode {code}: {message}")]
    Remote {
        /// The wire `retcode`.
        code: i64,
        /// The server's accompanying message, possibly empty.
        message: String,
    },

    /// Call parameters did not serialize.
    #[error("parameters did not serialize: {0}")]
    Params(#[source] serde_json::Error),

    /// The response's `data` did not match the expected shape.
    #[error("unexpected response payload: {0}")]
    Response(#[source] serde_json::Error),
}

/// Errors from reading configuration out of the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is set to something unusable.
    #[error("invalid value `{value}` for {name}")]
    InvalidVar {
        /// The variable's name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_errors_render_for_operators() {
        assert_eq!(CallError::Disconnected.to_string(), "not connected");
        assert_eq!(CallError::RateLimited.to_string(), "rate limit exceeded");
        assert_eq!(
            CallError::Remote {
                code: 100,
                message: "param error".into()
            }
            .to_string(),
            "server rejected call with retcode 100: param error"
        );
    }

    #[test]
    fn config_errors_name_the_variable() {
        assert_eq!(
            ConfigError::MissingVar("ONEBOT_SELF_ID").to_string(),
            "missing environment variable ONEBOT_SELF_ID"
        );
        assert_eq!(
            ConfigError::InvalidVar {
                name: "ONEBOT_PORT",
                value: "yes".into()
            }
            .to_string(),
            "invalid value `yes` for ONEBOT_PORT"
        );
    }
}
