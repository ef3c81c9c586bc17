//! Outbound call envelopes.

use serde::Serialize;
use serde_json::Value;

/// One remote call as it goes over the wire.
///
/// `params` is left out entirely for parameterless actions.
#[derive(Debug, Serialize)]
pub(crate) struct CallFrame<'a> {
    pub action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<&'a Value>,
    pub echo: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
