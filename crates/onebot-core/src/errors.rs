//! Decode error type shared by the codec and event crates.
//!
//! Wire decoding is best-effort: callers log a [`DecodeError`] and skip the
//! offending frame or element rather than failing the whole stream.

use thiserror::Error;

/// Errors raised while decoding inbound wire data.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not the JSON shape the decoder expected
    /// (e.g. a segment list that is not an array of objects).
    #[error("unexpected shape: {0}")]
    Shape(String),

    /// No decoder is registered for this segment type tag.
    #[error("unknown segment type `{0}`")]
    UnknownSegment(String),

    /// No decoder is registered for this (category, subtype) pair.
    #[error("no decoder for event `{category}/{subtype}`")]
    UnknownEvent {
        /// Primary classification (`post_type`).
        category: String,
        /// Secondary classification (`<post_type>_type`).
        subtype: String,
    },

    /// Deserialization into the concrete record failed.
    #[error("json decode failed: {0}")]
    Json(#[from] serde_json::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn display_includes_tag() {
        let err = DecodeError::UnknownSegment("hologram".into());
        assert_eq!(err.to_string(), "unknown segment type `hologram`");
    }

    #[test]
    fn display_includes_event_pair() {
        let err = DecodeError::UnknownEvent {
            category: "notice".into(),
            subtype: "group_theme".into(),
        };
        assert_eq!(err.to_string(), "no decoder for event `notice/group_theme`");
    }

    #[test]
    fn json_errors_convert() {
        let bad: Result<i64, _> = serde_json::from_str("\"nope\"");
        let err: DecodeError = bad.unwrap_err().into();
        assert_matches!(err, DecodeError::Json(_));
    }
}
