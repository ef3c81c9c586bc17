//! Ordered message chains.

use serde::ser::{Serialize, Serializer};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::registry::default_registry;
use crate::segment::Segment;

/// An ordered sequence of [`Segment`]s, the `message` payload of sends
/// and message events.
///
/// Serializes as a bare JSON array. Deserialization is best-effort:
/// elements that are not objects, carry an unknown `type` tag, or whose
/// `data` fails to decode are skipped with a warning, and `null` decodes
/// as an empty chain. Chains built from caller-extended registries go
/// through [`SegmentRegistry::decode_chain`](crate::SegmentRegistry::decode_chain)
/// instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageChain {
    segments: Vec<Segment>,
}

impl MessageChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment.
    #[must_use]
    pub fn push(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Append a plain-text segment.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(Segment::text(text))
    }

    /// Append a mention of the given account.
    #[must_use]
    pub fn at(self, user_id: i64) -> Self {
        self.push(Segment::at(user_id))
    }

    /// Append a mention of everyone.
    #[must_use]
    pub fn at_all(self) -> Self {
        self.push(Segment::at_all())
    }

    /// Append a built-in face.
    #[must_use]
    pub fn face(self, id: impl Into<String>) -> Self {
        self.push(Segment::face(id))
    }

    /// Append an image.
    #[must_use]
    pub fn image(self, file: impl Into<String>) -> Self {
        self.push(Segment::image(file))
    }

    /// Append a quote-reply.
    #[must_use]
    pub fn reply(self, message_id: impl Into<String>) -> Self {
        self.push(Segment::reply(message_id))
    }

    /// The segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the chain holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate over the segments.
    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Concatenation of all plain-text segments.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if let Segment::Text(text) = segment {
                out.push_str(&text.text);
            }
        }
        out
    }
}

impl Serialize for MessageChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.segments.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MessageChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(default_registry().decode_elements(&elements))
    }
}

impl From<Vec<Segment>> for MessageChain {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<Segment> for MessageChain {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<Segment> for MessageChain {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}

impl IntoIterator for MessageChain {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
