//! Tag-to-decoder table for message segments.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use onebot_core::DecodeError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::chain::MessageChain;
use crate::segment::Segment;

/// Decodes the `data` object of a tagged wire element into a [`Segment`].
pub type SegmentDecoder = Arc<dyn Fn(&Value) -> Result<Segment, DecodeError> + Send + Sync>;

static BUILTIN_REGISTRY: LazyLock<SegmentRegistry> = LazyLock::new(SegmentRegistry::builtin);

/// The table backing the typed deserialize path.
pub(crate) fn default_registry() -> &'static SegmentRegistry {
    &BUILTIN_REGISTRY
}

static EMPTY_DATA: LazyLock<Value> = LazyLock::new(|| Value::Object(serde_json::Map::new()));

/// Immutable lookup table from segment type tag to decoder.
///
/// Built once, before the session starts. [`SegmentRegistry::builtin`]
/// covers the standard catalogue; additional tags can be mapped onto
/// existing variants with [`SegmentRegistry::register`].
pub struct SegmentRegistry {
    decoders: HashMap<String, SegmentDecoder>,
}

fn typed<T>(wrap: fn(T) -> Segment) -> SegmentDecoder
where
    T: DeserializeOwned + 'static,
{
    Arc::new(move |data| Ok(wrap(serde_json::from_value(data.clone())?)))
}

impl SegmentRegistry {
    /// The standard catalogue, one decoder per [`Segment`] variant.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self {
            decoders: HashMap::new(),
        };
        registry.insert("text", typed(Segment::Text));
        registry.insert("face", typed(Segment::Face));
        registry.insert("image", typed(Segment::Image));
        registry.insert("record", typed(Segment::Record));
        registry.insert("video", typed(Segment::Video));
        registry.insert("at", typed(Segment::At));
        registry.insert("rps", typed(Segment::Rps));
        registry.insert("dice", typed(Segment::Dice));
        registry.insert("shake", typed(Segment::Shake));
        registry.insert("poke", typed(Segment::Poke));
        registry.insert("anonymous", typed(Segment::Anonymous));
        registry.insert("share", typed(Segment::Share));
        registry.insert("contact", typed(Segment::Contact));
        registry.insert("location", typed(Segment::Location));
        registry.insert("music", typed(Segment::Music));
        registry.insert("reply", typed(Segment::Reply));
        registry.insert("forward", typed(Segment::Forward));
        registry.insert("node", typed(Segment::Node));
        registry.insert("xml", typed(Segment::Xml));
        registry.insert("json", typed(Segment::Json));
        registry
    }

    fn insert(&mut self, tag: &str, decoder: SegmentDecoder) {
        let _ = self.decoders.insert(tag.to_owned(), decoder);
    }

    /// Map an additional wire tag to a decoder.
    ///
    /// Useful for vendor tags that should land on an existing variant.
    #[must_use]
    pub fn register<F>(mut self, tag: impl Into<String>, decode: F) -> Self
    where
        F: Fn(&Value) -> Result<Segment, DecodeError> + Send + Sync + 'static,
    {
        let _ = self.decoders.insert(tag.into(), Arc::new(decode));
        self
    }

    /// Whether a decoder is registered for `tag`.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Decode a single wire element, strictly.
    ///
    /// The element must be an object with a registered string `type` tag;
    /// a missing `data` field decodes like an empty object.
    pub fn decode_element(&self, element: &Value) -> Result<Segment, DecodeError> {
        let object = element
            .as_object()
            .ok_or_else(|| DecodeError::Shape(format!("segment is not an object: {element}")))?;
        let tag = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::Shape("segment has no string `type` tag".into()))?;
        let decoder = self
            .decoders
            .get(tag)
            .ok_or_else(|| DecodeError::UnknownSegment(tag.to_owned()))?;
        decoder(object.get("data").unwrap_or(&EMPTY_DATA))
    }

    /// Decode a sequence of wire elements, best-effort.
    ///
    /// Undecodable elements are logged and skipped; the rest of the
    /// chain still comes through.
    #[must_use]
    pub fn decode_elements(&self, elements: &[Value]) -> MessageChain {
        let mut segments = Vec::with_capacity(elements.len());
        for element in elements {
            match self.decode_element(element) {
                Ok(segment) => segments.push(segment),
                Err(error) => warn!(%error, "skipped undecodable message segment"),
            }
        }
        MessageChain::from(segments)
    }

    /// Decode a whole `message` value.
    ///
    /// `null` decodes as an empty chain; anything other than an array or
    /// `null` is a shape error.
    pub fn decode_chain(&self, value: &Value) -> Result<MessageChain, DecodeError> {
        match value {
            Value::Null => Ok(MessageChain::new()),
            Value::Array(elements) => Ok(self.decode_elements(elements)),
            other => Err(DecodeError::Shape(format!(
                "message chain is not an array: {other}"
            ))),
        }
    }
}

impl std::fmt::Debug for SegmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentRegistry")
            .field("tags", &self.decoders.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::segment::Rps;

    #[test]
    fn builtin_covers_every_tag() {
        let registry = SegmentRegistry::builtin();
        for tag in [
            "text", "face", "image", "record", "video", "at", "rps", "dice", "shake", "poke",
            "anonymous", "share", "contact", "location", "music", "reply", "forward", "node",
            "xml", "json",
        ] {
            assert!(registry.contains(tag), "missing decoder for `{tag}`");
        }
    }

    #[test]
    fn strict_decode_rejects_unknown_tag() {
        let registry = SegmentRegistry::builtin();
        let element = json!({"type": "sticker3d", "data": {}});
        assert_matches!(
            registry.decode_element(&element),
            Err(DecodeError::UnknownSegment(tag)) if tag == "sticker3d"
        );
    }

    #[test]
    fn strict_decode_rejects_non_object() {
        let registry = SegmentRegistry::builtin();
        assert_matches!(
            registry.decode_element(&json!("text")),
            Err(DecodeError::Shape(_))
        );
        assert_matches!(
            registry.decode_element(&json!({"data": {"text": "x"}})),
            Err(DecodeError::Shape(_))
        );
    }

    #[test]
    fn missing_data_decodes_like_empty_object() {
        let registry = SegmentRegistry::builtin();
        let segment = registry.decode_element(&json!({"type": "rps"})).unwrap();
        assert_eq!(segment, Segment::Rps(Rps {}));
    }

    #[test]
    fn registered_alias_lands_on_existing_variant() {
        let registry = SegmentRegistry::builtin().register("big_face", |data| {
            let id = data
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| DecodeError::Shape("big_face has no id".into()))?;
            Ok(Segment::face(id))
        });
        let segment = registry
            .decode_element(&json!({"type": "big_face", "data": {"id": "170"}}))
            .unwrap();
        assert_eq!(segment, Segment::face("170"));
    }

    #[test]
    fn chain_decode_handles_null_and_rejects_scalars() {
        let registry = SegmentRegistry::builtin();
        assert!(registry.decode_chain(&Value::Null).unwrap().is_empty());
        assert_matches!(
            registry.decode_chain(&json!("oops")),
            Err(DecodeError::Shape(_))
        );
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        fn arb_segment() -> impl Strategy<Value = Segment> {
            prop_oneof![
                ".*".prop_map(Segment::text),
                any::<i64>().prop_map(Segment::at),
                "[0-9]{1,4}".prop_map(Segment::face),
                "[a-z0-9]{1,12}\\.png".prop_map(Segment::image),
                "-?[0-9]{1,10}".prop_map(Segment::reply),
                Just(Segment::Dice(crate::segment::Dice {})),
            ]
        }

        proptest! {
            #[test]
            fn encode_then_decode_is_lossless(segments in prop::collection::vec(arb_segment(), 0..8)) {
                let chain = MessageChain::from(segments);
                let wire = serde_json::to_value(&chain).unwrap();
                let back = SegmentRegistry::builtin().decode_chain(&wire).unwrap();
                prop_assert_eq!(back, chain);
            }
        }
    }
}
