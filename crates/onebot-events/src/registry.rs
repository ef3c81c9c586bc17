//! Two-level decoder table: category, then subtype.

use std::collections::HashMap;
use std::sync::Arc;

use onebot_core::DecodeError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::event::Event;

/// Decodes a whole event frame into an [`Event`].
pub type EventDecoder = Arc<dyn Fn(&Value) -> Result<Event, DecodeError> + Send + Sync>;

/// Immutable lookup table from `(category, subtype)` to decoder.
///
/// Built once, before the session starts. [`EventRegistry::builtin`]
/// covers every standard event; [`EventRegistry::register`] adds entries
/// for non-standard frames a particular server emits.
pub struct EventRegistry {
    categories: HashMap<String, HashMap<String, EventDecoder>>,
}

fn typed<T>(wrap: fn(T) -> Event) -> EventDecoder
where
    T: DeserializeOwned + 'static,
{
    Arc::new(move |frame| Ok(wrap(serde_json::from_value(frame.clone())?)))
}

impl EventRegistry {
    /// The standard table, one decoder per [`Event`] variant.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self {
            categories: HashMap::new(),
        };
        registry.insert("message", "private", typed(Event::PrivateMessage));
        registry.insert("message", "group", typed(Event::GroupMessage));
        registry.insert("request", "friend", typed(Event::FriendRequest));
        registry.insert("request", "group", typed(Event::GroupRequest));
        registry.insert("notice", "group_upload", typed(Event::GroupUpload));
        registry.insert("notice", "group_admin", typed(Event::GroupAdmin));
        registry.insert("notice", "group_decrease", typed(Event::GroupDecrease));
        registry.insert("notice", "group_increase", typed(Event::GroupIncrease));
        registry.insert("notice", "group_ban", typed(Event::GroupBan));
        registry.insert("notice", "friend_add", typed(Event::FriendAdd));
        registry.insert("notice", "group_recall", typed(Event::GroupRecall));
        registry.insert("notice", "friend_recall", typed(Event::FriendRecall));
        registry.insert("notice", "notify", typed(Event::Notify));
        registry.insert("meta_event", "lifecycle", typed(Event::Lifecycle));
        registry.insert("meta_event", "heartbeat", typed(Event::Heartbeat));
        registry
    }

    fn insert(&mut self, category: &str, subtype: &str, decoder: EventDecoder) {
        let _ = self
            .categories
            .entry(category.to_owned())
            .or_default()
            .insert(subtype.to_owned(), decoder);
    }

    /// Map an additional routing pair to a decoder.
    #[must_use]
    pub fn register<F>(
        mut self,
        category: impl Into<String>,
        subtype: impl Into<String>,
        decode: F,
    ) -> Self
    where
        F: Fn(&Value) -> Result<Event, DecodeError> + Send + Sync + 'static,
    {
        self.insert(&category.into(), &subtype.into(), Arc::new(decode));
        self
    }

    /// Map an additional routing pair to [`Event::Other`], keeping the
    /// raw frame.
    #[must_use]
    pub fn register_raw(self, category: impl Into<String>, subtype: impl Into<String>) -> Self {
        let category = category.into();
        let subtype = subtype.into();
        let (cat, sub) = (category.clone(), subtype.clone());
        self.register(category, subtype, move |frame| {
            Ok(Event::Other {
                category: cat.clone(),
                subtype: sub.clone(),
                frame: frame.clone(),
            })
        })
    }

    /// Whether a decoder is registered for the pair.
    #[must_use]
    pub fn contains(&self, category: &str, subtype: &str) -> bool {
        self.decoder(category, subtype).is_some()
    }

    /// Look up the decoder for the pair.
    #[must_use]
    pub fn decoder(&self, category: &str, subtype: &str) -> Option<&EventDecoder> {
        self.categories.get(category)?.get(subtype)
    }

    /// Decode a frame already classified as `(category, subtype)`.
    pub fn decode(
        &self,
        category: &str,
        subtype: &str,
        frame: &Value,
    ) -> Result<Event, DecodeError> {
        let decoder = self
            .decoder(category, subtype)
            .ok_or_else(|| DecodeError::UnknownEvent {
                category: category.to_owned(),
                subtype: subtype.to_owned(),
            })?;
        decoder(frame)
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs: usize = self.categories.values().map(HashMap::len).sum();
        f.debug_struct("EventRegistry")
            .field("pairs", &pairs)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
