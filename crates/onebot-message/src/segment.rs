//! The segment catalogue.
//!
//! Each variant's `data` struct mirrors the wire field set exactly;
//! optional fields are omitted from the encoded form when absent.

use serde::{Deserialize, Serialize};

use crate::chain::MessageChain;

/// One typed unit within a message chain.
///
/// Serializes adjacently tagged as `{"type": tag, "data": {…}}`, which is
/// the exact wire form. Decoding through serde is all-or-nothing; the
/// best-effort path used for inbound frames lives in
/// [`SegmentRegistry`](crate::SegmentRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text.
    Text(Text),
    /// Built-in face by id.
    Face(Face),
    /// Image attachment.
    Image(Image),
    /// Voice recording.
    Record(Record),
    /// Short video.
    Video(Video),
    /// Mention of a member (or everyone).
    At(At),
    /// Rock-paper-scissors magic face.
    Rps(Rps),
    /// Dice-roll magic face.
    Dice(Dice),
    /// Window shake.
    Shake(Shake),
    /// Poke.
    Poke(Poke),
    /// Anonymous-send marker.
    Anonymous(Anonymous),
    /// Link share card.
    Share(Share),
    /// Friend or group recommendation card.
    Contact(Contact),
    /// Geographic location.
    Location(Location),
    /// Music share card.
    Music(Music),
    /// Quote-reply to an earlier message.
    Reply(Reply),
    /// Reference to a forwarded-message bundle.
    Forward(Forward),
    /// One node of a forwarded-message bundle.
    Node(Node),
    /// Raw XML payload.
    Xml(Xml),
    /// Raw JSON payload.
    Json(Json),
}

impl Segment {
    /// The wire type tag for this segment.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Face(_) => "face",
            Self::Image(_) => "image",
            Self::Record(_) => "record",
            Self::Video(_) => "video",
            Self::At(_) => "at",
            Self::Rps(_) => "rps",
            Self::Dice(_) => "dice",
            Self::Shake(_) => "shake",
            Self::Poke(_) => "poke",
            Self::Anonymous(_) => "anonymous",
            Self::Share(_) => "share",
            Self::Contact(_) => "contact",
            Self::Location(_) => "location",
            Self::Music(_) => "music",
            Self::Reply(_) => "reply",
            Self::Forward(_) => "forward",
            Self::Node(_) => "node",
            Self::Xml(_) => "xml",
            Self::Json(_) => "json",
        }
    }

    /// Plain-text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(Text { text: text.into() })
    }

    /// Mention a member by account id.
    #[must_use]
    pub fn at(user_id: i64) -> Self {
        Self::At(At {
            qq: user_id.to_string(),
        })
    }

    /// Mention everyone in the group.
    #[must_use]
    pub fn at_all() -> Self {
        Self::At(At { qq: "all".into() })
    }

    /// Built-in face by id.
    pub fn face(id: impl Into<String>) -> Self {
        Self::Face(Face { id: id.into() })
    }

    /// Image from a file name, `file://` path, `http(s)://` URL, or
    /// `base64://` payload.
    pub fn image(file: impl Into<String>) -> Self {
        Self::Image(Image {
            file: file.into(),
            ..Image::default()
        })
    }

    /// Quote-reply to the message with the given id.
    pub fn reply(message_id: impl Into<String>) -> Self {
        Self::Reply(Reply {
            id: message_id.into(),
        })
    }
}

/// Plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    /// The text content.
    pub text: String,
}

/// Built-in face.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    /// Face id.
    pub id: String,
}

/// Image attachment.
///
/// `file` accepts a received file name, an absolute `file://` URI, an
/// `http(s)://` URL, or a `base64://` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image source.
    pub file: String,
    /// `"flash"` for a flash image; absent for an ordinary one.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Download URL; present only on received images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `"1"`/`"0"`: reuse a cached copy when sending by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    /// `"1"`/`"0"`: download through the configured proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Download timeout in seconds when sending by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Voice recording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Audio source; same forms as [`Image::file`].
    pub file: String,
    /// Apply the voice-changer effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<bool>,
    /// Download URL; present only on received recordings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `"1"`/`"0"`: reuse a cached copy when sending by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    /// `"1"`/`"0"`: download through the configured proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Download timeout in seconds when sending by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Short video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Video source; same forms as [`Image::file`].
    pub file: String,
    /// Download URL; present only on received videos.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// `"1"`/`"0"`: reuse a cached copy when sending by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    /// `"1"`/`"0"`: download through the configured proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Download timeout in seconds when sending by URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Mention of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct At {
    /// Account id as a string, or `"all"` for everyone.
    pub qq: String,
}

/// Rock-paper-scissors magic face. Carries no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rps {}

/// Dice-roll magic face. Carries no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice {}

/// Window shake. Carries no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shake {}

/// Poke.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poke {
    /// Poke type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Poke id.
    pub id: String,
    /// Display name; filled on receive, not needed when sending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Anonymous-send marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anonymous {
    /// `"1"`/`"0"`: continue sending when anonymity is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,
}

/// Link share card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// Target URL.
    pub url: String,
    /// Card title.
    pub title: String,
    /// Card description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Card image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Which kind of contact a [`Contact`] card recommends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// A friend recommendation.
    #[default]
    Qq,
    /// A group recommendation.
    Group,
}

/// Friend or group recommendation card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Card kind.
    #[serde(rename = "type")]
    pub kind: ContactKind,
    /// Recommended account or group id.
    pub id: String,
}

/// Geographic location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub lon: String,
    /// Card title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Card description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Music share card.
///
/// `kind` selects a platform (`"qq"`, `"163"`, `"xm"`) with `id`, or
/// `"custom"` with the url/audio/title fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Music {
    /// Platform or `"custom"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Track id for platform shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Click-through URL for custom shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Audio URL for custom shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    /// Card title for custom shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Card description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Card image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Music {
    /// Platform share by track id.
    pub fn platform(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Custom share.
    pub fn custom(
        url: impl Into<String>,
        audio: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind: "custom".into(),
            url: Some(url.into()),
            audio: Some(audio.into()),
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Quote-reply to an earlier message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Quoted message id.
    pub id: String,
}

/// Reference to a forwarded-message bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forward {
    /// Bundle id; resolve its content through the forward-message API.
    pub id: String,
}

/// One node of a forwarded-message bundle.
///
/// Either references an existing message by `id`, or carries a custom
/// sender and content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Forwarded message id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Custom sender account id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Custom sender nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Custom node content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageChain>,
}

/// Raw XML payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xml {
    /// XML text.
    pub data: String,
}

/// Raw JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Json {
    /// JSON text.
    pub data: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
