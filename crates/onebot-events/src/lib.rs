//! Typed records for every inbound push event, plus the registry that
//! turns a raw event frame into one.
//!
//! Frames are classified by their `post_type` field (the category) and
//! the matching `<category>_type` field (the subtype); the pair selects
//! a decoder in [`EventRegistry`].

#![deny(unsafe_code)]

pub mod event;
pub mod message;
pub mod meta;
pub mod notice;
pub mod registry;
pub mod request;

pub use event::{Event, classify};
pub use message::{GroupMessage, PrivateMessage};
pub use meta::{BotStatus, Heartbeat, Lifecycle};
pub use notice::{
    File, FriendAddNotice, FriendRecallNotice, GroupAdminNotice, GroupBanNotice,
    GroupDecreaseNotice, GroupIncreaseNotice, GroupRecallNotice, GroupUploadNotice, NotifyNotice,
};
pub use registry::{EventDecoder, EventRegistry};
pub use request::{FriendRequest, GroupRequest};
