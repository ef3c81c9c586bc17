//! # onebot-core
//!
//! Shared vocabulary for the OneBot v11 client crates:
//!
//! - **Protocol data types**: sender profiles, group members, roles
//! - **Errors**: [`DecodeError`] for best-effort wire decoding
//!
//! Everything here is plain data; the wire machinery lives in
//! `onebot-client` and the payload catalogues in `onebot-message` /
//! `onebot-events`.

#![deny(unsafe_code)]

pub mod errors;
pub mod types;

pub use errors::DecodeError;
pub use types::{AnonymousMember, Friend, Group, Member, Profile, Role, Sex};
