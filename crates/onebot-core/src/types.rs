//! Protocol data types shared across the message and event crates.
//!
//! These mirror the wire shapes exactly; all structs tolerate missing
//! fields (`serde(default)`) because peers routinely omit optional data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A member's permission level within a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Group owner.
    Owner,
    /// Group administrator.
    Admin,
    /// Ordinary member.
    #[default]
    Member,
}

/// Sex as reported by the peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Not disclosed.
    #[default]
    Unknown,
    /// Male.
    Male,
    /// Female.
    Female,
}

/// A friend entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Friend {
    /// Account id.
    pub user_id: i64,
    /// Nickname.
    pub nickname: String,
    /// Local remark set for this friend.
    pub remark: String,
}

impl fmt::Display for Friend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.nickname, self.user_id)
    }
}

/// A group entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    /// Group id.
    pub id: i64,
    /// Group name.
    pub name: String,
    /// The bot's own permission level in this group.
    pub permission: Role,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// A group member, as attached to group message events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    /// Account id.
    pub user_id: i64,
    /// Nickname.
    pub nickname: String,
    /// Group card / display name.
    pub card: String,
    /// Sex.
    pub sex: Sex,
    /// Age.
    pub age: i32,
    /// Region.
    pub area: String,
    /// Member level.
    pub level: String,
    /// Permission level.
    pub role: Role,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.nickname, self.user_id)
    }
}

/// An anonymous sender attached to anonymous group messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymousMember {
    /// Anonymous user id.
    pub id: i64,
    /// Anonymous display name.
    pub name: String,
    /// Flag to pass when muting this anonymous user.
    pub flag: String,
}

impl fmt::Display for AnonymousMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// A user profile, as attached to private message events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Account id.
    pub user_id: i64,
    /// Nickname.
    pub nickname: String,
    /// Sex.
    pub sex: Sex,
    /// Age.
    pub age: i32,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.nickname, self.user_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
