//! # onebot-message
//!
//! The message model for the OneBot v11 client: an ordered chain of
//! tagged segments with wire form `{"type": tag, "data": {…}}`.
//!
//! - [`Segment`] — the tagged-union segment catalogue
//! - [`MessageChain`] — order-preserving segment sequence with builders
//! - [`SegmentRegistry`] — tag → decoder table used for best-effort
//!   decoding (unknown or malformed elements are skipped, not fatal)

#![deny(unsafe_code)]

pub mod chain;
pub mod registry;
pub mod segment;

pub use chain::MessageChain;
pub use registry::{SegmentDecoder, SegmentRegistry};
pub use segment::{
    Anonymous, At, Contact, ContactKind, Dice, Face, Forward, Image, Json, Location, Music, Node,
    Poke, Record, Reply, Rps, Segment, Shake, Share, Text, Video, Xml,
};
