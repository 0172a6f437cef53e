//! Публичный контракт движка: обложки, книги, команды, события и проводной кодек.

pub mod book;
pub mod codec;
pub mod commands;
pub mod events;

/// Домен агрегата стола.
pub const TABLE_DOMAIN: &str = "table";
/// Домен агрегата раздачи.
pub const HAND_DOMAIN: &str = "hand";

pub use book::*;
pub use codec::{decode_command, decode_event, encode_command, encode_event, CodecError, TypedPayload};
pub use commands::*;
pub use events::*;
