// src/rooms/mod.rs
mod asset;
mod room;
mod room_set;

pub use asset::Asset;
pub use room::{Room, RoomId, RoomKind, PLAYER_SPAWN_ASSET};
pub use room_set::RoomSet;
