//! RoomRegistry 実装
//!
//! 現在はインメモリ実装のみ。

mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
