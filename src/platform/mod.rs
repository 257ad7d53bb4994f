//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock for timestamps, never for simulation)
//! - Input events (keyboard and touch mapped onto [`crate::sim::TickInput`])
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputState, KeyAction, use_touch_controls};
pub use storage::{KvStore, MemoryStore, StorageError};
pub use time::now_ms;

#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
