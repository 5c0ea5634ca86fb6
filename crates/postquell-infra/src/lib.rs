//! # PostQuell Infrastructure
//!
//! Concrete implementations of the ports defined in `postquell-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All backends enabled
//! - `minimal` - In-memory slot only
//! - `file` - File-backed durable slot

pub mod slot;

pub use slot::InMemorySlot;

#[cfg(feature = "file")]
pub use slot::{FileSlot, FileSlotConfig};
