//! Durable slot implementations - in-memory and file-backed.

mod memory;

pub use memory::InMemorySlot;

#[cfg(feature = "file")]
mod file;
#[cfg(feature = "file")]
pub use self::file::{FileSlot, FileSlotConfig};
