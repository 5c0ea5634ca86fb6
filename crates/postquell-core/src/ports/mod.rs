//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod slot;

pub use clock::{Clock, SystemClock};
pub use slot::KeyValueSlot;
