//! # PostQuell Core
//!
//! The domain layer of PostQuell: posts, the post store with its
//! persistence and degradation policy, and listing queries.
//! Storage backends live in `postquell-infra` behind the [`ports::KeyValueSlot`] port.

pub mod codec;
pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod store;

pub use domain::{NewPost, Post, PostPatch};
pub use error::{DomainError, StorageError};
pub use store::{DEFAULT_STORAGE_KEY, PostStore, SaveOutcome, Subscription};
