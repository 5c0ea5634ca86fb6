//! # PostQuell Shared
//!
//! Types shared by the surfaces that edit posts.
//! The app's `create` and `edit` commands build posts through [`PostForm`].

pub mod dto;

pub use dto::PostForm;
