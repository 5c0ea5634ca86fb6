//! Domain entities - the core business objects.

mod post;
mod samples;

pub use post::{EXCERPT_LENGTH, NewPost, Post, PostPatch, derive_excerpt};
pub use samples::sample_posts;
