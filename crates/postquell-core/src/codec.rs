//! Persisted payload format: a JSON array of posts.
//!
//! Timestamps travel as RFC 3339 strings and are revived into
//! `DateTime<Utc>` on decode. Payloads written by the web client
//! (`"2024-01-15T00:00:00.000Z"`) decode unchanged.

use crate::domain::Post;
use crate::error::StorageError;

/// Encode the whole collection for a single slot write.
pub fn encode_posts(posts: &[Post]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(posts)?)
}

/// Decode a slot value back into posts.
pub fn decode_posts(payload: &str) -> Result<Vec<Post>, StorageError> {
    Ok(serde_json::from_str(payload)?)
}
