use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of content characters kept when an excerpt is derived.
pub const EXCERPT_LENGTH: usize = 150;

/// Post entity - a single blog entry.
///
/// Serialized with camelCase keys and RFC 3339 timestamps, which is the
/// layout of the persisted slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Post {
    /// Build a post from caller-supplied fields, stamping both timestamps with `now`.
    pub fn create(id: String, fields: NewPost, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            content: fields.content,
            excerpt: fields.excerpt,
            image: fields.image,
            author: fields.author,
            created_at: now,
            updated_at: now,
            tags: fields.tags,
        }
    }

    /// Merge a patch over this post and refresh `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the clock does, so it also
    /// stays at or after `created_at`.
    pub fn apply(&mut self, patch: PostPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = now.max(self.updated_at);
    }

    /// Content split into paragraphs on newlines.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Whether the image is an inline `data:` payload rather than a URL.
    pub fn has_embedded_image(&self) -> bool {
        self.image
            .as_deref()
            .is_some_and(|image| image.starts_with("data:"))
    }
}

/// Fields supplied when creating a post. The store assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub author: String,
    pub tags: Vec<String>,
}

/// Partial update. `None` leaves a field untouched.
///
/// `image` is tri-state: `None` keeps it, `Some(None)` clears it,
/// `Some(Some(url))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub image: Option<Option<String>>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Excerpt used when the author leaves it blank: the first
/// [`EXCERPT_LENGTH`] characters of the content followed by an ellipsis.
pub fn derive_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_LENGTH).collect();
    excerpt.push_str("...");
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(now: DateTime<Utc>) -> Post {
        Post::create(
            "p1".to_string(),
            NewPost {
                title: "Title".to_string(),
                content: "first\nsecond".to_string(),
                excerpt: "short".to_string(),
                image: Some("/hero.jpg".to_string()),
                author: "Ada".to_string(),
                tags: vec!["rust".to_string()],
            },
            now,
        )
    }

    #[test]
    fn test_create_stamps_both_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let post = sample(now);
        assert_eq!(post.created_at, now);
        assert_eq!(post.updated_at, now);
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut post = sample(now);
        post.apply(
            PostPatch::default().title("New").image(None),
            now + Duration::minutes(5),
        );

        assert_eq!(post.title, "New");
        assert_eq!(post.content, "first\nsecond");
        assert_eq!(post.image, None);
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert_eq!(post.updated_at, now + Duration::minutes(5));
        assert_eq!(post.created_at, now);
    }

    #[test]
    fn test_apply_never_moves_updated_before_created() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut post = sample(now);
        post.apply(PostPatch::default(), now - Duration::hours(1));
        assert_eq!(post.updated_at, post.created_at);
    }

    #[test]
    fn test_paragraphs_and_embedded_image() {
        let now = Utc::now();
        let mut post = sample(now);
        assert_eq!(post.paragraphs().collect::<Vec<_>>(), vec!["first", "second"]);
        assert!(!post.has_embedded_image());

        post.image = Some("data:image/jpeg;base64,AAAA".to_string());
        assert!(post.has_embedded_image());
    }

    #[test]
    fn test_derive_excerpt_truncates_on_char_boundary() {
        let content = "é".repeat(200);
        let excerpt = derive_excerpt(&content);
        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + 3);
        assert!(excerpt.ends_with("..."));

        assert_eq!(derive_excerpt("tiny"), "tiny...");
    }
}
