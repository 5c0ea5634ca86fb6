//! Data Transfer Objects - raw form input for creating and editing posts.

use serde::{Deserialize, Serialize};

use postquell_core::DomainError;
use postquell_core::domain::{NewPost, Post, PostPatch, derive_excerpt};

/// Create/edit form contents, as typed by the author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image: Option<String>,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Form fields after trimming and validation.
struct Validated {
    title: String,
    content: String,
    excerpt: String,
    image: Option<String>,
    author: String,
    tags: Vec<String>,
}

impl PostForm {
    /// Prefill the edit form from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            image: post.image.clone(),
            author: post.author.clone(),
            tags: post.tags.clone(),
        }
    }

    /// Add a tag from the tag input. Blank and duplicate tags are ignored.
    /// Returns whether the tag was added.
    pub fn add_tag(&mut self, input: &str) -> bool {
        let tag = input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    fn validate(self) -> Result<Validated, DomainError> {
        let title = required("title", &self.title)?;
        let content = required("content", &self.content)?;
        let author = required("author", &self.author)?;

        let excerpt = match self.excerpt.trim() {
            "" => derive_excerpt(&content),
            excerpt => excerpt.to_string(),
        };
        let image = self.image.filter(|image| !image.trim().is_empty());

        Ok(Validated {
            title,
            content,
            excerpt,
            image,
            author,
            tags: self.tags,
        })
    }

    /// Fields for [`PostStore::add_post`](postquell_core::PostStore::add_post).
    pub fn into_new_post(self) -> Result<NewPost, DomainError> {
        let form = self.validate()?;
        Ok(NewPost {
            title: form.title,
            content: form.content,
            excerpt: form.excerpt,
            image: form.image,
            author: form.author,
            tags: form.tags,
        })
    }

    /// Full replacement patch for [`PostStore::update_post`](postquell_core::PostStore::update_post).
    /// A blank image clears the stored one.
    pub fn into_patch(self) -> Result<PostPatch, DomainError> {
        let form = self.validate()?;
        Ok(PostPatch::default()
            .title(form.title)
            .content(form.content)
            .excerpt(form.excerpt)
            .image(form.image)
            .author(form.author)
            .tags(form.tags))
    }
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use postquell_core::domain::EXCERPT_LENGTH;

    fn form() -> PostForm {
        PostForm {
            title: "  Hello  ".to_string(),
            content: " Body text \n second ".to_string(),
            excerpt: "   ".to_string(),
            image: Some(String::new()),
            author: " Kai ".to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_into_new_post_trims_and_derives_excerpt() {
        let post = form().into_new_post().unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "Body text \n second");
        assert_eq!(post.excerpt, "Body text \n second...");
        assert_eq!(post.image, None);
        assert_eq!(post.author, "Kai");
    }

    #[test]
    fn test_explicit_excerpt_is_kept() {
        let mut f = form();
        f.excerpt = " Teaser ".to_string();
        f.content = "x".repeat(400);
        let post = f.into_new_post().unwrap();
        assert_eq!(post.excerpt, "Teaser");

        let mut f = form();
        f.content = "y".repeat(400);
        let post = f.into_new_post().unwrap();
        assert_eq!(post.excerpt.len(), EXCERPT_LENGTH + 3);
    }

    #[test]
    fn test_blank_required_fields_are_rejected() {
        for field in ["title", "content", "author"] {
            let mut f = form();
            match field {
                "title" => f.title = " ".to_string(),
                "content" => f.content = String::new(),
                _ => f.author = "\t".to_string(),
            }
            assert_eq!(
                f.into_new_post(),
                Err(DomainError::Validation(format!("{field} is required")))
            );
        }
    }

    #[test]
    fn test_tag_editing() {
        let mut f = form();
        assert!(f.add_tag(" rust "));
        assert!(!f.add_tag("rust"));
        assert!(!f.add_tag("   "));
        assert!(f.add_tag("wasm"));
        f.remove_tag("rust");
        assert_eq!(f.tags, vec!["wasm".to_string()]);
    }

    #[test]
    fn test_into_patch_replaces_every_field() {
        let mut f = form();
        f.image = Some("/cover.png".to_string());
        let patch = f.into_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Hello"));
        assert_eq!(patch.image, Some(Some("/cover.png".to_string())));
        assert_eq!(patch.tags, Some(Vec::new()));
    }

    #[test]
    fn test_from_post_round_trips_through_patch() {
        let post = postquell_core::domain::sample_posts().remove(0);
        let patch = PostForm::from_post(&post).into_patch().unwrap();
        assert_eq!(patch.title.as_deref(), Some(post.title.as_str()));
        assert_eq!(patch.excerpt.as_deref(), Some(post.excerpt.as_str()));
        assert_eq!(patch.image, Some(post.image.clone()));
    }
}
