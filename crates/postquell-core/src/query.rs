//! Listing and dashboard queries over a snapshot of posts.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Post;
use crate::error::DomainError;

/// Window counted as "recent" on the dashboard.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Title,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Title => "title",
        }
    }

    /// Stable in-place sort.
    pub fn sort(&self, posts: &mut [Post]) {
        match self {
            Self::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Oldest => posts.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            Self::Title => posts.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then_with(|| a.title.cmp(&b.title))
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "title" => Ok(Self::Title),
            other => Err(DomainError::Validation(format!(
                "unknown sort order '{other}', expected newest, oldest or title"
            ))),
        }
    }
}

/// Search, tag filter and ordering for the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Case-insensitive substring match on title, content or author.
    /// Only an empty search matches everything; whitespace is searched for.
    pub fn matches_search(&self, post: &Post) -> bool {
        let Some(needle) = self.search.as_deref().filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();

        [&post.title, &post.content, &post.author]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches_tag(&self, post: &Post) -> bool {
        match &self.tag {
            Some(tag) => post.tags.iter().any(|t| t == tag),
            None => true,
        }
    }

    /// Filter by search AND tag, then sort.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let mut matched: Vec<Post> = posts
            .iter()
            .filter(|post| self.matches_search(post) && self.matches_tag(post))
            .cloned()
            .collect();
        self.sort.sort(&mut matched);
        matched
    }
}

/// Unique tags across all posts, sorted.
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The `limit` newest posts.
pub fn recent(posts: &[Post], limit: usize) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    SortOrder::Newest.sort(&mut sorted);
    sorted.truncate(limit);
    sorted
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub total_tags: usize,
    /// Posts created within [`RECENT_WINDOW_DAYS`] of `now`.
    pub recent_posts: usize,
}

impl DashboardStats {
    pub fn compute(posts: &[Post], now: DateTime<Utc>) -> Self {
        let window = Duration::days(RECENT_WINDOW_DAYS);
        let recent_posts = posts
            .iter()
            .filter(|post| now - post.created_at <= window)
            .count();

        Self {
            total_posts: posts.len(),
            total_tags: all_tags(posts).len(),
            recent_posts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(id: &str, title: &str, author: &str, day: u32, tags: &[&str]) -> Post {
        let at = Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
        Post {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("Body of {title}"),
            excerpt: String::new(),
            image: None,
            author: author.to_string(),
            created_at: at,
            updated_at: at,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn fixture() -> Vec<Post> {
        vec![
            post("a", "banana bread", "Kim", 3, &["food", "baking"]),
            post("b", "Apple pie", "Lee", 10, &["food"]),
            post("c", "Rust tips", "Kim", 7, &["code", "code"]),
        ]
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let posts = fixture();
        assert_eq!(ids(&PostQuery::new().apply(&posts)), vec!["b", "c", "a"]);
        assert_eq!(
            ids(&PostQuery::new().sort(SortOrder::Oldest).apply(&posts)),
            vec!["a", "c", "b"]
        );
        assert_eq!(
            ids(&PostQuery::new().sort(SortOrder::Title).apply(&posts)),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let posts = fixture();
        assert_eq!(ids(&PostQuery::new().search("KIM").apply(&posts)), vec!["c", "a"]);
        assert_eq!(ids(&PostQuery::new().search("body of apple").apply(&posts)), vec!["b"]);
        assert_eq!(PostQuery::new().search("").apply(&posts).len(), 3);
        assert!(PostQuery::new().search("   ").apply(&posts).is_empty());
        assert!(PostQuery::new().search("nothing").apply(&posts).is_empty());
    }

    #[test]
    fn test_tag_filter_combines_with_search() {
        let posts = fixture();
        assert_eq!(ids(&PostQuery::new().tag("food").apply(&posts)), vec!["b", "a"]);
        assert_eq!(
            ids(&PostQuery::new().tag("food").search("kim").apply(&posts)),
            vec!["a"]
        );
    }

    #[test]
    fn test_all_tags_deduplicates_and_sorts() {
        assert_eq!(all_tags(&fixture()), vec!["baking", "code", "food"]);
    }

    #[test]
    fn test_recent_limits_newest_first() {
        assert_eq!(ids(&recent(&fixture(), 2)), vec!["b", "c"]);
    }

    #[test]
    fn test_dashboard_stats() {
        let now = Utc.with_ymd_and_hms(2024, 5, 12, 9, 0, 0).unwrap();
        let stats = DashboardStats::compute(&fixture(), now);
        assert_eq!(
            stats,
            DashboardStats {
                total_posts: 3,
                total_tags: 3,
                recent_posts: 2,
            }
        );
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("Title".parse::<SortOrder>().unwrap(), SortOrder::Title);
        assert_eq!(SortOrder::Oldest.as_str(), "oldest");
        assert!(matches!(
            "random".parse::<SortOrder>(),
            Err(DomainError::Validation(_))
        ));
    }
}
