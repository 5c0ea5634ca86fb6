//! Plain-text renderings of the home, listing and post pages, plus the
//! notices shown after a change.

use std::io::{self, Write};

use postquell_core::domain::Post;
use postquell_core::query::PostQuery;
use postquell_core::{PostStore, SaveOutcome};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dashboard counters, the newest posts and the tag cloud.
pub fn render_home(store: &PostStore, recent_limit: usize, out: &mut impl Write) -> io::Result<()> {
    let stats = store.dashboard();
    writeln!(out, "PostQuell")?;
    writeln!(
        out,
        "  {} posts, {} tags, {} this week",
        stats.total_posts, stats.total_tags, stats.recent_posts
    )?;
    if !store.is_persistent() {
        writeln!(out, "  Storage unavailable: changes last until exit.")?;
    }
    if store.last_save_degraded() {
        writeln!(out, "  Images were removed from posts to fit the storage limit.")?;
    }
    writeln!(out)?;

    let recent = store.recent(recent_limit);
    if recent.is_empty() {
        writeln!(out, "Start writing your first post!")?;
    }
    for post in &recent {
        render_card(post, out)?;
    }

    let tags = store.tags();
    if !tags.is_empty() {
        writeln!(out, "Tags: {}", tags.join(", "))?;
    }
    Ok(())
}

/// Filtered listing with its result summary.
pub fn render_listing(store: &PostStore, query: &PostQuery, out: &mut impl Write) -> io::Result<()> {
    let posts = store.query(query);
    writeln!(out, "{}", listing_summary(posts.len(), query))?;
    for post in &posts {
        render_card(post, out)?;
    }
    Ok(())
}

pub fn render_card(post: &Post, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}  {}", post.created_at.format(DATE_FORMAT), post.title)?;
    write!(out, "    by {}", post.author)?;
    if post.updated_at.date_naive() != post.created_at.date_naive() {
        write!(out, " (updated {})", post.updated_at.format(DATE_FORMAT))?;
    }
    if !post.tags.is_empty() {
        write!(out, " [{}]", post.tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "    {}", post.excerpt)?;
    writeln!(out)
}

/// Full post: meta, tags, image and the content one paragraph per line.
pub fn render_post(post: &Post, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", post.title)?;
    write!(
        out,
        "  by {}  Published {}",
        post.author,
        post.created_at.format(DATE_FORMAT)
    )?;
    if post.updated_at != post.created_at {
        write!(out, "  Updated {}", post.updated_at.format(DATE_FORMAT))?;
    }
    writeln!(out)?;
    if !post.tags.is_empty() {
        writeln!(out, "  Tags: {}", post.tags.join(", "))?;
    }
    match post.image.as_deref() {
        Some(image) if post.has_embedded_image() => {
            writeln!(out, "  Image: embedded, {} bytes", image.len())?
        }
        Some(image) => writeln!(out, "  Image: {image}")?,
        None => {}
    }
    writeln!(out)?;
    for paragraph in post.paragraphs() {
        writeln!(out, "{paragraph}")?;
    }
    Ok(())
}

/// One-line dashboard counters, printed again after the collection changed.
pub fn render_stats(store: &PostStore, out: &mut impl Write) -> io::Result<()> {
    let stats = store.dashboard();
    writeln!(
        out,
        "Now {} posts, {} tags, {} this week",
        stats.total_posts, stats.total_tags, stats.recent_posts
    )
}

/// What the command just did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

/// Warn when the save right after `mutation` dropped images or failed.
pub fn render_save_notice(
    store: &PostStore,
    mutation: Mutation,
    out: &mut impl Write,
) -> io::Result<()> {
    if store.last_save_degraded() {
        let lead = match mutation {
            Mutation::Created => "Your post was published",
            Mutation::Updated => "The post was updated",
            Mutation::Deleted => "The post was deleted",
        };
        writeln!(
            out,
            "{lead} but images could not be saved due to storage limits. \
             The images were removed from the saved posts."
        )?;
    } else if store.last_save_outcome() == SaveOutcome::Failed {
        writeln!(out, "The change could not be saved and lasts until exit.")?;
    }
    Ok(())
}

/// "Showing 2 posts for "rust" tagged with "code"".
pub fn listing_summary(count: usize, query: &PostQuery) -> String {
    let mut summary = match count {
        0 => "No posts found".to_string(),
        1 => "Showing 1 post".to_string(),
        n => format!("Showing {n} posts"),
    };
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        summary.push_str(&format!(" for \"{search}\""));
    }
    if let Some(tag) = &query.tag {
        summary.push_str(&format!(" tagged with \"{tag}\""));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use postquell_core::domain::{NewPost, PostPatch};
    use postquell_core::query::SortOrder;
    use postquell_infra::InMemorySlot;

    fn seeded() -> PostStore {
        PostStore::open(Arc::new(InMemorySlot::new()))
    }

    #[test]
    fn test_listing_summary() {
        let q = PostQuery::new();
        assert_eq!(listing_summary(0, &q), "No posts found");
        assert_eq!(listing_summary(1, &q), "Showing 1 post");
        assert_eq!(
            listing_summary(3, &q.search("rust").tag("code")),
            "Showing 3 posts for \"rust\" tagged with \"code\""
        );
    }

    #[test]
    fn test_render_home_lists_seeded_posts() {
        let mut out = Vec::new();
        render_home(&seeded(), 6, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("2 posts, 6 tags"));
        let welcome = text.find("2024-01-15  Welcome to PostQuell").unwrap();
        let story = text.find("2024-01-10  The Art of Storytelling").unwrap();
        assert!(welcome < story);
        assert!(text.contains("Tags: blogging, content"));
    }

    #[test]
    fn test_render_home_empty_ephemeral() {
        let mut out = Vec::new();
        render_home(&PostStore::ephemeral(), 6, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Storage unavailable"));
        assert!(text.contains("Start writing your first post!"));
    }

    #[test]
    fn test_render_post_splits_paragraphs() {
        let store = seeded();
        let post = store.add_post(NewPost {
            title: "Notes".to_string(),
            content: "First line\n\nThird line".to_string(),
            excerpt: "Short".to_string(),
            image: Some("data:image/png;base64,AAAA".to_string()),
            author: "Kai".to_string(),
            tags: vec!["misc".to_string()],
        });

        let mut out = Vec::new();
        render_post(&post, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Notes\n  by Kai  Published "));
        assert!(!text.contains("Updated"));
        assert!(text.contains("  Tags: misc\n"));
        assert!(text.contains("  Image: embedded, 26 bytes\n"));
        assert!(text.ends_with("\nFirst line\n\nThird line\n"));
    }

    #[test]
    fn test_render_post_shows_url_and_update_date() {
        let store = seeded();
        let post = store
            .update_post("2", PostPatch::default().title("Storytelling"))
            .unwrap();

        let mut out = Vec::new();
        render_post(&post, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Published 2024-01-10  Updated "));
        assert!(text.contains("  Image: /digital-storytelling-creative-writing.jpg\n"));
    }

    #[test]
    fn test_save_notice_only_after_degraded_save() {
        let store = PostStore::open(Arc::new(InMemorySlot::with_quota(3000)));
        let mut out = Vec::new();
        render_save_notice(&store, Mutation::Created, &mut out).unwrap();
        assert!(out.is_empty());

        store.add_post(NewPost {
            title: "Sunset".to_string(),
            content: "Golden hour".to_string(),
            excerpt: "Golden hour".to_string(),
            image: Some(format!("data:image/jpeg;base64,{}", "Q".repeat(5000))),
            author: "Ana".to_string(),
            tags: Vec::new(),
        });
        render_save_notice(&store, Mutation::Created, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Your post was published but images could not be saved"));
    }

    #[test]
    fn test_render_listing_by_title() {
        let mut out = Vec::new();
        let query = PostQuery::new().sort(SortOrder::Title);
        render_listing(&seeded(), &query, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("Showing 2 posts\n"));
        assert!(text.find("The Art").unwrap() < text.find("Welcome").unwrap());
    }
}
