//! Built-in example posts seeded into an empty slot.

use chrono::{DateTime, TimeZone, Utc};

use super::Post;

fn midnight_utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The two posts a fresh store starts with, ids `"1"` and `"2"`.
pub fn sample_posts() -> Vec<Post> {
    let welcome = midnight_utc(2024, 1, 15);
    let storytelling = midnight_utc(2024, 1, 10);

    vec![
        Post {
            id: "1".to_string(),
            title: "Welcome to PostQuell".to_string(),
            content: "PostQuell is a modern blogging platform designed for content creators who want to share their stories with the world. With our intuitive interface and powerful features, you can focus on what matters most - creating amazing content.".to_string(),
            excerpt: "Discover the future of blogging with PostQuell - where creativity meets simplicity.".to_string(),
            image: Some("/modern-blogging-platform-hero-image.jpg".to_string()),
            author: "PostQuell Team".to_string(),
            created_at: welcome,
            updated_at: welcome,
            tags: vec![
                "welcome".to_string(),
                "blogging".to_string(),
                "platform".to_string(),
            ],
        },
        Post {
            id: "2".to_string(),
            title: "The Art of Storytelling in Digital Age".to_string(),
            content: "In today's digital landscape, storytelling has evolved beyond traditional boundaries. We explore how modern content creators are reshaping narratives and connecting with audiences in meaningful ways.".to_string(),
            excerpt: "Exploring how digital platforms are transforming the way we tell and consume stories.".to_string(),
            image: Some("/digital-storytelling-creative-writing.jpg".to_string()),
            author: "Sarah Johnson".to_string(),
            created_at: storytelling,
            updated_at: storytelling,
            tags: vec![
                "storytelling".to_string(),
                "digital".to_string(),
                "content".to_string(),
            ],
        },
    ]
}
