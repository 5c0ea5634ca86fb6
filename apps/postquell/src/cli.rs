use clap::{Args, Parser, Subcommand};

use postquell_core::query::SortOrder;

#[derive(Parser, Debug)]
#[command(
    name = "postquell",
    about = "PostQuell - write, browse and manage blog posts",
    version
)]
pub struct Cli {
    /// Defaults to `home` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the dashboard, recent posts and the full listing
    Home,
    /// List posts, filtered and sorted
    List(ListArgs),
    /// Show a single post in full
    Show(ShowArgs),
    /// Publish a new post
    Create(CreateArgs),
    /// Edit an existing post
    Edit(EditArgs),
    /// Delete a post
    Delete(DeleteArgs),
}

/// Flags given here override the `POSTQUELL_SEARCH`, `POSTQUELL_TAG` and
/// `POSTQUELL_SORT` defaults.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on title, content or author
    #[arg(long)]
    pub search: Option<String>,

    /// Only posts carrying this exact tag
    #[arg(long)]
    pub tag: Option<String>,

    /// newest, oldest or title
    #[arg(long)]
    pub sort: Option<SortOrder>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    /// Post body; newlines separate paragraphs
    #[arg(long)]
    pub content: String,

    #[arg(long)]
    pub author: String,

    /// Card summary, derived from the content when left out
    #[arg(long, default_value = "")]
    pub excerpt: String,

    /// Featured image URL or `data:` URL
    #[arg(long)]
    pub image: Option<String>,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

/// Fields left out keep their current value.
#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub excerpt: Option<String>,

    #[arg(long, conflicts_with = "clear_image")]
    pub image: Option<String>,

    /// Remove the featured image
    #[arg(long)]
    pub clear_image: bool,

    /// Tag to add (repeatable)
    #[arg(long = "tag")]
    pub add_tags: Vec<String>,

    /// Tag to remove (repeatable)
    #[arg(long = "untag")]
    pub remove_tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,

    /// Skip the confirmation and delete right away
    #[arg(long)]
    pub yes: bool,
}
