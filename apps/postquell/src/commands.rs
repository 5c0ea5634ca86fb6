//! Command dispatch: each subcommand reads or mutates the store and renders
//! its result.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, bail};

use postquell_core::PostStore;
use postquell_shared::PostForm;

use crate::cli::{Cli, Command, CreateArgs, DeleteArgs, EditArgs, ListArgs, ShowArgs};
use crate::config::AppConfig;
use crate::state::AppState;
use crate::views::{self, Mutation};

pub fn run_command(
    cli: Cli,
    config: &AppConfig,
    state: &AppState,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let changes = Arc::new(AtomicUsize::new(0));
    let subscription = {
        let changes = Arc::clone(&changes);
        let store = Arc::downgrade(&state.store);
        state.store.subscribe(move || {
            changes.fetch_add(1, Ordering::SeqCst);
            if let Some(store) = store.upgrade() {
                tracing::debug!(posts = store.len(), "Post collection changed");
            }
        })
    };

    let store = state.store.as_ref();
    let result = match cli.command {
        None | Some(Command::Home) => cmd_home(config, store, out),
        Some(Command::List(args)) => cmd_list(args, config, store, out),
        Some(Command::Show(args)) => cmd_show(args, store, out),
        Some(Command::Create(args)) => cmd_create(args, store, out),
        Some(Command::Edit(args)) => cmd_edit(args, store, out),
        Some(Command::Delete(args)) => cmd_delete(args, store, out),
    };
    subscription.unsubscribe();
    result?;

    if changes.load(Ordering::SeqCst) > 0 {
        views::render_stats(store, out)?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_home(config: &AppConfig, store: &PostStore, out: &mut impl Write) -> anyhow::Result<()> {
    views::render_home(store, config.recent_limit, out).context("failed to render home view")?;
    writeln!(out)?;
    views::render_listing(store, &config.listing, out).context("failed to render listing")?;
    Ok(())
}

fn cmd_list(
    args: ListArgs,
    config: &AppConfig,
    store: &PostStore,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut query = config.listing.clone();
    if let Some(search) = args.search {
        query.search = Some(search);
    }
    if let Some(tag) = args.tag {
        query.tag = Some(tag);
    }
    if let Some(sort) = args.sort {
        query.sort = sort;
    }
    views::render_listing(store, &query, out).context("failed to render listing")?;
    Ok(())
}

fn cmd_show(args: ShowArgs, store: &PostStore, out: &mut impl Write) -> anyhow::Result<()> {
    let post = store
        .get_post(&args.id)
        .with_context(|| format!("post not found: {}", args.id))?;
    views::render_post(&post, out)?;
    Ok(())
}

fn cmd_create(args: CreateArgs, store: &PostStore, out: &mut impl Write) -> anyhow::Result<()> {
    let mut form = PostForm {
        title: args.title,
        content: args.content,
        excerpt: args.excerpt,
        image: args.image,
        author: args.author,
        tags: Vec::new(),
    };
    for tag in &args.tags {
        form.add_tag(tag);
    }

    let post = store.add_post(form.into_new_post()?);
    writeln!(out, "Published \"{}\" ({})", post.title, post.id)?;
    views::render_save_notice(store, Mutation::Created, out)?;
    Ok(())
}

fn cmd_edit(args: EditArgs, store: &PostStore, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(post) = store.get_post(&args.id) else {
        bail!("post not found: {}", args.id);
    };

    let mut form = PostForm::from_post(&post);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(content) = args.content {
        form.content = content;
    }
    if let Some(author) = args.author {
        form.author = author;
    }
    if let Some(excerpt) = args.excerpt {
        form.excerpt = excerpt;
    }
    if args.clear_image {
        form.image = None;
    } else if let Some(image) = args.image {
        form.image = Some(image);
    }
    for tag in &args.remove_tags {
        form.remove_tag(tag);
    }
    for tag in &args.add_tags {
        form.add_tag(tag);
    }

    let updated = store
        .update_post(&post.id, form.into_patch()?)
        .with_context(|| format!("post not found: {}", post.id))?;
    writeln!(out, "Updated \"{}\" ({})", updated.title, updated.id)?;
    views::render_save_notice(store, Mutation::Updated, out)?;
    Ok(())
}

fn cmd_delete(args: DeleteArgs, store: &PostStore, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(post) = store.get_post(&args.id) else {
        bail!("post not found: {}", args.id);
    };

    if !args.yes {
        writeln!(
            out,
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            post.title
        )?;
        writeln!(out, "Run again with --yes to delete it.")?;
        return Ok(());
    }

    if store.delete_post(&post.id) {
        writeln!(out, "Deleted \"{}\"", post.title)?;
        views::render_save_notice(store, Mutation::Deleted, out)?;
    }
    Ok(())
}
