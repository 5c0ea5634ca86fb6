//! The post store - single source of truth for all posts.
//!
//! [`PostStore`] keeps the collection in memory, mirrors it into a durable
//! [`KeyValueSlot`] after every mutation, and notifies subscribers
//! synchronously once the mutation is done.
//!
//! Persistence never fails a mutation. When the slot rejects a write for
//! capacity, the store retries once with every image dropped and, if that
//! fits, drops the images in memory as well. The outcome of the latest
//! attempt is available through [`PostStore::last_save_outcome`].

mod subscribers;


use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::codec::{decode_posts, encode_posts};
use crate::domain::{NewPost, Post, PostPatch, sample_posts};
use crate::error::StorageError;
use crate::ports::{Clock, KeyValueSlot, SystemClock};
use crate::query::{self, DashboardStats, PostQuery, SortOrder};

pub use subscribers::{Callback, SubscriberId, Subscription};

use subscribers::SubscriberRegistry;

/// Slot key the collection is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "postquell-blogs";

/// Result of the most recent persistence attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No durable slot is attached, or nothing has been saved yet.
    #[default]
    Skipped,
    /// The full collection was written.
    Saved,
    /// The write only fit after every image was dropped.
    Degraded { images_dropped: usize },
    /// Nothing was written this round.
    Failed,
}

struct StoreState {
    posts: Vec<Post>,
    slot: Option<Arc<dyn KeyValueSlot>>,
    last_save: SaveOutcome,
}

/// Builder for [`PostStore`].
pub struct PostStoreBuilder {
    slot: Option<Arc<dyn KeyValueSlot>>,
    key: String,
    clock: Arc<dyn Clock>,
}

impl Default for PostStoreBuilder {
    fn default() -> Self {
        Self {
            slot: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl PostStoreBuilder {
    /// Durable slot to load from and save to. Without one the store is
    /// memory-only and starts empty.
    pub fn slot(mut self, slot: Arc<dyn KeyValueSlot>) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load the persisted collection, or seed and save the sample posts when
    /// the slot is empty.
    pub fn build(self) -> PostStore {
        let mut state = StoreState {
            posts: Vec::new(),
            slot: self.slot,
            last_save: SaveOutcome::Skipped,
        };
        load(&mut state, &self.key);

        PostStore {
            state: Mutex::new(state),
            key: self.key,
            clock: self.clock,
            subscribers: SubscriberRegistry::default(),
        }
    }
}

/// In-memory post collection synchronized with a durable slot.
///
/// All operations are synchronous. Subscribers run after the internal lock is
/// released and may read the store, but must not mutate it from inside the
/// callback.
pub struct PostStore {
    state: Mutex<StoreState>,
    key: String,
    clock: Arc<dyn Clock>,
    subscribers: SubscriberRegistry,
}

impl PostStore {
    pub fn builder() -> PostStoreBuilder {
        PostStoreBuilder::default()
    }

    /// Store backed by `slot` under the default key.
    pub fn open(slot: Arc<dyn KeyValueSlot>) -> Self {
        Self::builder().slot(slot).build()
    }

    /// Memory-only store for runtimes without durable storage.
    pub fn ephemeral() -> Self {
        Self::builder().build()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All posts, newest first.
    pub fn get_all_posts(&self) -> Vec<Post> {
        let mut posts = self.state().posts.clone();
        SortOrder::Newest.sort(&mut posts);
        posts
    }

    pub fn get_post(&self, id: &str) -> Option<Post> {
        self.state().posts.iter().find(|post| post.id == id).cloned()
    }

    pub fn add_post(&self, fields: NewPost) -> Post {
        let post = {
            let mut state = self.state();
            let id = fresh_id(&state.posts);
            let index = state.posts.len();
            state.posts.push(Post::create(id, fields, self.clock.now()));
            persist(&mut state, &self.key);
            // Re-read: a degraded save may have dropped the new post's image.
            state.posts[index].clone()
        };
        self.subscribers.notify();

        tracing::debug!(post_id = %post.id, "Post added");
        post
    }

    /// Merge `patch` over the post with `id`. Unknown ids are a no-op.
    pub fn update_post(&self, id: &str, patch: PostPatch) -> Option<Post> {
        let updated = {
            let mut state = self.state();
            let index = state.posts.iter().position(|post| post.id == id)?;
            let now = self.clock.now();
            state.posts[index].apply(patch, now);
            persist(&mut state, &self.key);
            state.posts[index].clone()
        };
        self.subscribers.notify();

        tracing::debug!(post_id = %id, "Post updated");
        Some(updated)
    }

    /// Remove the post with `id`, returning whether one was removed.
    pub fn delete_post(&self, id: &str) -> bool {
        {
            let mut state = self.state();
            let Some(index) = state.posts.iter().position(|post| post.id == id) else {
                return false;
            };
            state.posts.remove(index);
            persist(&mut state, &self.key);
        }
        self.subscribers.notify();

        tracing::debug!(post_id = %id, "Post deleted");
        true
    }

    /// Register a callback invoked after every add, update and delete.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.register(Arc::new(callback))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether the latest save had to drop images to fit the slot.
    pub fn last_save_degraded(&self) -> bool {
        matches!(self.state().last_save, SaveOutcome::Degraded { .. })
    }

    pub fn last_save_outcome(&self) -> SaveOutcome {
        self.state().last_save
    }

    /// Whether a durable slot is attached for this session.
    pub fn is_persistent(&self) -> bool {
        self.state().slot.is_some()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.state().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().posts.is_empty()
    }

    /// Filtered and sorted listing.
    pub fn query(&self, query: &PostQuery) -> Vec<Post> {
        query.apply(&self.state().posts)
    }

    /// Unique tags across all posts, sorted.
    pub fn tags(&self) -> Vec<String> {
        query::all_tags(&self.state().posts)
    }

    /// The `limit` newest posts.
    pub fn recent(&self, limit: usize) -> Vec<Post> {
        query::recent(&self.state().posts, limit)
    }

    pub fn dashboard(&self) -> DashboardStats {
        let now = self.clock.now();
        DashboardStats::compute(&self.state().posts, now)
    }
}

fn fresh_id(posts: &[Post]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !posts.iter().any(|post| post.id == id) {
            return id;
        }
    }
}

fn load(state: &mut StoreState, key: &str) {
    let Some(slot) = state.slot.clone() else {
        tracing::info!("No durable slot attached, posts live in memory only");
        return;
    };

    match slot.get(key) {
        Ok(Some(payload)) => match decode_posts(&payload) {
            Ok(posts) => {
                tracing::info!(key = %key, posts = posts.len(), "Loaded posts from slot");
                state.posts = posts;
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "Stored posts are unreadable, continuing in memory without saving"
                );
                state.slot = None;
            }
        },
        Ok(None) => {
            tracing::info!(key = %key, "Slot is empty, seeding sample posts");
            state.posts = sample_posts();
            persist(state, key);
        }
        Err(e) => {
            tracing::warn!(
                key = %key,
                error = %e,
                "Durable slot unavailable, continuing in memory"
            );
            state.slot = None;
        }
    }
}

fn persist(state: &mut StoreState, key: &str) {
    state.last_save = match state.slot.clone() {
        Some(slot) => save(slot.as_ref(), key, &mut state.posts),
        None => SaveOutcome::Skipped,
    };
}

fn write(slot: &dyn KeyValueSlot, key: &str, posts: &[Post]) -> Result<(), StorageError> {
    let payload = encode_posts(posts)?;
    slot.set(key, &payload)
}

/// Write the whole collection, retrying once without images on quota errors.
fn save(slot: &dyn KeyValueSlot, key: &str, posts: &mut Vec<Post>) -> SaveOutcome {
    let err = match write(slot, key, posts) {
        Ok(()) => {
            tracing::debug!(key = %key, posts = posts.len(), "Posts saved");
            return SaveOutcome::Saved;
        }
        Err(e) => e,
    };

    if !err.is_quota_exceeded() {
        tracing::error!(key = %key, error = %err, "Failed to save posts");
        return SaveOutcome::Failed;
    }

    tracing::warn!(key = %key, error = %err, "Slot quota exceeded, retrying without images");

    let stripped: Vec<Post> = posts
        .iter()
        .cloned()
        .map(|mut post| {
            post.image = None;
            post
        })
        .collect();

    match write(slot, key, &stripped) {
        Ok(()) => {
            let images_dropped = posts.iter().filter(|post| post.image.is_some()).count();
            *posts = stripped;
            tracing::warn!(key = %key, images_dropped, "Posts saved without images");
            SaveOutcome::Degraded { images_dropped }
        }
        Err(e) => {
            tracing::error!(
                key = %key,
                error = %e,
                "Failed to save posts even without images"
            );
            SaveOutcome::Failed
        }
    }
}
