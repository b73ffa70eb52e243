//! # Generic Client
//!
//! The sending half of a sharded resource store.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for a set of `ResourceActor` shards.
///
/// * **Routing** – every id-keyed request goes to the shard selected by the
///   id's hash, so a given record always lives on the same shard.
/// * **Id allocation** – ids come from one counter shared by all clones,
///   starting at 1. Ids are never reused.
/// * **Cloneable** – clones share the senders and the counter.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    shards: Arc<[mpsc::Sender<ResourceRequest<T>>]>,
    next_id: Arc<AtomicU32>,
}

impl<T: ActorEntity> ResourceClient<T> {
    /// Client for a single shard.
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self::from_shards(vec![sender])
    }

    /// Client routing across the given shards.
    ///
    /// # Panics
    ///
    /// Panics if `senders` is empty.
    pub fn from_shards(senders: Vec<mpsc::Sender<ResourceRequest<T>>>) -> Self {
        assert!(!senders.is_empty(), "a resource client needs at least one shard");
        Self {
            shards: senders.into(),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Number of shards this client routes across.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn allocate_id(&self) -> Result<T::Id, FrameworkError> {
        let raw = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map_err(|_| FrameworkError::IdsExhausted)?;
        T::Id::try_from(raw).map_err(|_| FrameworkError::IdsExhausted)
    }

    fn shard_for(&self, id: &T::Id) -> &mpsc::Sender<ResourceRequest<T>> {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let index = (hasher.finish() % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    async fn request<R>(
        sender: &mpsc::Sender<ResourceRequest<T>>,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Allocates an id and inserts a new entity under it.
    ///
    /// The sequence never wraps. Once it passes what `T::Id` can hold, every
    /// create fails with [`FrameworkError::IdsExhausted`].
    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        let id = self.allocate_id()?;
        let shard = self.shard_for(&id);
        Self::request(shard, |respond_to| ResourceRequest::Create {
            id,
            params,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let shard = self.shard_for(&id);
        Self::request(shard, |respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    /// Snapshot of every entity across all shards, in no particular order.
    ///
    /// The request is sent to every shard before any reply is awaited, so the
    /// shards answer concurrently.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let mut pending = Vec::with_capacity(self.shards.len());
        for shard in self.shards.iter() {
            let (respond_to, response) = oneshot::channel();
            shard
                .send(ResourceRequest::List { respond_to })
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            pending.push(response);
        }

        let mut items = Vec::new();
        for response in pending {
            items.extend(response.await.map_err(|_| FrameworkError::ActorDropped)??);
        }
        Ok(items)
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let shard = self.shard_for(&id);
        Self::request(shard, |respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Removes an entity; resolves to the number of entities removed (0 or 1).
    pub async fn delete(&self, id: T::Id) -> Result<usize, FrameworkError> {
        let shard = self.shard_for(&id);
        Self::request(shard, |respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let shard = self.shard_for(&id);
        Self::request(shard, |respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}
