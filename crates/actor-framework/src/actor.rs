//! # Generic Actor Server
//!
//! A `ResourceActor` is one shard of a resource store. It owns a slice of the
//! records and processes the requests routed to it one at a time, so a shard
//! needs no lock over its map. Several shards run in parallel, each in its own
//! Tokio task; the [`ResourceClient`] routes every id-keyed request to the
//! shard that owns the id.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One shard of a resource store.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::sharded(n, buffer)` returns the shards and a
///    client that routes to them (or `ResourceActor::new(buffer)` for one shard).
/// 2. **Wire & Run**: spawn `shard.run(context)` for every shard.
/// 3. **Use**: clone the client freely; dropping every clone shuts the shards down.
///
/// ```rust,ignore
/// let (shards, client) = ResourceActor::<Order>::sharded(4, 32);
/// for shard in shards {
///     tokio::spawn(shard.run(()));
/// }
/// let id = client.create(params).await?;
/// ```
///
/// # Operations
///
/// * **Create** – rejects an id already present, builds the entity with
///   `from_create_params`, runs `on_create`, then inserts it.
/// * **Get / List** – clone snapshots out of the map.
/// * **Update / Action** – run the hook on a clone of the record and commit the
///   clone only if the hook succeeds.
/// * **Delete** – replies `0` for an unknown id; otherwise runs `on_delete`
///   (which may veto) and replies `1`.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    shard: usize,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a single-shard actor and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait for
    /// space when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self::with_receiver(0, receiver);
        (actor, ResourceClient::new(sender))
    }

    /// Creates `shards` actors and one client routing across all of them.
    ///
    /// A `shards` value of zero is treated as one.
    pub fn sharded(shards: usize, buffer_size: usize) -> (Vec<Self>, ResourceClient<T>) {
        let shards = shards.max(1);
        let mut actors = Vec::with_capacity(shards);
        let mut senders = Vec::with_capacity(shards);
        for shard in 0..shards {
            let (sender, receiver) = mpsc::channel(buffer_size);
            actors.push(Self::with_receiver(shard, receiver));
            senders.push(sender);
        }
        (actors, ResourceClient::from_shards(senders))
    }

    fn with_receiver(shard: usize, receiver: mpsc::Receiver<ResourceRequest<T>>) -> Self {
        Self {
            receiver,
            store: HashMap::new(),
            shard,
        }
    }

    /// Runs the shard's event loop until every client has been dropped.
    ///
    /// The `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let shard = self.shard;
        info!(entity_type, shard, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(entity_type, shard, %id, ?params, "Create");
                    let result = self.create(id, params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, shard, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, shard, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, shard, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, shard, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, shard, %id, ?update, "Update");
                    let result = self.update(&id, update, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, shard, %id, "Updated"),
                        Err(e) => warn!(entity_type, shard, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, shard, %id, "Delete");
                    let result = self.delete(&id, &context).await;
                    match &result {
                        Ok(0) => debug!(entity_type, shard, %id, "Nothing to delete"),
                        Ok(_) => info!(entity_type, shard, %id, size = self.store.len(), "Deleted"),
                        Err(e) => warn!(entity_type, shard, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, shard, %id, ?action, "Action");
                    let result = self.action(&id, action, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, shard, %id, "Action ok"),
                        Err(e) => warn!(entity_type, shard, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, shard, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        if self.store.contains_key(&id) {
            return Err(FrameworkError::DuplicateId(id.to_string()));
        }
        let mut item = T::from_create_params(id.clone(), params).map_err(entity_error)?;
        item.on_create(context).await.map_err(entity_error)?;
        self.store.insert(id.clone(), item);
        Ok(id)
    }

    async fn update(
        &mut self,
        id: &T::Id,
        update: T::Update,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get_mut(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut draft = item.clone();
        draft.on_update(update, context).await.map_err(entity_error)?;
        *item = draft;
        Ok(item.clone())
    }

    async fn delete(&mut self, id: &T::Id, context: &T::Context) -> Result<usize, FrameworkError> {
        let Some(item) = self.store.get(id) else {
            return Ok(0);
        };
        item.on_delete(context).await.map_err(entity_error)?;
        Ok(self.store.remove(id).map_or(0, |_| 1))
    }

    async fn action(
        &mut self,
        id: &T::Id,
        action: T::Action,
        context: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        let item = self
            .store
            .get_mut(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let mut draft = item.clone();
        let result = draft
            .handle_action(action, context)
            .await
            .map_err(entity_error)?;
        *item = draft;
        Ok(result)
    }
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}
