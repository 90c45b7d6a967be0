//! Generic list controller: the canonical local copy of one server collection.
//!
//! A mounted view owns a [`ListController`]. Operations run on cloneable
//! [`ListHandle`]s that only hold a weak reference to the collection, so a
//! response that arrives after the view was dropped is discarded instead of
//! patching state nobody renders.

use std::{
    fmt::Debug,
    future::Future,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use shared::domain::{Faq, FaqId, QuestionId, UnansweredQuestion, Voice, VoiceId};
use tracing::{debug, warn};

use crate::{
    api::AdminApi,
    error::{ClientResult, Operation},
};

pub trait Entity: Clone + Send + 'static {
    type Id: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

impl Entity for Faq {
    type Id = FaqId;

    fn id(&self) -> FaqId {
        self.id
    }
}

impl Entity for UnansweredQuestion {
    type Id = QuestionId;

    fn id(&self) -> QuestionId {
        self.id
    }
}

impl Entity for Voice {
    type Id = VoiceId;

    fn id(&self) -> VoiceId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct EntityList<E> {
    items: Vec<E>,
    load: LoadState,
}

impl<E: Entity> Default for EntityList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityList<E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            load: LoadState::Loading,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: E::Id) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: E::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn mark_loading(&mut self) {
        self.load = LoadState::Loading;
    }

    /// Replaces the whole collection with a successful fetch.
    pub fn replace_all(&mut self, items: Vec<E>) {
        self.items = items;
        self.load = LoadState::Ready;
    }

    /// Records a failed fetch. Existing items are left as they were.
    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.load = LoadState::Failed(message.into());
    }

    pub fn prepend(&mut self, item: E) {
        self.items.insert(0, item);
    }

    /// Applies `patch` to the record with `id`. Returns false when no such
    /// record exists, which is not an error: the record may have been removed
    /// by a call that completed first.
    pub fn patch(&mut self, id: E::Id, patch: impl FnOnce(&mut E)) -> bool {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: E::Id) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Rewrites every record in one pass.
    pub fn rewrite_all(&mut self, mut rewrite: impl FnMut(&mut E)) {
        self.items.iter_mut().for_each(|item| rewrite(item));
    }
}

fn lock<E>(state: &Mutex<EntityList<E>>) -> MutexGuard<'_, EntityList<E>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ListController<E: Entity> {
    state: Arc<Mutex<EntityList<E>>>,
    api: Arc<dyn AdminApi>,
}

impl<E: Entity> ListController<E> {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            state: Arc::new(Mutex::new(EntityList::new())),
            api,
        }
    }

    pub fn handle(&self) -> ListHandle<E> {
        ListHandle {
            state: Arc::downgrade(&self.state),
            api: Arc::clone(&self.api),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&EntityList<E>) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn snapshot(&self) -> EntityList<E> {
        self.read(EntityList::clone)
    }

    pub fn items(&self) -> Vec<E> {
        self.read(|list| list.items().to_vec())
    }

    pub fn load_state(&self) -> LoadState {
        self.read(|list| list.load_state().clone())
    }
}

pub struct ListHandle<E: Entity> {
    state: Weak<Mutex<EntityList<E>>>,
    api: Arc<dyn AdminApi>,
}

impl<E: Entity> Clone for ListHandle<E> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
            api: Arc::clone(&self.api),
        }
    }
}

impl<E: Entity> ListHandle<E> {
    pub fn is_attached(&self) -> bool {
        self.state.strong_count() > 0
    }

    pub(crate) fn api(&self) -> &dyn AdminApi {
        self.api.as_ref()
    }

    /// Runs `f` against the live collection. Returns `None` when the owning
    /// controller is gone.
    pub(crate) fn apply<R>(
        &self,
        op: Operation,
        f: impl FnOnce(&mut EntityList<E>) -> R,
    ) -> Option<R> {
        match self.state.upgrade() {
            Some(state) => Some(f(&mut lock(&state))),
            None => {
                debug!(operation = op.name(), "list no longer mounted; dropping result");
                None
            }
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&EntityList<E>) -> R) -> Option<R> {
        self.state.upgrade().map(|state| f(&lock(&state)))
    }

    /// Shared load path: fetch, then replace the collection or record the
    /// failure. Returns the number of loaded items.
    pub(crate) async fn load_with<F>(&self, op: Operation, fetch: F) -> ClientResult<usize>
    where
        F: Future<Output = ClientResult<Vec<E>>>,
    {
        self.apply(op, EntityList::mark_loading);
        match fetch.await {
            Ok(items) => {
                let count = items.len();
                self.apply(op, |list| list.replace_all(items));
                debug!(operation = op.name(), count, "collection loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(operation = op.name(), error = %err.detail(), "collection load failed");
                let message = err.to_string();
                self.apply(op, |list| list.mark_failed(message));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
