//! Provider boundary: a push-based transaction source plus record mutations.
//!
//! [`LocalProvider`] is the in-process implementation used by the CLI and by
//! tests. It keeps documents in memory and, when opened with a path, rewrites a
//! JSON file after every change.

use chrono::Utc;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tally_core::{NewTransaction, Transaction, sort_newest_first};
use tracing::{debug, info};

use crate::document::TransactionDocument;
use crate::error::{SyncError, SyncResult};
use crate::session::Session;

/// Receives the full, newest-first snapshot on every change.
pub type SnapshotCallback = Arc<dyn Fn(Vec<Transaction>) + Send + Sync>;

/// A live registration with a provider. Dropping it stops delivery.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop delivery now.
    pub fn cancel(mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.cancel.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

pub trait TransactionProvider: Send + Sync {
    /// Register for snapshots of `session`'s transactions. The current snapshot
    /// is delivered before this returns.
    fn subscribe(&self, session: &Session, callback: SnapshotCallback) -> Subscription;

    /// One-off read of the current snapshot.
    fn snapshot(&self, session: &Session) -> SyncResult<Vec<Transaction>>;

    /// Store a new record and return its id.
    fn create(&self, session: &Session, txn: NewTransaction) -> SyncResult<String>;

    fn update(&self, session: &Session, id: &str, txn: NewTransaction) -> SyncResult<()>;

    fn delete(&self, session: &Session, id: &str) -> SyncResult<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreFile {
    next_id: u64,
    documents: BTreeMap<String, TransactionDocument>,
}

struct Subscriber {
    user_id: String,
    callback: SnapshotCallback,
}

#[derive(Default)]
struct State {
    store: StoreFile,
    subscribers: HashMap<u64, Subscriber>,
    next_subscriber: u64,
}

pub struct LocalProvider {
    state: Arc<Mutex<State>>,
    path: Option<PathBuf>,
    tz: Tz,
}

impl LocalProvider {
    /// Memory-only provider.
    pub fn in_memory(tz: Tz) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            path: None,
            tz,
        }
    }

    /// Provider backed by a JSON file; a missing file starts empty.
    pub fn open(path: impl AsRef<Path>, tz: Tz) -> SyncResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            StoreFile::default()
        };
        info!(path = %path.display(), documents = store.documents.len(), "opened transaction store");

        Ok(Self {
            state: Arc::new(Mutex::new(State {
                store,
                ..State::default()
            })),
            path: Some(path),
            tz,
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_locked(&self, state: &State, user_id: &str) -> Vec<Transaction> {
        let mut txns: Vec<Transaction> = state
            .store
            .documents
            .iter()
            .filter(|(_, doc)| doc.user_id == user_id)
            .filter_map(|(id, doc)| doc.clone().into_transaction(id, self.tz))
            .collect();
        sort_newest_first(&mut txns);
        txns
    }

    fn persist(&self, store: &StoreFile) -> SyncResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(store)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Persist `staged`, install it as the live store, then push a fresh
    /// snapshot to `user_id`'s subscribers. On a failed write the live store
    /// is left untouched.
    ///
    /// Callbacks run after the lock is released so they may call back into
    /// the provider.
    fn commit(&self, mut state: MutexGuard<'_, State>, staged: StoreFile, user_id: &str) -> SyncResult<()> {
        self.persist(&staged)?;
        state.store = staged;

        let snapshot = self.snapshot_locked(&state, user_id);
        let callbacks: Vec<SnapshotCallback> = state
            .subscribers
            .values()
            .filter(|s| s.user_id == user_id)
            .map(|s| Arc::clone(&s.callback))
            .collect();
        drop(state);

        debug!(user_id, subscribers = callbacks.len(), size = snapshot.len(), "delivering snapshot");
        for cb in callbacks {
            cb(snapshot.clone());
        }
        Ok(())
    }

    /// Look up a document owned by `user_id`.
    fn owned<'a>(store: &'a mut StoreFile, user_id: &str, id: &str) -> SyncResult<&'a mut TransactionDocument> {
        store
            .documents
            .get_mut(id)
            .filter(|doc| doc.user_id == user_id)
            .ok_or_else(|| SyncError::NotFound(id.to_string()))
    }
}

impl TransactionProvider for LocalProvider {
    fn subscribe(&self, session: &Session, callback: SnapshotCallback) -> Subscription {
        let (id, snapshot) = {
            let mut state = self.lock();
            let id = state.next_subscriber;
            state.next_subscriber += 1;
            state.subscribers.insert(
                id,
                Subscriber {
                    user_id: session.user_id.clone(),
                    callback: Arc::clone(&callback),
                },
            );
            (id, self.snapshot_locked(&state, &session.user_id))
        };

        callback(snapshot);

        let weak: Weak<Mutex<State>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .subscribers
                    .remove(&id);
            }
        })
    }

    fn snapshot(&self, session: &Session) -> SyncResult<Vec<Transaction>> {
        let state = self.lock();
        Ok(self.snapshot_locked(&state, &session.user_id))
    }

    fn create(&self, session: &Session, txn: NewTransaction) -> SyncResult<String> {
        let state = self.lock();
        let mut staged = state.store.clone();
        staged.next_id += 1;
        let id = format!("txn-{:06}", staged.next_id);
        let doc = TransactionDocument::from_new(&session.user_id, &txn, Utc::now());
        staged.documents.insert(id.clone(), doc);

        self.commit(state, staged, &session.user_id)?;
        info!(id = %id, user_id = %session.user_id, kind = %txn.kind, "created transaction");
        Ok(id)
    }

    fn update(&self, session: &Session, id: &str, txn: NewTransaction) -> SyncResult<()> {
        let state = self.lock();
        let mut staged = state.store.clone();
        Self::owned(&mut staged, &session.user_id, id)?.apply_update(&txn);

        self.commit(state, staged, &session.user_id)?;
        info!(id, user_id = %session.user_id, "updated transaction");
        Ok(())
    }

    fn delete(&self, session: &Session, id: &str) -> SyncResult<()> {
        let state = self.lock();
        let mut staged = state.store.clone();
        Self::owned(&mut staged, &session.user_id, id)?;
        staged.documents.remove(id);

        self.commit(state, staged, &session.user_id)?;
        info!(id, user_id = %session.user_id, "deleted transaction");
        Ok(())
    }
}
