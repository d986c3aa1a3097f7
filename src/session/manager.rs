//! Session manager: owns the active-session pointer and the live result
//! store, starts and supersedes sessions, and routes fix/dismiss commands.

use super::run::{self, SessionCtx};
use super::SearchMessage;
use crate::fixes::{FileFixReport, FixApplicator};
use crate::ports::editor::{self, DocumentStore};
use crate::ports::search::{Query, Range, SearchTransport, SessionId};
use crate::store::{ResultStore, ViewResults};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex};

struct LiveSearch {
    store: Arc<Mutex<ResultStore>>,
    last_query: Option<Query>,
}

pub struct SessionManager<T, D> {
    transport: Arc<T>,
    docs: Arc<D>,
    runtime: tokio::runtime::Handle,
    tx: SyncSender<SearchMessage>,
    /// Id of the most recently started session; 0 means none. Every in-flight
    /// poll loop compares itself against this at each batch boundary.
    active: Arc<AtomicU64>,
    /// Swapped wholesale on every new session, never merged, so a renderer
    /// holding the previous store never sees mixed sessions.
    live: Mutex<LiveSearch>,
    fixes: FixApplicator<D>,
    workspace_root: Option<PathBuf>,
}

impl<T: SearchTransport + 'static, D: DocumentStore + 'static> SessionManager<T, D> {
    pub fn new(
        transport: Arc<T>,
        docs: Arc<D>,
        runtime: tokio::runtime::Handle,
        tx: SyncSender<SearchMessage>,
    ) -> Self {
        Self {
            transport,
            docs: docs.clone(),
            runtime,
            tx,
            active: Arc::new(AtomicU64::new(0)),
            live: Mutex::new(LiveSearch {
                store: Arc::new(Mutex::new(ResultStore::new(SessionId::next()))),
                last_query: None,
            }),
            fixes: FixApplicator::new(docs),
            workspace_root: None,
        }
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Start a new search, superseding any in-flight one. The id allocation,
    /// active-pointer update, and store swap happen under one lock so two
    /// concurrent starts cannot interleave.
    pub fn start_search(&self, query: Query) -> SessionId {
        let (id, store) = {
            let mut live = self.live.lock().expect("live search poisoned");
            let id = SessionId::next();
            let store = Arc::new(Mutex::new(ResultStore::new(id)));
            self.active.store(id.as_u64(), Ordering::Relaxed);
            live.store = store.clone();
            live.last_query = Some(query.clone());
            (id, store)
        };

        tracing::info!(session = %id, pattern = %query.pattern, "starting search");
        self.runtime.spawn(run::run(SessionCtx {
            transport: self.transport.clone(),
            docs: self.docs.clone(),
            active: self.active.clone(),
            store,
            id,
            query,
            tx: self.tx.clone(),
            workspace_root: self.workspace_root.clone(),
        }));
        id
    }

    /// Re-run the last query as a brand-new session.
    pub fn refresh(&self) -> Option<SessionId> {
        let query = self
            .live
            .lock()
            .expect("live search poisoned")
            .last_query
            .clone()?;
        Some(self.start_search(query))
    }

    /// Drop the live results and deactivate any in-flight session. The stale
    /// loop notices the pointer change at its next batch boundary.
    pub fn clear(&self) {
        let store = {
            let mut live = self.live.lock().expect("live search poisoned");
            self.active.store(0, Ordering::Relaxed);
            let id = SessionId::next();
            let mut cleared = ResultStore::new(id);
            cleared.mark_concluded();
            live.store = Arc::new(Mutex::new(cleared));
            live.last_query = None;
            live.store.clone()
        };
        let results = store.lock().expect("result store poisoned").snapshot();
        let _ = self.tx.send(SearchMessage::Results {
            session_id: results.session_id,
            results,
        });
    }

    /// Dismiss one match. Stale references are a silent no-op; an actual
    /// change re-emits the snapshot.
    pub fn dismiss(&self, uri: &str, range: Range) {
        let store = self.live_store();
        let changed = store
            .lock()
            .expect("result store poisoned")
            .mark_dismissed(uri, range);
        if changed {
            self.notify(&store);
        }
    }

    /// Apply the suggested fix of one match. `Ok(false)` means there was
    /// nothing eligible to do (stale reference).
    pub async fn replace_one(&self, uri: &str, range: Range) -> editor::Result<bool> {
        let store = self.live_store();
        let applied = self.fixes.apply_single(&store, uri, range).await?;
        if applied {
            self.notify(&store);
        }
        Ok(applied)
    }

    /// Apply every eligible fix, file by file. Always re-emits the snapshot;
    /// the per-file report says what actually happened.
    pub async fn replace_all(&self) -> Vec<FileFixReport> {
        let store = self.live_store();
        let reports = self.fixes.apply_all(&store).await;
        self.notify(&store);
        reports
    }

    pub fn snapshot(&self) -> ViewResults {
        self.live_store()
            .lock()
            .expect("result store poisoned")
            .snapshot()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        let store = self.live_store();
        let store = store.lock().expect("result store poisoned");
        (self.active.load(Ordering::Relaxed) == store.session_id().as_u64())
            .then(|| store.session_id())
    }

    /// How many files still carry at least one eligible fix. Drives the
    /// "really replace N files?" confirmation.
    pub fn files_with_fixes(&self) -> usize {
        self.live_store()
            .lock()
            .expect("result store poisoned")
            .files_with_fixes()
    }

    fn live_store(&self) -> Arc<Mutex<ResultStore>> {
        self.live.lock().expect("live search poisoned").store.clone()
    }

    fn notify(&self, store: &Arc<Mutex<ResultStore>>) {
        let results = store.lock().expect("result store poisoned").snapshot();
        let _ = self.tx.send(SearchMessage::Results {
            session_id: results.session_id,
            results,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/manager.rs"]
mod tests;
