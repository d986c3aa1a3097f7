//! The per-session poll loop: Starting -> Polling -> Concluded, with a
//! supersession check at every batch boundary.

use super::SearchMessage;
use crate::ports::editor::DocumentStore;
use crate::ports::search::{Batch, Query, SearchTransport, SessionId};
use crate::store::results::{display_path, FileGroup};
use crate::store::{extract_preview, LineIndex, ResultStore, ViewMatch};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex};

pub(crate) struct SessionCtx<T, D> {
    pub transport: Arc<T>,
    pub docs: Arc<D>,
    /// The manager's currently-active session id (0 = none). Shared across
    /// session lifetimes; this loop only ever reads and compare-exchanges it.
    pub active: Arc<AtomicU64>,
    /// This session's own store. A newer session swaps the manager's live
    /// pointer to a different store, so a stale loop can never touch the one
    /// bound to the view.
    pub store: Arc<Mutex<ResultStore>>,
    pub id: SessionId,
    pub query: Query,
    pub tx: SyncSender<SearchMessage>,
    pub workspace_root: Option<PathBuf>,
}

pub(crate) async fn run<T: SearchTransport, D: DocumentStore>(ctx: SessionCtx<T, D>) {
    if ctx.query.pattern.is_empty() {
        conclude(&ctx);
        return;
    }

    let mut batch = match ctx.transport.start_search(ctx.id, &ctx.query).await {
        Ok(b) => b,
        Err(e) => {
            fail(&ctx, e.to_string());
            return;
        }
    };

    loop {
        // Supersession check: exactly once per received batch, before any
        // shared-state mutation. A supersession landing after this point lets
        // at most one stale batch through; it lands in this session's own
        // store, which is no longer the live one.
        if ctx.active.load(Ordering::Relaxed) != ctx.id.as_u64() {
            tracing::debug!(session = %ctx.id, "superseded, dropping batch");
            return;
        }

        let deltas = enrich_batch(&ctx, &batch).await;
        let results = {
            let mut store = ctx.store.lock().expect("result store poisoned");
            store.append_batch(deltas);
            store.snapshot()
        };
        let _ = ctx.tx.send(SearchMessage::Results {
            session_id: ctx.id,
            results,
        });

        if batch.is_empty() {
            conclude(&ctx);
            return;
        }

        batch = match ctx.transport.poll_continuation(ctx.id).await {
            Ok(b) => b,
            Err(e) => {
                fail(&ctx, e.to_string());
                return;
            }
        };
    }
}

/// Normal termination: freeze the store, release the active pointer if it is
/// still ours, and tell the view. `mark_concluded` is idempotent, so a store
/// can never be double-terminated.
fn conclude<T, D>(ctx: &SessionCtx<T, D>) {
    ctx.store
        .lock()
        .expect("result store poisoned")
        .mark_concluded();
    let _ = ctx
        .active
        .compare_exchange(ctx.id.as_u64(), 0, Ordering::Relaxed, Ordering::Relaxed);
    let _ = ctx.tx.send(SearchMessage::Concluded { session_id: ctx.id });
}

fn fail<T, D>(ctx: &SessionCtx<T, D>, message: String) {
    if ctx.active.load(Ordering::Relaxed) != ctx.id.as_u64() {
        // Superseded session: the replaced store is not ours to conclude.
        return;
    }
    tracing::warn!(session = %ctx.id, error = %message, "search transport failed");
    ctx.store
        .lock()
        .expect("result store poisoned")
        .mark_concluded();
    let _ = ctx
        .active
        .compare_exchange(ctx.id.as_u64(), 0, Ordering::Relaxed, Ordering::Relaxed);
    let _ = ctx.tx.send(SearchMessage::Error {
        session_id: ctx.id,
        message,
    });
}

/// Group a batch by file (first-seen order), read each document once, and
/// compute the preview chunks for every match. A document that cannot be read
/// still keeps its matches, just with empty previews.
async fn enrich_batch<T, D: DocumentStore>(
    ctx: &SessionCtx<T, D>,
    batch: &Batch,
) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = Vec::new();
    for loc in &batch.locations {
        if !groups.iter().any(|g| g.uri == loc.uri) {
            groups.push(FileGroup {
                uri: loc.uri.clone(),
                path: display_path(&loc.uri, ctx.workspace_root.as_deref()),
                matches: Vec::new(),
            });
        }
    }

    for group in &mut groups {
        let text = match ctx.docs.read_document(&group.uri).await {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::warn!(uri = %group.uri, error = %e, "preview read failed");
                None
            }
        };
        let index = text.as_deref().map(LineIndex::new);

        for loc in batch.locations.iter().filter(|l| l.uri == group.uri) {
            let chunks = match (&text, &index) {
                (Some(text), Some(index)) => extract_preview(text, index, loc.range),
                _ => crate::store::PreviewChunks {
                    before: String::new(),
                    inside: String::new(),
                    after: String::new(),
                },
            };
            group.matches.push(ViewMatch {
                uri: loc.uri.clone(),
                range: loc.range,
                suggested_fix: loc.suggested_fix.clone(),
                before: chunks.before,
                inside: chunks.inside,
                after: chunks.after,
                is_fixed: false,
                is_dismissed: false,
            });
        }
    }

    groups
}
