//! Inspection flow: resolve, render, aggregate
//!
//! Drives the linear report flow over any [`AccountStore`]:
//! resolve → render snapshot → (on confirmation) metric pass. The store
//! handle is passed in explicitly so tests can substitute a fake.
//!
//! The metric pass STREAMS: each significant line goes to the caller's
//! sink as soon as its count returns. On a mid-pass store failure the
//! lines already emitted stand and the error propagates; no further
//! resources are queried. Counts reflect store state at query time, not
//! snapshot time — a deliberate, narrow staleness window.

use tracing::{debug, info};

use crate::database::{AccountSnapshot, AccountStore};
use crate::error::StoreError;
use crate::report::render_metric_line;

pub struct Inspector<S: AccountStore> {
    store: S,
}

impl<S: AccountStore> Inspector<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve an account hierarchy by email. `Ok(None)` when no account
    /// matches; the caller renders nothing in that case.
    pub async fn resolve(&self, email: &str) -> Result<Option<AccountSnapshot>, StoreError> {
        let snapshot = self.store.resolve_account(email).await?;
        match &snapshot {
            Some(account) => info!(
                account = %account.id,
                workspaces = account.workspaces.len(),
                "resolved account hierarchy"
            ),
            None => info!("no account matched identifier"),
        }
        Ok(snapshot)
    }

    /// Walk the snapshot in traversal order (workspaces, then resources
    /// most-recently-updated first), count qualifying events for each
    /// resource sequentially, and stream each non-zero line to `sink`.
    pub async fn metric_pass(
        &self,
        snapshot: &AccountSnapshot,
        mut sink: impl FnMut(&str),
    ) -> Result<(), StoreError> {
        for workspace in &snapshot.workspaces {
            for resource in &workspace.resources {
                let count = self.store.count_qualifying_events(resource.id).await?;
                debug!(
                    workspace = %workspace.id,
                    resource = %resource.id,
                    count,
                    "counted qualifying events"
                );
                if let Some(line) = render_metric_line(resource, count) {
                    sink(&line);
                }
            }
        }
        Ok(())
    }
}
