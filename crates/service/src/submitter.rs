use std::sync::Arc;
use std::time::Duration;

use procura_cache::SourceCache;
use procura_core::{Actor, Partition, RELOAD_DELAY_MS, Record};
use procura_transport::WriteEndpoint;

use crate::{RequestDraft, ServiceError, Transition};

/// Posts mutations and keeps the cache honest about them.
///
/// On a confirmed write the affected partitions are invalidated and the
/// submitter waits a short fixed delay before returning, so a reload
/// issued right after sees the backend's post-write state. On failure the
/// caches are left untouched and the error is surfaced; retrying is the
/// user's call.
pub struct CommandSubmitter {
    writer: Arc<dyn WriteEndpoint>,
    cache: SourceCache,
    actor: Actor,
    reload_delay: Duration,
}

impl CommandSubmitter {
    pub fn new(writer: Arc<dyn WriteEndpoint>, cache: SourceCache, actor: Actor) -> Self {
        Self { writer, cache, actor, reload_delay: Duration::from_millis(RELOAD_DELAY_MS) }
    }

    /// Override the post-write settle delay (tests use zero).
    #[must_use]
    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Create a request, or update it when `existing_id` is given.
    ///
    /// # Errors
    /// [`ServiceError::Validation`] before any network call when the draft
    /// is invalid; [`ServiceError::Transport`] when the write fails.
    pub async fn submit_request(
        &self,
        draft: &RequestDraft,
        existing_id: Option<&str>,
    ) -> Result<(), ServiceError> {
        draft.validate()?;
        let form = draft.form_fields(&self.actor, existing_id);
        self.writer.post(&form).await?;
        tracing::info!(
            id = existing_id.unwrap_or("<new>"),
            items = %draft.items,
            "request saved"
        );
        self.settle(&[Partition::main()]).await;
        Ok(())
    }

    /// Apply a status transition to the record `id` within `snapshot`.
    ///
    /// The snapshot is the caller's loaded record set; the original
    /// quantity for partial completions is read from it.
    ///
    /// # Errors
    /// [`ServiceError::NotFound`] when `id` is not in the snapshot,
    /// [`ServiceError::Validation`] for a bad reason/quantity, and
    /// [`ServiceError::Transport`] when the write fails.
    pub async fn submit_transition(
        &self,
        snapshot: &[Record],
        id: &str,
        transition: Transition,
    ) -> Result<(), ServiceError> {
        let record = snapshot
            .iter()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| ServiceError::NotFound(id.to_owned()))?;

        let status = transition.target_status();
        let mut form = vec![
            ("ID".to_owned(), id.to_owned()),
            ("Status".to_owned(), status.as_str().to_owned()),
        ];

        match &transition {
            Transition::Approve => {
                form.push(("ApprovedBy".to_owned(), self.actor.username.clone()));
            },
            Transition::Reject { reason } => {
                if reason.trim().is_empty() {
                    return Err(ServiceError::Validation(
                        "a rejection needs a reason".to_owned(),
                    ));
                }
                form.push(("RejectedBy".to_owned(), self.actor.username.clone()));
                form.push(("RejectedReason".to_owned(), reason.trim().to_owned()));
            },
            Transition::Complete => {
                form.push(("DoneBy".to_owned(), self.actor.username.clone()));
            },
            Transition::CompletePartial { bought_qty } => {
                let original = record.quantity("Qty").ok_or_else(|| {
                    ServiceError::Validation(format!("record {id} has no usable quantity"))
                })?;
                if *bought_qty == 0 || *bought_qty >= original {
                    return Err(ServiceError::Validation(format!(
                        "bought quantity must be between 1 and {}",
                        original.saturating_sub(1)
                    )));
                }
                let remaining = original - bought_qty;
                form.push(("BoughtQty".to_owned(), bought_qty.to_string()));
                form.push(("RemainingQty".to_owned(), remaining.to_string()));
                form.push(("DoneBy".to_owned(), self.actor.username.clone()));
            },
        }

        self.writer.post(&form).await?;
        tracing::info!(id, status = status.as_str(), "status transition confirmed");
        self.settle(&transition.affected_partitions()).await;
        Ok(())
    }

    // Confirmed write: drop the stale partitions, then give the backend a
    // moment before the caller's reload fetches them fresh.
    async fn settle(&self, partitions: &[Partition]) {
        self.cache.invalidate_many(partitions);
        if !self.reload_delay.is_zero() {
            tokio::time::sleep(self.reload_delay).await;
        }
    }
}

impl std::fmt::Debug for CommandSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSubmitter")
            .field("actor", &self.actor.username)
            .field("reload_delay", &self.reload_delay)
            .finish()
    }
}
