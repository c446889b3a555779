//! Background autosave worker
//!
//! The store pushes every committed form onto an unbounded channel and moves
//! on. A single task drains the channel in order, so writes never reorder.

use super::FormRepository;
use crate::state::Form;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sending half of the autosave channel
#[derive(Debug, Clone)]
pub struct Autosave {
    tx: mpsc::UnboundedSender<Arc<Form>>,
}

impl Autosave {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// The worker exits once every `Autosave` handle has been dropped and the
    /// queue is drained.
    pub fn spawn(repository: FormRepository) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Arc<Form>>();
        let handle = tokio::spawn(async move {
            while let Some(form) = rx.recv().await {
                if let Err(e) = repository.save_form(&form).await {
                    tracing::warn!("Autosave of form {} failed: {}", form.id, e);
                }
            }
            tracing::debug!("Autosave worker stopped");
        });
        (Self { tx }, handle)
    }

    /// Queue `form` for saving; never blocks
    pub fn notify(&self, form: Arc<Form>) {
        if self.tx.send(form).is_err() {
            tracing::warn!("Autosave worker is gone, edit not persisted");
        }
    }
}
