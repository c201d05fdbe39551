use crate::repository::EntryRepository;
use events::EntryEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A running change subscription. Dropping it stops the callbacks.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stops delivering events. Callbacks already running finish first.
    pub fn unsubscribe(mut self) {
        self.stop();
    }

    /// False once the repository has gone away or the subscription was stopped.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Entry subscription stopped");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Calls `on_change` for every change the repository announces, until the
/// returned `Subscription` is dropped.
///
/// Delivery is at-least-once with no delta contract: a receiver that falls
/// behind gets a single `EntryEvent::Resync` in place of what it missed.
///
/// Must be called from within a Tokio runtime.
pub fn subscribe_to_changes<R, F>(repo: &R, mut on_change: F) -> Subscription
where
    R: EntryRepository + ?Sized,
    F: FnMut(&EntryEvent) + Send + 'static,
{
    let mut event_rx = repo.changes();

    let handle = tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => on_change(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Entry subscription lagged, skipped {} events.", n);
                    on_change(&EntryEvent::Resync);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Entry change channel closed. Subscription ending.");
                    break;
                }
            }
        }
    });

    Subscription { handle: Some(handle) }
}
