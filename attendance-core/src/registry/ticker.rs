use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::SharedRegistry;

/// One-second countdown task tied to the admin view's lifetime.
///
/// The cancellation handle must be invoked on every exit path so no orphaned
/// timer keeps ticking against a detached view; dropping the ticker cancels
/// it as well.
pub struct CountdownTicker {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTicker {
    /// Spawn the per-second tick loop against a shared registry.
    pub fn start(registry: SharedRegistry) -> Self {
        Self::with_period(registry, Duration::from_secs(1))
    }

    fn with_period(registry: SharedRegistry, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // the countdown starts a full period after attach.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => registry.write().tick(),
                }
            }
            log::debug!("[TICKER] countdown task stopped");
        });
        CountdownTicker {
            cancel,
            handle: Some(handle),
        }
    }

    /// Cancel the tick loop and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
