use std::{
    fmt,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
    time::Duration,
};
use tokio_util::sync::CancellationToken;

/// Trailing edge debounce.
///
/// Every [`call`](Debouncer::call) restarts the window and supersedes the
/// previously scheduled run, so a burst of calls runs the callback once,
/// `window` after the last call. The callback reads whatever it needs when
/// it runs, not when it was scheduled.
pub struct Debouncer {
    window: Duration,
    callback: Arc<dyn Fn() + Send + Sync>,
    pending: Mutex<Option<CancellationToken>>,
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl Debouncer {
    pub fn new(window: Duration, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            window,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Schedules the callback. Must be called from within a tokio runtime.
    pub fn call(&self) {
        let token = CancellationToken::new();
        if let Some(superseded) = self.pending().replace(token.clone()) {
            superseded.cancel();
        }

        let callback = self.callback.clone();
        let deadline = tokio::time::Instant::now() + self.window;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!("Debounced call superseded");
                }
                _ = tokio::time::sleep_until(deadline) => {
                    callback();
                    // Stays pending until the callback has returned.
                    token.cancel();
                }
            }
        });
    }

    /// Drops the scheduled run, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.pending().take() {
            token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().as_ref().is_some_and(|token| !token.is_cancelled())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
