//! Trailing-edge debouncing on the tokio runtime

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Coalesces bursts of calls into one callback invocation fired after
/// `window` of silence. Each call cancels the one pending before it.
pub struct Debouncer {
    window: Duration,
    runtime: Handle,
    callback: Arc<dyn Fn() + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Must be created from within a tokio runtime; calls may come from any
    /// thread afterwards.
    pub fn new<F>(window: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            window,
            runtime: Handle::current(),
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule the callback, replacing any pending invocation
    pub fn call(&self) {
        // held across the spawn so the stored task is always the latest one
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let callback = self.callback.clone();
        let window = self.window;
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(window).await;
            callback();
        }));
    }

    /// Drop the pending invocation, if any
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once() {
        let (count, callback) = counting();
        let debouncer = Debouncer::new(Duration::from_millis(1000), callback);

        for _ in 0..5 {
            debouncer.call();
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_fire_separately() {
        let (count, callback) = counting();
        let debouncer = Debouncer::new(Duration::from_millis(1000), callback);

        debouncer.call();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        debouncer.call();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_from_many_threads_fire_once() {
        let (count, callback) = counting();
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(1000), callback));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let debouncer = debouncer.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        debouncer.call();
                    }
                });
            }
        });

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(debouncer.pending.lock().unwrap().as_ref().is_some_and(|t| t.is_finished()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_call() {
        let (count, callback) = counting();
        let debouncer = Debouncer::new(Duration::from_millis(1000), callback);

        debouncer.call();
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
