//! Cancellable scheduled work backing the resize and orientation delays.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

/// Collapses a burst of triggers into one task run after a quiet period.
///
/// Scheduling while a run is still pending aborts it and re-arms the delay,
/// so at most one pending run exists at any time.
#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut guard = self.pending.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        // Anchor the deadline now, not at the task's first poll.
        let sleep = time::sleep(self.delay);
        *guard = Some(tokio::spawn(async move {
            sleep.await;
            task().await;
        }));
    }

    pub async fn cancel(&self) {
        if let Some(handle) = self.pending.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

/// One-shot settle delay. Each call runs independently; nothing cancels it.
pub fn run_after<F, Fut>(delay: Duration, task: F) -> JoinHandle<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let sleep = time::sleep(delay);
    tokio::spawn(async move {
        sleep.await;
        task().await;
    })
}
