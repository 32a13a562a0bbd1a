// Politeness pause: sleep after every N requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct Throttle {
    every: usize,
    pause: Duration,
    count: AtomicUsize,
}

impl Throttle {
    pub fn new(every: usize, pause: Duration) -> Self {
        Throttle {
            every: every.max(1),
            pause,
            count: AtomicUsize::new(0),
        }
    }

    /// Call before each request. Every `every`-th call sleeps for the pause
    /// first.
    pub async fn wait(&self) {
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if n > 1 && (n - 1) % self.every == 0 && !self.pause.is_zero() {
            debug!("pausing {:?} after {} requests", self.pause, n - 1);
            tokio::time::sleep(self.pause).await;
        }
    }

    pub fn requests(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}
