//! Per-sender sliding-window rate limiting.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

/// Sliding-window admission control keyed by sender id.
///
/// Rejected attempts are not recorded, so a sender that keeps retrying is
/// admitted again as soon as its oldest admitted request leaves the window.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Admit or reject a request from `sender` at the current time.
    pub fn admit(&self, sender: &str) -> bool {
        self.admit_at(sender, Instant::now())
    }

    /// Admit or reject a request from `sender` at `now`.
    pub fn admit_at(&self, sender: &str, now: Instant) -> bool {
        let mut windows = self.lock();
        let entries = windows.entry(sender.to_string()).or_default();

        while let Some(&oldest) = entries.front() {
            if now.saturating_duration_since(oldest) < self.window {
                break;
            }
            entries.pop_front();
        }

        if entries.len() >= self.max_requests {
            return false;
        }
        entries.push_back(now);
        true
    }

    /// Drop windows whose entries have all expired. Returns how many were
    /// removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|_, entries| {
            entries
                .back()
                .is_some_and(|&latest| now.saturating_duration_since(latest) < self.window)
        });
        before - windows.len()
    }

    /// Number of senders currently tracked.
    pub fn tracked_senders(&self) -> usize {
        self.lock().len()
    }

    /// Periodically sweep idle windows on a background task.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = limiter.sweep(Instant::now());
                if removed > 0 {
                    debug!("Swept {} idle rate-limit windows", removed);
                }
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Instant>>> {
        // Window state stays consistent even if a holder panicked
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }
}
