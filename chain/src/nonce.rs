//! Nonce state for the signing account.
//!
//! The cached next-nonce lives behind an async mutex owned by the client —
//! never ambient state. `submit` holds the lock across the whole
//! fetch → build → sign → broadcast sequence, so two concurrent submissions
//! can never allocate the same nonce.

use tokio::sync::{Mutex, MutexGuard};

/// Lock-guarded cache of the next nonce to use.
///
/// `None` means unknown: the next submission must refetch from the ledger.
/// Any failed or timed-out broadcast invalidates the cache rather than
/// guessing, so a rejected submission never strands a nonce slot.
pub struct NonceManager {
    next: Mutex<Option<u64>>,
}

impl NonceManager {
    pub fn new() -> Self {
        Self {
            next: Mutex::new(None),
        }
    }

    /// Acquire the nonce slot. Held for the duration of one submission.
    pub async fn lock(&self) -> MutexGuard<'_, Option<u64>> {
        self.next.lock().await
    }
}

impl Default for NonceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Simulates the submit path: take the lock, resolve the nonce (fetch on
    /// miss), "broadcast", then advance the cache.
    async fn submit_once(manager: &NonceManager, fetched: &AtomicU64) -> u64 {
        let mut guard = manager.lock().await;
        let nonce = match *guard {
            Some(n) => n,
            None => fetched.fetch_add(0, Ordering::SeqCst),
        };
        tokio::task::yield_now().await;
        *guard = Some(nonce + 1);
        nonce
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_never_reuse_a_nonce() {
        let manager = Arc::new(NonceManager::new());
        let fetched = Arc::new(AtomicU64::new(10));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let m = Arc::clone(&manager);
            let f = Arc::clone(&fetched);
            handles.push(tokio::spawn(async move { submit_once(&m, &f).await }));
        }

        let mut nonces = Vec::new();
        for h in handles {
            nonces.push(h.await.unwrap());
        }
        nonces.sort_unstable();
        let expected: Vec<u64> = (10..42).collect();
        assert_eq!(nonces, expected);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let manager = NonceManager::new();
        {
            let mut guard = manager.lock().await;
            *guard = Some(5);
        }
        {
            // A rejected broadcast clears the cache.
            let mut guard = manager.lock().await;
            *guard = None;
        }
        let guard = manager.lock().await;
        assert!(guard.is_none());
    }
}
