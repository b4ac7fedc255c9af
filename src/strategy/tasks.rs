//! Tracking of background revalidations

use crate::net::Response;
use std::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;

/// Background revalidation handles
///
/// A revalidation whose result was not needed is parked here so a host that
/// is about to exit can wait for it. Results are discarded.
#[derive(Default)]
pub struct Revalidations {
    handles: Mutex<Vec<JoinHandle<Option<Response>>>>,
}

impl Revalidations {
    fn lock(&self) -> MutexGuard<'_, Vec<JoinHandle<Option<Response>>>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Park a running revalidation
    pub fn track(&self, handle: JoinHandle<Option<Response>>) {
        let mut handles = self.lock();
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    pub fn pending(&self) -> usize {
        self.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Await every parked revalidation
    pub async fn drain(&self) {
        let handles = std::mem::take(&mut *self.lock());
        if handles.is_empty() {
            return;
        }
        debug!("Waiting for {} background revalidation(s)", handles.len());
        for handle in handles {
            let _ = handle.await;
        }
    }
}
