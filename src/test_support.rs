//! Shared test doubles

use crate::cache::{CacheStorage, CachedEntry, MemoryStorage};
use crate::error::{PaviError, PaviResult};
use crate::net::{Fetcher, Request, Response};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the scripted network does for a URL
#[derive(Debug, Clone)]
pub enum Script {
    Respond(Response),
    Fail,
    /// Never resolves
    Hang,
}

/// Fetcher answering from a fixed script, keyed by full URL
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.set(url, Script::Respond(Response::new(status, body)));
    }

    pub fn fail(&self, url: &str) {
        self.set(url, Script::Fail);
    }

    pub fn hang(&self, url: &str) {
        self.set(url, Script::Hang);
    }

    pub fn set(&self, url: &str, script: Script) {
        self.scripts.lock().unwrap().insert(url.to_string(), script);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> PaviResult<Response> {
        let url = request.url.to_string();
        self.calls.lock().unwrap().push(url.clone());
        let script = self.scripts.lock().unwrap().get(&url).cloned();

        match script {
            Some(Script::Respond(response)) => Ok(response),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Fail) | None => Err(PaviError::network(url, "scripted failure")),
        }
    }
}

/// Memory storage that counts reads and fails on request
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    reads: AtomicUsize,
    fail_gets: AtomicBool,
    fail_puts_after: Mutex<Option<usize>>,
    fail_put_at: Mutex<Option<usize>>,
    puts: AtomicUsize,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Let `n` puts succeed, then fail every later one
    pub fn fail_puts_after(&self, n: usize) {
        *self.fail_puts_after.lock().unwrap() = Some(n);
    }

    /// Fail only the put with zero-based index `n`
    pub fn fail_put_at(&self, n: usize) {
        *self.fail_put_at.lock().unwrap() = Some(n);
    }

    /// Fail every get
    pub fn fail_gets(&self) {
        self.fail_gets.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheStorage for CountingStorage {
    async fn open(&self, partition: &str) -> PaviResult<bool> {
        self.inner.open(partition).await
    }

    async fn get(&self, partition: &str, key: &str) -> PaviResult<Option<CachedEntry>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(PaviError::storage(partition, "scripted read failure"));
        }
        self.inner.get(partition, key).await
    }

    async fn put(&self, partition: &str, entry: &CachedEntry) -> PaviResult<()> {
        let done = self.puts.fetch_add(1, Ordering::SeqCst);
        let limit = *self.fail_puts_after.lock().unwrap();
        let at = *self.fail_put_at.lock().unwrap();
        if limit.is_some_and(|n| done >= n) || at == Some(done) {
            return Err(PaviError::storage(partition, "scripted write failure"));
        }
        self.inner.put(partition, entry).await
    }

    async fn delete(&self, partition: &str, key: &str) -> PaviResult<bool> {
        self.inner.delete(partition, key).await
    }

    async fn delete_partition(&self, partition: &str) -> PaviResult<bool> {
        self.inner.delete_partition(partition).await
    }

    async fn partitions(&self) -> PaviResult<Vec<String>> {
        self.inner.partitions().await
    }

    async fn keys(&self, partition: &str) -> PaviResult<Vec<String>> {
        self.inner.keys(partition).await
    }
}
