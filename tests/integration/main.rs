//! Integration tests for pavi-offline

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn pavi() -> Command {
        cargo_bin_cmd!("pavi-offline")
    }

    /// Config pointing at an unreachable origin with storage inside `dir`
    fn write_config(dir: &Path) -> PathBuf {
        let path = dir.join("config.toml");
        let content = format!(
            r#"
[general]
journal = false

[agent]
version = "v2"
cache_prefix = "pavi-test-"
scope = "http://127.0.0.1:9/"

[precache]
urls = ["./", "./index.html"]

[storage]
dir = "{}"
"#,
            dir.join("caches").display()
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    fn with_config(dir: &TempDir) -> Command {
        let mut cmd = pavi();
        cmd.env("PAVI_OFFLINE_CONFIG", write_config(dir.path()));
        cmd
    }

    #[test]
    fn help_displays() {
        pavi()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("offline caching agent"));
    }

    #[test]
    fn version_displays() {
        pavi()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pavi-offline"));
    }

    #[test]
    fn config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        pavi()
            .args(["config", "path"])
            .arg("--config")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("custom.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = TempDir::new().unwrap();
        pavi()
            .arg("--config")
            .arg(dir.path().join("missing.toml"))
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[agent]"))
            .stdout(predicate::str::contains("pavi-fast-"));
    }

    #[test]
    fn config_init_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        pavi()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(path.exists());

        pavi()
            .arg("--config")
            .arg(&path)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[agent]\nversion = \"\"\n").unwrap();
        pavi()
            .arg("--config")
            .arg(&path)
            .args(["cache", "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("agent.version"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn cache_list_empty() {
        let dir = TempDir::new().unwrap();
        with_config(&dir)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache partitions found"));
    }

    #[test]
    fn cache_list_json_empty() {
        let dir = TempDir::new().unwrap();
        with_config(&dir)
            .args(["cache", "list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn install_fails_when_origin_unreachable() {
        let dir = TempDir::new().unwrap();
        with_config(&dir)
            .arg("install")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Precache failed"))
            .stderr(predicate::str::contains("Hint:"));

        with_config(&dir)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn activate_before_install_fails() {
        let dir = TempDir::new().unwrap();
        with_config(&dir)
            .arg("activate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cannot activate"))
            .stderr(predicate::str::contains("pavi-offline install"));
    }

    #[test]
    fn offline_navigation_fails_without_fallback() {
        let dir = TempDir::new().unwrap();
        with_config(&dir)
            .args(["fetch", "http://127.0.0.1:9/index.html", "--navigate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no cached copy exists"));
    }

    #[test]
    fn offline_resource_reports_unavailable() {
        let dir = TempDir::new().unwrap();
        with_config(&dir)
            .args(["fetch", "http://127.0.0.1:9/logo.png"])
            .assert()
            .success()
            .stdout(predicate::str::contains("unavailable"));
    }

    #[test]
    fn cache_evict_dry_run_keeps_partitions() {
        let dir = TempDir::new().unwrap();
        let origin = dir.path().join("caches").join("http_127.0.0.1_9");
        std::fs::create_dir_all(origin.join("pavi-test-core-v1")).unwrap();
        std::fs::create_dir_all(origin.join("other-app-v1")).unwrap();

        with_config(&dir)
            .args(["cache", "evict", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("pavi-test-core-v1"))
            .stdout(predicate::str::contains("other-app-v1").not());
        assert!(origin.join("pavi-test-core-v1").exists());

        with_config(&dir)
            .args(["cache", "evict"])
            .assert()
            .success();
        assert!(!origin.join("pavi-test-core-v1").exists());
        assert!(origin.join("other-app-v1").exists());
    }

    #[test]
    fn unknown_command_fails() {
        pavi().arg("serve").assert().failure();
    }
}

mod worker_tests {
    use async_trait::async_trait;
    use pavi_offline::cache::{CacheStorage, MemoryStorage, PartitionRole};
    use pavi_offline::config::Config;
    use pavi_offline::journal::Journal;
    use pavi_offline::net::{Fetcher, Request, Response};
    use pavi_offline::routing::FetchHandler;
    use pavi_offline::strategy::FetchOutcome;
    use pavi_offline::{OfflineWorker, PaviError, PaviResult};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Network backed by a URL map; unknown URLs are unreachable
    #[derive(Default)]
    struct MapFetcher {
        pages: Mutex<HashMap<String, (u16, String)>>,
        calls: Mutex<Vec<String>>,
    }

    impl MapFetcher {
        fn serve(&self, url: &str, status: u16, body: &str) {
            self.pages
                .lock()
                .unwrap()
                .insert(url.to_string(), (status, body.to_string()));
        }

        fn go_offline(&self) {
            self.pages.lock().unwrap().clear();
        }

        fn calls_to(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }
    }

    #[async_trait]
    impl Fetcher for MapFetcher {
        async fn fetch(&self, request: &Request) -> PaviResult<Response> {
            let url = request.url.to_string();
            self.calls.lock().unwrap().push(url.clone());
            match self.pages.lock().unwrap().get(&url) {
                Some((status, body)) => Ok(Response::new(*status, body.as_bytes().to_vec())),
                None => Err(PaviError::network(url, "offline")),
            }
        }
    }

    fn config(version: &str, manifest: &[&str]) -> Config {
        let mut config = Config::default();
        config.agent.version = version.to_string();
        config.agent.cache_prefix = "pavi-fast-".to_string();
        config.agent.scope = "https://app.test/".to_string();
        config.precache.urls = manifest.iter().map(|s| s.to_string()).collect();
        config
    }

    fn worker(config: &Config, storage: Arc<MemoryStorage>, fetcher: Arc<MapFetcher>) -> OfflineWorker {
        OfflineWorker::new(config, storage, fetcher, Journal::disabled()).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn navigation_is_served_offline_after_install() {
        let storage = Arc::new(MemoryStorage::new());
        let fetcher = Arc::new(MapFetcher::default());
        fetcher.serve("https://app.test/", 200, "root");
        fetcher.serve("https://app.test/index.html", 200, "index");
        let w = worker(&config("v1", &["./", "./index.html"]), storage, fetcher.clone());

        w.install().await.unwrap();
        w.activate().await.unwrap();
        fetcher.go_offline();

        let outcome = w
            .handle(&Request::navigate(url("https://app.test/index.html?x=1")))
            .await
            .unwrap();
        assert!(outcome.is_cached());
        assert_eq!(outcome.response().unwrap().body, b"index");
    }

    #[tokio::test]
    async fn backend_requests_are_never_cached() {
        let storage = Arc::new(MemoryStorage::new());
        let fetcher = Arc::new(MapFetcher::default());
        let api = "https://script.google.com/macros/s/abc/exec";
        fetcher.serve(api, 200, "{}");
        let w = worker(&config("v1", &[]), storage.clone(), fetcher.clone());

        for _ in 0..2 {
            let outcome = w.handle(&Request::get(url(api))).await.unwrap();
            assert!(matches!(outcome, FetchOutcome::Network(_)));
        }
        assert_eq!(fetcher.calls_to(api), 2);
        for name in storage.partitions().await.unwrap() {
            assert!(storage.keys(&name).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn stale_copy_served_then_refreshed() {
        let storage = Arc::new(MemoryStorage::new());
        let fetcher = Arc::new(MapFetcher::default());
        let css = "https://fonts.googleapis.com/css2?family=Funnel+Sans";
        fetcher.serve(css, 200, "old");
        let w = worker(&config("v1", &[]), storage, fetcher.clone());

        let first = w.handle(&Request::get(url(css))).await.unwrap();
        assert!(matches!(first, FetchOutcome::Network(_)));

        fetcher.serve(css, 200, "new");
        let second = w.handle(&Request::get(url(css))).await.unwrap();
        assert_eq!(second.response().unwrap().body, b"old");
        w.drain().await;

        let fresh_url = "https://fonts.googleapis.com/css2?family=Other";
        let third = w.handle(&Request::get(url(fresh_url))).await.unwrap();
        assert!(third.is_cached());
        assert_eq!(third.response().unwrap().body, b"new");
    }

    #[tokio::test]
    async fn activation_keeps_foreign_partitions() {
        let storage = Arc::new(MemoryStorage::new());
        for name in ["other-app-v1", "pavi-fast-core-v1", "pavi-fast-core-v0"] {
            storage.open(name).await.unwrap();
        }
        let fetcher = Arc::new(MapFetcher::default());
        let w = worker(&config("v1", &[]), storage.clone(), fetcher);

        let report = w.activate().await.unwrap();

        assert_eq!(report.evicted, vec!["pavi-fast-core-v0"]);
        assert_eq!(
            storage.partitions().await.unwrap(),
            vec!["other-app-v1", "pavi-fast-core-v1"]
        );
    }

    #[tokio::test]
    async fn partial_install_leaves_nothing_behind() {
        let storage = Arc::new(MemoryStorage::new());
        let fetcher = Arc::new(MapFetcher::default());
        for path in ["a", "b", "d", "e"] {
            fetcher.serve(&format!("https://app.test/{}", path), 200, path);
        }
        let w = worker(
            &config("v1", &["./a", "./b", "./c", "./d", "./e"]),
            storage.clone(),
            fetcher,
        );

        assert!(w.install().await.is_err());

        let core = w.cache().open_partition(PartitionRole::Core).await.unwrap();
        assert!(w.cache().keys(&core).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_version_replaces_old_on_activation() {
        let storage = Arc::new(MemoryStorage::new());
        let fetcher = Arc::new(MapFetcher::default());
        fetcher.serve("https://app.test/", 200, "v0 shell");
        let old = worker(&config("v0", &["./"]), storage.clone(), fetcher.clone());
        old.install().await.unwrap();
        old.activate().await.unwrap();

        fetcher.serve("https://app.test/", 200, "v1 shell");
        let new = worker(&config("v1", &["./"]), storage.clone(), fetcher.clone());
        new.clients().register(url("https://app.test/"), Some("v0"));
        new.install().await.unwrap();
        let report = new.activate().await.unwrap();

        assert_eq!(report.evicted, vec!["pavi-fast-core-v0"]);
        assert_eq!(report.claimed, 1);
        assert_eq!(storage.partitions().await.unwrap(), vec!["pavi-fast-core-v1"]);

        fetcher.go_offline();
        let outcome = new
            .handle(&Request::navigate(url("https://app.test/")))
            .await
            .unwrap();
        assert_eq!(outcome.response().unwrap().body, b"v1 shell");
    }
}
