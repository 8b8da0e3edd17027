use arc_swap::ArcSwap;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::document::RemoteClientConfig;
use super::source::ConfigSource;
use super::BaseUrlResolver;

#[derive(Debug, Default)]
struct StoreState {
    config: Option<Arc<RemoteClientConfig>>,
    last_fetched: Option<Instant>,
}

/// Latest remote client configuration, refreshed at most once per `min_fetch_interval`
/// unless the source's cache is empty.
pub struct RemoteConfigStore {
    source: Arc<dyn ConfigSource>,
    min_fetch_interval: Duration,
    state: ArcSwap<StoreState>,
}

impl RemoteConfigStore {
    pub fn new(source: Arc<dyn ConfigSource>, min_fetch_interval: Duration) -> Self {
        Self {
            source,
            min_fetch_interval,
            state: ArcSwap::from_pointee(StoreState::default()),
        }
    }

    fn should_fetch(&self, last_fetched: Option<Instant>) -> bool {
        match last_fetched {
            Some(at) => at.elapsed() >= self.min_fetch_interval,
            None => true,
        }
    }

    /// Current configuration, refreshing from the remote source when due.
    pub async fn get_config(&self) -> Option<Arc<RemoteClientConfig>> {
        let cached = self.source.from_cache().await;
        let due = self.should_fetch(self.state.load().last_fetched);

        if cached.is_none() || due {
            debug!(source = self.source.name(), "refreshing api client config");
            if let Some(fresh) = self.source.from_remote().await {
                self.set_config(fresh);
            }
        }

        if let Some(cached) = cached {
            if self.state.load().config.is_none() {
                let seeded = Arc::new(cached);
                // A concurrent set_config may have landed; only fill an empty store.
                self.state.rcu(|current| {
                    if current.config.is_some() {
                        Arc::clone(current)
                    } else {
                        Arc::new(StoreState {
                            config: Some(seeded.clone()),
                            last_fetched: current.last_fetched,
                        })
                    }
                });
            }
        }
        self.current()
    }

    /// Replace the configuration and restart the fetch interval.
    pub fn set_config(&self, config: RemoteClientConfig) {
        self.state.store(Arc::new(StoreState {
            config: Some(Arc::new(config)),
            last_fetched: Some(Instant::now()),
        }));
    }

    /// Configuration as last stored, without touching the source.
    pub fn current(&self) -> Option<Arc<RemoteClientConfig>> {
        self.state.load().config.clone()
    }

    pub fn last_fetched(&self) -> Option<Instant> {
        self.state.load().last_fetched
    }
}

#[async_trait]
impl BaseUrlResolver for RemoteConfigStore {
    async fn base_url_for(&self, endpoint: &str) -> Option<String> {
        self.get_config().await?.base_url_for(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, Weak};

    struct CountingSource {
        cache: Mutex<Option<RemoteClientConfig>>,
        remote: Mutex<Option<RemoteClientConfig>>,
        remote_calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(cache: Option<RemoteClientConfig>, remote: Option<RemoteClientConfig>) -> Arc<Self> {
            Arc::new(Self {
                cache: Mutex::new(cache),
                remote: Mutex::new(remote),
                remote_calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.remote_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConfigSource for CountingSource {
        async fn from_cache(&self) -> Option<RemoteClientConfig> {
            self.cache.lock().unwrap().clone()
        }

        async fn from_remote(&self) -> Option<RemoteClientConfig> {
            self.remote_calls.fetch_add(1, Ordering::SeqCst);
            self.remote.lock().unwrap().clone()
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn cfg(base: &str) -> RemoteClientConfig {
        RemoteClientConfig::from_value(json!({"base_url": {"/something": base}})).unwrap()
    }

    #[tokio::test]
    async fn test_first_call_fetches_and_stores() {
        let source = CountingSource::new(None, Some(cfg("https://remote")));
        let store = RemoteConfigStore::new(source.clone(), Duration::from_secs(3600));

        assert_eq!(
            store.base_url_for("/something").await.as_deref(),
            Some("https://remote")
        );
        assert_eq!(source.calls(), 1);
        assert!(store.last_fetched().is_some());
    }

    #[tokio::test]
    async fn test_interval_limits_fetches_while_cache_is_warm() {
        let source = CountingSource::new(Some(cfg("https://cache")), Some(cfg("https://remote")));
        let store = RemoteConfigStore::new(source.clone(), Duration::from_secs(3600));

        store.get_config().await;
        store.get_config().await;
        store.get_config().await;
        assert_eq!(source.calls(), 1);
        assert_eq!(
            store.current().unwrap().base_url_for("/something").as_deref(),
            Some("https://remote")
        );
    }

    #[tokio::test]
    async fn test_empty_cache_always_fetches() {
        let source = CountingSource::new(None, Some(cfg("https://remote")));
        let store = RemoteConfigStore::new(source.clone(), Duration::from_secs(3600));

        store.get_config().await;
        store.get_config().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_zero_interval_fetches_every_time() {
        let source = CountingSource::new(Some(cfg("https://cache")), Some(cfg("https://remote")));
        let store = RemoteConfigStore::new(source.clone(), Duration::ZERO);

        store.get_config().await;
        store.get_config().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_config() {
        let source = CountingSource::new(None, Some(cfg("https://first")));
        let store = RemoteConfigStore::new(source.clone(), Duration::ZERO);
        store.get_config().await;

        *source.remote.lock().unwrap() = None;
        assert_eq!(
            store.base_url_for("/something").await.as_deref(),
            Some("https://first")
        );
    }

    #[tokio::test]
    async fn test_cache_seeds_empty_state() {
        let source = CountingSource::new(Some(cfg("https://cache")), None);
        let store = RemoteConfigStore::new(source.clone(), Duration::from_secs(3600));

        assert_eq!(
            store.base_url_for("/something").await.as_deref(),
            Some("https://cache")
        );
        assert!(store.last_fetched().is_none());
    }

    /// Cache holds an old config; a fresh one is stored while the fetch is in flight.
    struct ConcurrentUpdateSource {
        store: Mutex<Weak<RemoteConfigStore>>,
    }

    #[async_trait]
    impl ConfigSource for ConcurrentUpdateSource {
        async fn from_cache(&self) -> Option<RemoteClientConfig> {
            Some(cfg("https://stale-cache"))
        }

        async fn from_remote(&self) -> Option<RemoteClientConfig> {
            let store = self.store.lock().unwrap().upgrade();
            if let Some(store) = store {
                store.set_config(cfg("https://fresh"));
            }
            None
        }

        fn name(&self) -> &'static str {
            "concurrent"
        }
    }

    #[tokio::test]
    async fn test_cache_does_not_replace_concurrent_update() {
        let source = Arc::new(ConcurrentUpdateSource {
            store: Mutex::new(Weak::new()),
        });
        let store = Arc::new(RemoteConfigStore::new(source.clone(), Duration::ZERO));
        *source.store.lock().unwrap() = Arc::downgrade(&store);

        let config = store.get_config().await.unwrap();
        assert_eq!(config.base_url_for("/something").as_deref(), Some("https://fresh"));
        assert!(store.last_fetched().is_some());
    }

    #[tokio::test]
    async fn test_nothing_anywhere_is_none() {
        let source = CountingSource::new(None, None);
        let store = RemoteConfigStore::new(source, Duration::ZERO);
        assert!(store.get_config().await.is_none());
        assert!(store.base_url_for("/something").await.is_none());
    }
}
