//! Shared helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clipvote::{
    config::{DatabaseConfig, MetadataConfig},
    database::Database,
    errors::{ProviderError, ProviderResult},
    models::FetchedMetadata,
    services::Services,
    sources::MetadataProvider,
};

/// Fresh in-memory database with the schema applied
pub async fn create_test_database() -> Database {
    let database = Database::new(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: None,
    })
    .await
    .expect("Failed to create in-memory database");
    database.migrate().await.expect("Failed to run migrations");
    database
}

/// Services over a fresh database, with warm-up disabled unless asked for
pub async fn create_test_services(
    provider: Arc<ScriptedProvider>,
    warm_up_on_submit: bool,
) -> (Database, Services) {
    let database = create_test_database().await;
    let config = MetadataConfig {
        warm_up_on_submit,
        provider_timeout: Duration::from_millis(500),
        ..MetadataConfig::default()
    };
    let services = Services::new(&database, provider, &config);
    (database, services)
}

/// In-memory provider with a call counter and a failure switch
///
/// Unknown ids resolve to `Title <id>` by `Channel <id>`.
#[derive(Default)]
pub struct ScriptedProvider {
    titles: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_title(&self, external_id: &str, title: &str) {
        self.titles
            .lock()
            .unwrap()
            .insert(external_id.to_string(), title.to_string());
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for ScriptedProvider {
    async fn fetch(&self, external_id: &str) -> ProviderResult<FetchedMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Http {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }

        let title = self
            .titles
            .lock()
            .unwrap()
            .get(external_id)
            .cloned()
            .unwrap_or_else(|| format!("Title {external_id}"));

        Ok(FetchedMetadata {
            title,
            attribution: format!("Channel {external_id}"),
        })
    }
}

/// Poll until `condition` holds, panicking after two seconds
pub async fn wait_for(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 2s"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
