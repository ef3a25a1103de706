// web_app/api/state.rs - Process-wide backend handles
//
// The server binary installs the configured clients once at startup; server
// functions look them up here. Tests can swap in their own client.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::client::SharedClient;
use super::translation::{CachedTranslator, MyMemoryTranslator};
use crate::web_app::model::DiscoverySettings;

pub type SharedTranslator = Arc<CachedTranslator<MyMemoryTranslator>>;

/// Everything a server function may need besides its arguments
#[derive(Clone)]
pub struct Backends {
    pub products: SharedClient,
    pub translator: SharedTranslator,
    pub source_language: String,
    pub settings: DiscoverySettings,
}

static BACKENDS: OnceLock<Backends> = OnceLock::new();
static TEST_CLIENT_OVERRIDE: Mutex<Option<SharedClient>> = Mutex::new(None);

/// Install the global backends; later calls are ignored
pub fn init_backends(backends: Backends) {
    tracing::info!("Initializing global backends");
    if BACKENDS.set(backends).is_err() {
        tracing::warn!("Backends already initialized");
    }
}

/// Route product calls to `client` regardless of the global slot
pub fn set_test_client(client: SharedClient) {
    *TEST_CLIENT_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(client);
}

pub fn clear_test_client() {
    TEST_CLIENT_OVERRIDE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

pub fn get_client() -> Option<SharedClient> {
    {
        let guard = TEST_CLIENT_OVERRIDE
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = guard.as_ref() {
            return Some(Arc::clone(client));
        }
    }

    let client = BACKENDS.get().map(|b| Arc::clone(&b.products));
    if client.is_none() {
        tracing::warn!("Product client requested before initialization");
    }
    client
}

pub fn get_backends() -> Option<Backends> {
    BACKENDS.get().cloned()
}

/// Build the configured product client and translator
pub fn build_backends(config: &crate::config::Config) -> Result<Backends, crate::web_app::error::FetchError> {
    use super::client::{build_client, http_client};
    use super::translation::TranslationCache;

    let http = http_client(config.request_timeout())?;
    let translator = MyMemoryTranslator::new(http, &config.translation_url)?;
    let cache = TranslationCache::new(10_000, config.translation_cache_ttl());
    Ok(Backends {
        products: build_client(config)?,
        translator: Arc::new(CachedTranslator::new(translator, cache)),
        source_language: config.source_language.clone(),
        settings: config.discovery_settings(),
    })
}
