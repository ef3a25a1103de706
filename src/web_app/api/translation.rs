// web_app/api/translation.rs - Product text translation
//
// Catalogue text is written in the store's source language and translated on
// demand through MyMemory. Translations are cached per (text, source, target)
// in an injected `TranslationCache`. A failed translation falls back to the
// untranslated text.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::client::{map_reqwest_error, parse_base_url, read_json};
use crate::web_app::error::FetchError;
use crate::web_app::model::Translation;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, FetchError>;
}

pub struct MyMemoryTranslator {
    http: Client,
    url: Url,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    #[serde(default)]
    response_status: Option<serde_json::Value>,
    #[serde(default)]
    response_details: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(http: Client, url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            url: parse_base_url(url)?,
        })
    }
}

// MyMemory reports quota and language errors in the body with HTTP 200
fn body_status(value: &Option<serde_json::Value>) -> Option<u16> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, FetchError> {
        let langpair = format!("{source}|{target}");
        let res = self
            .http
            .get(self.url.clone())
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: MyMemoryResponse = read_json(res).await?;

        if let Some(status) = body_status(&body.response_status) {
            if status != 200 {
                return Err(FetchError::Server {
                    status,
                    message: body.response_details.unwrap_or_default(),
                });
            }
        }
        body.response_data
            .and_then(|d| d.translated_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FetchError::Decode("translation missing from response".to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    source: String,
    target: String,
}

/// Memo of finished translations, bounded in size and age
#[derive(Clone)]
pub struct TranslationCache {
    entries: Cache<CacheKey, String>,
}

impl TranslationCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn key(text: &str, source: &str, target: &str) -> CacheKey {
        CacheKey {
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    pub async fn get(&self, text: &str, source: &str, target: &str) -> Option<String> {
        self.entries.get(&Self::key(text, source, target)).await
    }

    pub async fn insert(&self, text: &str, source: &str, target: &str, translated: String) {
        self.entries
            .insert(Self::key(text, source, target), translated)
            .await;
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(3600))
    }
}

pub struct CachedTranslator<T: Translator> {
    inner: T,
    cache: TranslationCache,
}

impl<T: Translator> CachedTranslator<T> {
    pub fn new(inner: T, cache: TranslationCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate `text`, never failing: errors come back alongside the
    /// original text
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Translation {
        if text.trim().is_empty() || target.is_empty() || source == target {
            return Translation::untouched(text);
        }
        if let Some(hit) = self.cache.get(text, source, target).await {
            debug!("Translation cache hit ({source}->{target})");
            return Translation {
                text: hit,
                error: None,
            };
        }
        match self.inner.translate(text, source, target).await {
            Ok(translated) => {
                self.cache
                    .insert(text, source, target, translated.clone())
                    .await;
                Translation {
                    text: translated,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Translation {source}->{target} failed: {e}");
                Translation {
                    text: text.to_string(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Upper {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Translator for Upper {
        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FetchError::Timeout)
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    #[tokio::test]
    async fn test_short_circuits() {
        let upper = Upper::default();
        let translator = CachedTranslator::new(upper.clone(), TranslationCache::default());

        assert_eq!(translator.translate("", "es", "en").await, Translation::untouched(""));
        assert_eq!(translator.translate("hola", "es", "es").await, Translation::untouched("hola"));
        assert_eq!(translator.translate("hola", "es", "").await, Translation::untouched("hola"));
        assert_eq!(upper.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translations_are_cached() {
        let upper = Upper::default();
        let translator = CachedTranslator::new(upper.clone(), TranslationCache::default());

        assert_eq!(translator.translate("taza", "es", "en").await.text, "TAZA");
        assert_eq!(translator.translate("taza", "es", "en").await.text, "TAZA");
        assert_eq!(upper.calls.load(Ordering::SeqCst), 1);

        translator.translate("taza", "es", "fr").await;
        assert_eq!(upper.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cache_is_shared_between_translators() {
        let cache = TranslationCache::default();
        cache.insert("vaso", "es", "en", "glass".to_string()).await;

        let translator = CachedTranslator::new(Upper::default(), cache.clone());
        assert_eq!(translator.translate("vaso", "es", "en").await.text, "glass");
    }

    #[tokio::test]
    async fn test_failure_returns_original_with_error() {
        let failing = Upper {
            fail: true,
            ..Upper::default()
        };
        let translator = CachedTranslator::new(failing, TranslationCache::default());

        let result = translator.translate("taza", "es", "en").await;
        assert_eq!(result.text, "taza");
        assert_eq!(result.error.as_deref(), Some("request timed out"));
        assert_eq!(translator.cache().get("taza", "es", "en").await, None);
    }

    #[test]
    fn test_body_status() {
        assert_eq!(body_status(&Some(serde_json::json!(200))), Some(200));
        assert_eq!(body_status(&Some(serde_json::json!("403"))), Some(403));
        assert_eq!(body_status(&None), None);
    }
}
