// web_app/api/mod.rs - Backend access for the server side
//
// HTTP clients for the product backends and the translation service, the
// caching/retrying wrapper, and the global slot the server functions use.

pub mod cached;
pub mod client;
pub mod pocketbase;
pub mod rest;
pub mod state;
pub mod translation;

pub use cached::{CachePolicy, CachedFetchClient};
pub use client::{build_client, http_client, ProductFetchClient, SharedClient};
pub use pocketbase::{build_filter, PocketBaseClient};
pub use rest::RestClient;
pub use translation::{CachedTranslator, MyMemoryTranslator, TranslationCache, Translator};
