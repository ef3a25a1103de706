// web_app/api/client.rs - Product backend abstraction
//
// Both backends speak HTTP through reqwest and share the status/error mapping
// below. `build_client` picks one from configuration and wraps it in the
// caching, retrying layer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use super::cached::{CachePolicy, CachedFetchClient};
use super::pocketbase::PocketBaseClient;
use super::rest::RestClient;
use crate::config::{Backend, Config};
use crate::web_app::error::FetchError;
use crate::web_app::model::{
    Comment, FilterState, NewComment, PageRequest, PagedResult, Product, ProductInput,
};
use crate::web_app::session::{Credentials, User};

#[async_trait]
pub trait ProductFetchClient: Send + Sync {
    fn backend(&self) -> Backend;

    /// One page of products matching `filters`
    async fn fetch_products(
        &self,
        filters: &FilterState,
        page: PageRequest,
    ) -> Result<PagedResult<Product>, FetchError>;

    /// A single product with its comments; `None` if it doesn't exist
    async fn get_product(&self, id: &str) -> Result<Option<Product>, FetchError>;

    /// Post a comment as the user owning `token`
    async fn post_comment(&self, comment: &NewComment, token: &str) -> Result<Comment, FetchError>;

    /// Exchange credentials for a user carrying a backend token
    async fn login(&self, credentials: &Credentials) -> Result<User, FetchError>;

    /// Add a product; the backend decides whether `token` may
    async fn create_product(&self, input: &ProductInput, token: &str) -> Result<Product, FetchError>;

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: &str,
    ) -> Result<Product, FetchError>;
}

pub type SharedClient = Arc<dyn ProductFetchClient>;

/// Backend client for `config`, behind the cache and retry policy
pub fn build_client(config: &Config) -> Result<SharedClient, FetchError> {
    let http = http_client(config.request_timeout())?;
    let inner: SharedClient = match config.backend {
        Backend::PocketBase => Arc::new(PocketBaseClient::new(http, &config.backend_url)?),
        Backend::Rest => Arc::new(RestClient::new(http, &config.backend_url)?),
    };
    info!("Using {} backend at {}", config.backend, config.backend_url);
    Ok(Arc::new(CachedFetchClient::new(inner, CachePolicy::from_config(config))))
}

pub fn http_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("nays-dreams/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))
}

pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    Url::parse(base_url.trim_end_matches('/'))
        .map_err(|e| FetchError::Validation(format!("invalid backend URL {base_url:?}: {e}")))
}

/// `base` with `segments` appended as escaped path segments
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::Validation(format!("backend URL {base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a non-2xx response into `FetchError::Server`, keeping the backend's
/// message when it sent one
pub(crate) async fn error_from_response(res: Response) -> FetchError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| body.trim().to_string());
    FetchError::Server { status, message }
}

pub(crate) async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, FetchError> {
    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }
    let body = res.text().await.map_err(map_reqwest_error)?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Like [`read_json`], but a 404 is `Ok(None)`
pub(crate) async fn read_optional_json<T: DeserializeOwned>(
    res: Response,
) -> Result<Option<T>, FetchError> {
    if res.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    read_json(res).await.map(Some)
}

pub(crate) fn validate_comment(comment: &NewComment) -> Result<(), FetchError> {
    comment
        .validate()
        .map_err(|e| FetchError::Validation(e.to_string()))
}

pub(crate) fn validate_credentials(credentials: &Credentials) -> Result<(), FetchError> {
    credentials
        .validate()
        .map_err(|e| FetchError::Validation(e.to_string()))
}

pub(crate) fn validate_product(input: &ProductInput) -> Result<(), FetchError> {
    input
        .validate()
        .map_err(|e| FetchError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_escapes_segments() {
        let base = parse_base_url("http://localhost:8090/").unwrap();
        let url = endpoint(&base, &["products", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8090/products/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = parse_base_url("http://host/api/v1").unwrap();
        let url = endpoint(&base, &["products"]).unwrap();
        assert_eq!(url.as_str(), "http://host/api/v1/products");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(parse_base_url("not a url"), Err(FetchError::Validation(_))));
    }

    #[test]
    fn test_validate_comment_maps_to_validation_error() {
        let comment = NewComment {
            product_id: "p1".to_string(),
            comment: String::new(),
            rating: 3,
        };
        assert!(matches!(validate_comment(&comment), Err(FetchError::Validation(_))));
    }

    #[test]
    fn test_validate_product_maps_to_validation_error() {
        let input = ProductInput {
            title: "Taza".to_string(),
            description: "Cerámica".to_string(),
            price: rust_decimal::Decimal::ZERO,
        };
        assert_eq!(
            validate_product(&input),
            Err(FetchError::Validation("price must be positive".to_string()))
        );
    }
}
