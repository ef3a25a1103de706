// web_app/server_fns.rs - Leptos server function declarations
//
// The #[server] macro generates:
// - On server: The actual function implementation
// - On client: A stub that makes HTTP POST requests to the server
//
// IMPORTANT: This file must be compiled for BOTH ssr and hydrate features!
//
// Failures are sent as a JSON-encoded `FetchError` inside the server error
// message so the client can tell a 400 from a timeout.

use leptos::prelude::*;

use crate::web_app::error::FetchError;
use crate::web_app::model::*;
use crate::web_app::session::{Credentials, User};

#[cfg(feature = "ssr")]
fn client() -> Result<crate::web_app::api::SharedClient, ServerFnError> {
    use crate::web_app::api::{state, SharedClient};

    // First try to get from context (for testing or if manually set)
    if let Some(client) = use_context::<SharedClient>() {
        return Ok(client);
    }

    state::get_client().ok_or_else(|| {
        tracing::error!("Product client could not be resolved");
        wire_error(FetchError::Network("product backend not configured".to_string()))
    })
}

/// Server side: pack a `FetchError` for the trip to the browser
pub fn wire_error(err: FetchError) -> ServerFnError {
    ServerFnError::new(err.to_wire())
}

/// Client side: recover the `FetchError` a server function failed with
pub fn fetch_error(err: ServerFnError) -> FetchError {
    match err {
        ServerFnError::ServerError(message) => FetchError::from_wire(&message),
        other => FetchError::Network(other.to_string()),
    }
}

/// Page size and debounce delays the server was configured with
#[server(GetDiscoverySettings, "/api")]
pub async fn discovery_settings() -> Result<DiscoverySettings, ServerFnError> {
    use crate::web_app::api::state;

    if let Some(settings) = use_context::<DiscoverySettings>() {
        return Ok(settings);
    }
    Ok(state::get_backends()
        .map(|b| b.settings)
        .unwrap_or_default())
}

/// One page of products for the given filters
#[server(FetchProducts, "/api")]
pub async fn fetch_products(
    filters: FilterState,
    page: PageRequest,
) -> Result<PagedResult<Product>, ServerFnError> {
    use crate::web_app::api::ProductFetchClient;

    let key = FetchKey::new(&filters, page);
    tracing::info!("Product list request: {}", key);

    let result = client()?.fetch_products(&filters, page).await;
    match &result {
        Ok(res) => tracing::info!("Returning {} of {} products", res.items.len(), res.total_items),
        Err(e) => tracing::error!("Product list for {} failed: {}", key, e),
    }
    result.map_err(wire_error)
}

/// A single product with comments, `None` if it doesn't exist
#[server(GetProduct, "/api")]
pub async fn get_product(id: String) -> Result<Option<Product>, ServerFnError> {
    use crate::web_app::api::ProductFetchClient;

    let result = client()?.get_product(&id).await;
    if let Err(e) = &result {
        tracing::error!("Product {} failed to load: {}", id, e);
    }
    result.map_err(wire_error)
}

/// Post a comment on behalf of the signed-in user
#[server(PostComment, "/api")]
pub async fn post_comment(comment: NewComment, token: String) -> Result<Comment, ServerFnError> {
    use crate::web_app::api::ProductFetchClient;

    if token.trim().is_empty() {
        return Err(wire_error(FetchError::Validation(
            "sign in to leave a comment".to_string(),
        )));
    }
    comment
        .validate()
        .map_err(|e| wire_error(FetchError::Validation(e.to_string())))?;

    client()?
        .post_comment(&comment, &token)
        .await
        .map_err(|e| {
            tracing::error!("Comment on {} failed: {}", comment.product_id, e);
            wire_error(e)
        })
}

/// Sign in against the product backend
#[server(Login, "/api")]
pub async fn login(credentials: Credentials) -> Result<User, ServerFnError> {
    use crate::web_app::api::ProductFetchClient;

    credentials
        .validate()
        .map_err(|e| wire_error(FetchError::Validation(e.to_string())))?;

    client()?.login(&credentials).await.map_err(|e| {
        tracing::warn!("Sign-in for {} failed: {}", credentials.identity, e);
        wire_error(e)
    })
}

#[cfg(feature = "ssr")]
fn check_write(input: &ProductInput, token: &str) -> Result<(), ServerFnError> {
    if token.trim().is_empty() {
        return Err(wire_error(FetchError::Validation(
            "sign in as an administrator to edit products".to_string(),
        )));
    }
    input
        .validate()
        .map_err(|e| wire_error(FetchError::Validation(e.to_string())))
}

/// Add a product to the catalogue (administrators)
#[server(CreateProduct, "/api")]
pub async fn create_product(input: ProductInput, token: String) -> Result<Product, ServerFnError> {
    use crate::web_app::api::ProductFetchClient;

    check_write(&input, &token)?;
    client()?.create_product(&input, &token).await.map_err(|e| {
        tracing::error!("Creating product {:?} failed: {}", input.title, e);
        wire_error(e)
    })
}

/// Change a product's title, description and price (administrators)
#[server(UpdateProduct, "/api")]
pub async fn update_product(
    id: String,
    input: ProductInput,
    token: String,
) -> Result<Product, ServerFnError> {
    use crate::web_app::api::ProductFetchClient;

    check_write(&input, &token)?;
    client()?.update_product(&id, &input, &token).await.map_err(|e| {
        tracing::error!("Updating product {} failed: {}", id, e);
        wire_error(e)
    })
}

/// Translate catalogue text into `target`; never fails on service errors
#[server(TranslateText, "/api")]
pub async fn translate_text(text: String, target: String) -> Result<Translation, ServerFnError> {
    use crate::web_app::api::state;

    let Some(backends) = state::get_backends() else {
        return Ok(Translation::untouched(&text));
    };
    Ok(backends
        .translator
        .translate(&text, &backends.source_language, &target)
        .await)
}
