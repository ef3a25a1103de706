// web_app/api/rest.rs - Plain REST product API
//
//   GET  {base}/products?page=&perPage=&search=&minPrice=&maxPrice=
//   GET  {base}/products/{id}
//   POST {base}/products/{id}/comments   (bearer token)
//   POST {base}/auth/login               {email, password} -> {token, user}
//   POST {base}/products                 (bearer token)
//   PUT  {base}/products/{id}            (bearer token)

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::client::{
    endpoint, map_reqwest_error, parse_base_url, read_json, read_optional_json, validate_comment,
    validate_credentials, validate_product, ProductFetchClient,
};
use crate::config::Backend;
use crate::web_app::error::FetchError;
use crate::web_app::model::{
    Comment, FilterState, NewComment, PageRequest, PagedResult, Product, ProductInput,
};
use crate::web_app::session::{Credentials, Role, User};

pub struct RestClient {
    http: Client,
    base: Url,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    comment: &'a str,
    rating: u8,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: AccountRecord,
}

#[derive(Deserialize)]
struct AccountRecord {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roles: Option<String>,
}

impl RestClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            base: parse_base_url(base_url)?,
        })
    }
}

/// Query string for a product listing; absent filters are omitted
pub fn list_query(filters: &FilterState, page: PageRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page.page.to_string()),
        ("perPage", page.per_page.to_string()),
    ];
    let term = filters.search_term.trim();
    if !term.is_empty() {
        query.push(("search", term.to_string()));
    }
    if let Some(min) = filters.min_price {
        query.push(("minPrice", min.to_string()));
    }
    if let Some(max) = filters.max_price {
        query.push(("maxPrice", max.to_string()));
    }
    query
}

#[async_trait]
impl ProductFetchClient for RestClient {
    fn backend(&self) -> Backend {
        Backend::Rest
    }

    async fn fetch_products(
        &self,
        filters: &FilterState,
        page: PageRequest,
    ) -> Result<PagedResult<Product>, FetchError> {
        let url = endpoint(&self.base, &["products"])?;
        debug!("GET {} {:?}", url, filters);
        let res = self
            .http
            .get(url)
            .query(&list_query(filters, page))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let result: PagedResult<Product> = read_json(res).await?;
        Ok(result.normalized())
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, FetchError> {
        let url = endpoint(&self.base, &["products", id])?;
        let res = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        read_optional_json(res).await
    }

    async fn post_comment(&self, comment: &NewComment, token: &str) -> Result<Comment, FetchError> {
        validate_comment(comment)?;
        let url = endpoint(&self.base, &["products", &comment.product_id, "comments"])?;
        let res = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&CommentBody {
                comment: comment.comment.trim(),
                rating: comment.rating,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: Comment = read_json(res).await?;
        info!("Posted comment {} on product {}", created.id, comment.product_id);
        Ok(created)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, FetchError> {
        validate_credentials(credentials)?;
        let url = endpoint(&self.base, &["auth", "login"])?;
        let res = self
            .http
            .post(url)
            .json(&LoginBody {
                email: credentials.identity.trim(),
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let LoginResponse { token, user } = read_json(res).await?;
        let username = if user.username.is_empty() { user.email } else { user.username };
        info!("Signed in {}", username);
        Ok(User {
            id: user.id,
            username,
            role: Role::from_label(user.roles.as_deref()),
            token: Some(token),
        })
    }

    async fn create_product(&self, input: &ProductInput, token: &str) -> Result<Product, FetchError> {
        validate_product(input)?;
        let url = endpoint(&self.base, &["products"])?;
        let res = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(input)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: Product = read_json(res).await?;
        info!("Created product {}", created.id);
        Ok(created)
    }

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: &str,
    ) -> Result<Product, FetchError> {
        validate_product(input)?;
        let url = endpoint(&self.base, &["products", id])?;
        let res = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(input)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let updated: Product = read_json(res).await?;
        info!("Updated product {}", updated.id);
        Ok(updated)
    }
}
