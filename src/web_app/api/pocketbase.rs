// web_app/api/pocketbase.rs - PocketBase records API
//
// Products live in the `products` collection, comments in `comments` with a
// `product` relation. Filters use PocketBase's filter syntax; image fields hold
// bare file names that are resolved against the files endpoint. Accounts are
// records of the `users` auth collection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

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

const PRODUCTS: &str = "products";
const COMMENTS: &str = "comments";
const USERS: &str = "users";
const COMMENTS_EXPAND: &str = "comments_via_product";

pub struct PocketBaseClient {
    http: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    page: u32,
    per_page: u32,
    total_items: u64,
    items: Vec<ProductRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: String,
    collection_id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    image: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    expand: Option<ProductExpand>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductExpand {
    #[serde(default)]
    comments_via_product: Vec<CommentRecord>,
}

#[derive(Debug, Deserialize)]
struct CommentRecord {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    comment: String,
    rating: u8,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    product: &'a str,
    comment: &'a str,
    rating: u8,
}

#[derive(Serialize)]
struct AuthBody<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    record: UserRecord,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roles: Option<String>,
}

impl AuthResponse {
    fn into_user(self) -> User {
        let record = self.record;
        let username = [record.username, record.name, record.email]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default();
        User {
            id: record.id,
            username,
            role: Role::from_label(record.roles.as_deref()),
            token: Some(self.token),
        }
    }
}

/// PocketBase filter expression for `filters`, `None` when unfiltered
pub fn build_filter(filters: &FilterState) -> Option<String> {
    let mut clauses = Vec::new();
    let term = filters.search_term.trim();
    if !term.is_empty() {
        clauses.push(format!("title ~ '{}'", escape_literal(term)));
    }
    if let Some(min) = filters.min_price {
        clauses.push(format!("price >= {min}"));
    }
    if let Some(max) = filters.max_price {
        clauses.push(format!("price <= {max}"));
    }
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" && "))
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

// "2024-05-01 10:20:30.123Z"
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    DateTime::parse_from_rfc3339(&normalized)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| warn!("Unparseable PocketBase timestamp {:?}: {}", raw, e))
        .ok()
}

impl CommentRecord {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            username: self.username,
            email: self.email,
            comment: self.comment,
            rating: self.rating,
            created: self.created.as_deref().filter(|s| !s.is_empty()).and_then(parse_timestamp),
        }
    }
}

impl PocketBaseClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            http,
            base: parse_base_url(base_url)?,
        })
    }

    fn records_url(&self, collection: &str) -> Result<Url, FetchError> {
        endpoint(&self.base, &["api", "collections", collection, "records"])
    }

    /// `{base}/api/files/{collectionId}/{id}/{file}`
    pub fn file_url(&self, collection_id: &str, record_id: &str, file: &str) -> Option<String> {
        if file.is_empty() || collection_id.is_empty() {
            return None;
        }
        endpoint(&self.base, &["api", "files", collection_id, record_id, file])
            .ok()
            .map(String::from)
    }

    fn product_from_record(&self, record: ProductRecord) -> Product {
        let image = self.file_url(&record.collection_id, &record.id, &record.image);
        let comments: Vec<Comment> = record
            .expand
            .unwrap_or_default()
            .comments_via_product
            .into_iter()
            .map(CommentRecord::into_comment)
            .collect();
        Product {
            id: record.id,
            title: record.title,
            description: record.description,
            price: record.price,
            image,
            collection_id: Some(record.collection_id),
            rating: record.rating,
            comments,
        }
    }
}

#[async_trait]
impl ProductFetchClient for PocketBaseClient {
    fn backend(&self) -> Backend {
        Backend::PocketBase
    }

    async fn fetch_products(
        &self,
        filters: &FilterState,
        page: PageRequest,
    ) -> Result<PagedResult<Product>, FetchError> {
        let url = self.records_url(PRODUCTS)?;
        let mut query = vec![
            ("page", page.page.to_string()),
            ("perPage", page.per_page.to_string()),
        ];
        if let Some(filter) = build_filter(filters) {
            debug!("PocketBase filter: {}", filter);
            query.push(("filter", filter));
        }

        let res = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let list: ListResponse = read_json(res).await?;

        let items = list
            .items
            .into_iter()
            .map(|record| self.product_from_record(record))
            .collect();
        Ok(PagedResult::new(items, list.page, list.per_page, list.total_items))
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, FetchError> {
        let url = endpoint(&self.base, &["api", "collections", PRODUCTS, "records", id])?;
        let res = self
            .http
            .get(url)
            .query(&[("expand", COMMENTS_EXPAND)])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let record: Option<ProductRecord> = read_optional_json(res).await?;
        Ok(record.map(|r| self.product_from_record(r)))
    }

    async fn post_comment(&self, comment: &NewComment, token: &str) -> Result<Comment, FetchError> {
        validate_comment(comment)?;
        let res = self
            .http
            .post(self.records_url(COMMENTS)?)
            .bearer_auth(token)
            .json(&CommentBody {
                product: &comment.product_id,
                comment: comment.comment.trim(),
                rating: comment.rating,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let record: CommentRecord = read_json(res).await?;
        info!("Posted comment {} on product {}", record.id, comment.product_id);
        Ok(record.into_comment())
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, FetchError> {
        validate_credentials(credentials)?;
        let url = endpoint(&self.base, &["api", "collections", USERS, "auth-with-password"])?;
        let res = self
            .http
            .post(url)
            .json(&AuthBody {
                identity: credentials.identity.trim(),
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let auth: AuthResponse = read_json(res).await?;
        let user = auth.into_user();
        info!("Signed in {} ({:?})", user.username, user.role);
        Ok(user)
    }

    async fn create_product(&self, input: &ProductInput, token: &str) -> Result<Product, FetchError> {
        validate_product(input)?;
        let res = self
            .http
            .post(self.records_url(PRODUCTS)?)
            .bearer_auth(token)
            .json(input)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let record: ProductRecord = read_json(res).await?;
        info!("Created product {}", record.id);
        Ok(self.product_from_record(record))
    }

    async fn update_product(
        &self,
        id: &str,
        input: &ProductInput,
        token: &str,
    ) -> Result<Product, FetchError> {
        validate_product(input)?;
        let url = endpoint(&self.base, &["api", "collections", PRODUCTS, "records", id])?;
        let res = self
            .http
            .patch(url)
            .bearer_auth(token)
            .json(input)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let record: ProductRecord = read_json(res).await?;
        info!("Updated product {}", record.id);
        Ok(self.product_from_record(record))
    }
}
