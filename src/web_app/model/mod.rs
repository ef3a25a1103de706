// web_app/model/mod.rs - Shared data models for client and server
//
// These structs are used throughout the application for type-safe
// communication between the UI, the server functions and the backend clients.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Products shown per page when nothing else is configured
pub const DEFAULT_PER_PAGE: u32 = 6;

/// Debounce delay for the search box and the price inputs
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Client-facing tunables, handed to components through Leptos context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    pub per_page: u32,
    pub search_debounce_ms: u64,
    pub price_debounce_ms: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            price_debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Committed filters driving the product list
///
/// `min_price <= max_price` is deliberately not checked here; the backend
/// simply returns nothing for an inverted range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl FilterState {
    pub fn price_bounds(&self) -> PriceBounds {
        PriceBounds {
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    /// True when no predicate would be sent to the backend
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_empty() && self.min_price.is_none() && self.max_price.is_none()
    }
}

/// The pair emitted by the price filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// One page of a listing (1-indexed)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn first(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PER_PAGE)
    }
}

/// Deterministic identity of a product query
///
/// Rendered as a canonical query string, so equal parameters always give
/// byte-equal keys. The search term is trimmed the way both backends trim
/// it. Used for cache lookups and stale-response comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchKey(String);

impl FetchKey {
    pub fn new(filters: &FilterState, page: PageRequest) -> Self {
        let mut key = format!(
            "page={}&perPage={}&search={}",
            page.page,
            page.per_page,
            escape_key_component(filters.search_term.trim())
        );
        if let Some(min) = filters.min_price {
            key.push_str(&format!("&minPrice={}", canonical_price(min)));
        }
        if let Some(max) = filters.max_price {
            key.push_str(&format!("&maxPrice={}", canonical_price(max)));
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// `&` and `=` inside the term must not be confused with separators
fn escape_key_component(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

// -0.0 and 0.0 are the same bound
fn canonical_price(value: f64) -> f64 {
    value + 0.0
}

/// Number of pages for a listing; never less than one
pub fn total_pages_for(total_items: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total_items.div_ceil(u64::from(per_page)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// A page of results as returned by either backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total_items: u64) -> Self {
        Self {
            items,
            page,
            per_page,
            total_items,
            total_pages: total_pages_for(total_items, per_page),
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request.page, request.per_page, 0)
    }

    /// Recompute `total_pages` from the item count
    ///
    /// PocketBase reports `totalPages: 0` for an empty collection.
    pub fn normalized(mut self) -> Self {
        self.total_pages = total_pages_for(self.total_items, self.per_page);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Product as consumed by the storefront
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Absolute image URL once a client has resolved it
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Product {
    /// Rating to display: the stored one, else the mean of the comments
    pub fn display_rating(&self) -> Option<f64> {
        self.rating.or_else(|| average_rating(&self.comments))
    }
}

/// Customer comment with a 1..=5 star rating
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub comment: String,
    pub rating: u8,
    #[serde(default, alias = "created_at")]
    pub created: Option<DateTime<Utc>>,
}

/// Mean rating across comments, `None` when there are none
pub fn average_rating(comments: &[Comment]) -> Option<f64> {
    if comments.is_empty() {
        return None;
    }
    let sum: u32 = comments.iter().map(|c| u32::from(c.rating)).sum();
    Some(f64::from(sum) / comments.len() as f64)
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CommentError {
    #[error("comment text is required")]
    EmptyComment,
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// Comment submitted from the detail page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub product_id: String,
    pub comment: String,
    pub rating: u8,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), CommentError> {
        if self.comment.trim().is_empty() {
            return Err(CommentError::EmptyComment);
        }
        if !(1..=5).contains(&self.rating) {
            return Err(CommentError::RatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProductInputError {
    #[error("title is required")]
    MissingTitle,
    #[error("description is required")]
    MissingDescription,
    #[error("price must be a number")]
    InvalidPrice,
    #[error("price must be positive")]
    NonPositivePrice,
}

/// Editable product fields, as submitted by an administrator
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl ProductInput {
    /// Build from form text, trimming the fields
    pub fn from_form(title: &str, description: &str, price: &str) -> Result<Self, ProductInputError> {
        let input = Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            price: parse_amount(price)?,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), ProductInputError> {
        if self.title.trim().is_empty() {
            return Err(ProductInputError::MissingTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ProductInputError::MissingDescription);
        }
        if self.price <= Decimal::ZERO {
            return Err(ProductInputError::NonPositivePrice);
        }
        Ok(())
    }
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
        }
    }
}

/// Strict money parsing for the admin form; "12.5" and "12,50" both work
pub fn parse_amount(raw: &str) -> Result<Decimal, ProductInputError> {
    let normalized = raw.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| ProductInputError::InvalidPrice)
}

/// Largest quantity the detail page lets a customer pick
pub const MAX_QUANTITY: u32 = 10;

/// Clamp a requested quantity into `1..=MAX_QUANTITY`
pub fn clamp_quantity(requested: i64) -> u32 {
    requested.clamp(1, i64::from(MAX_QUANTITY)) as u32
}

pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Text to display plus the reason it wasn't translated, if any
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub error: Option<String>,
}

impl Translation {
    pub fn untouched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(rating: u8) -> Comment {
        Comment {
            id: format!("c{rating}"),
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            comment: "Precioso".to_string(),
            rating,
            created: None,
        }
    }

    #[test]
    fn test_discovery_settings_default() {
        let settings = DiscoverySettings::default();
        assert_eq!(settings.per_page, 6);
        assert_eq!(settings.search_debounce_ms, 300);
        assert_eq!(settings.price_debounce_ms, 300);
    }

    #[test]
    fn test_total_pages_minimum_one() {
        assert_eq!(total_pages_for(0, 6), 1);
        assert_eq!(total_pages_for(1, 6), 1);
        assert_eq!(total_pages_for(6, 6), 1);
        assert_eq!(total_pages_for(7, 6), 2);
        assert_eq!(total_pages_for(18, 6), 3);
        assert_eq!(total_pages_for(5, 0), 1);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let result: PagedResult<Product> = PagedResult::empty(PageRequest::first(6));
        assert!(result.is_empty());
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn test_normalized_fixes_zero_total_pages() {
        let json = r#"{"items":[],"page":1,"perPage":6,"totalItems":0,"totalPages":0}"#;
        let result: PagedResult<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(result.total_pages, 0);
        assert_eq!(result.normalized().total_pages, 1);
    }

    #[test]
    fn test_fetch_key_is_deterministic() {
        let filters = FilterState {
            search_term: "cup".to_string(),
            min_price: Some(10.0),
            max_price: Some(50.0),
        };
        let a = FetchKey::new(&filters, PageRequest { page: 1, per_page: 6 });
        let b = FetchKey::new(&filters.clone(), PageRequest { page: 1, per_page: 6 });
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "page=1&perPage=6&search=cup&minPrice=10&maxPrice=50");
    }

    #[test]
    fn test_fetch_key_distinguishes_every_parameter() {
        let base = FilterState::default();
        let page = PageRequest::first(6);
        let key = FetchKey::new(&base, page);

        assert_ne!(key, FetchKey::new(&base, PageRequest { page: 2, per_page: 6 }));
        assert_ne!(key, FetchKey::new(&base, PageRequest { page: 1, per_page: 12 }));

        let with_min = FilterState { min_price: Some(0.0), ..base.clone() };
        let with_max = FilterState { max_price: Some(0.0), ..base.clone() };
        assert_ne!(FetchKey::new(&with_min, page), FetchKey::new(&with_max, page));
    }

    #[test]
    fn test_fetch_key_escapes_separators_in_search() {
        let tricky = FilterState {
            search_term: "a&minPrice=1".to_string(),
            ..FilterState::default()
        };
        let plain = FilterState {
            search_term: "a".to_string(),
            min_price: Some(1.0),
            max_price: None,
        };
        let page = PageRequest::first(6);
        assert_ne!(FetchKey::new(&tricky, page), FetchKey::new(&plain, page));
    }

    #[test]
    fn test_fetch_key_ignores_surrounding_whitespace() {
        let page = PageRequest::first(6);
        let padded = FilterState { search_term: " cup  ".to_string(), ..FilterState::default() };
        let plain = FilterState { search_term: "cup".to_string(), ..FilterState::default() };
        assert_eq!(FetchKey::new(&padded, page), FetchKey::new(&plain, page));
        assert_eq!(FetchKey::new(&padded, page).as_str(), "page=1&perPage=6&search=cup");
    }

    #[test]
    fn test_fetch_key_negative_zero() {
        let page = PageRequest::first(6);
        let pos = FilterState { min_price: Some(0.0), ..FilterState::default() };
        let neg = FilterState { min_price: Some(-0.0), ..FilterState::default() };
        assert_eq!(FetchKey::new(&pos, page), FetchKey::new(&neg, page));
    }

    #[test]
    fn test_product_accepts_both_image_shapes() {
        let pocketbase = r#"{"id":"p1","title":"Taza","description":"d","price":12.5,
            "image":"taza.png","collectionId":"col1"}"#;
        let rest = r#"{"id":"p2","title":"Mug","price":20,"image_url":"https://cdn/mug.png",
            "rating":4.5,"comments":[]}"#;

        let a: Product = serde_json::from_str(pocketbase).unwrap();
        let b: Product = serde_json::from_str(rest).unwrap();

        assert_eq!(a.image.as_deref(), Some("taza.png"));
        assert_eq!(a.collection_id.as_deref(), Some("col1"));
        assert_eq!(a.price, Decimal::new(125, 1));
        assert_eq!(b.image.as_deref(), Some("https://cdn/mug.png"));
        assert_eq!(b.description, "");
        assert_eq!(b.rating, Some(4.5));
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[comment(4), comment(5)]), Some(4.5));
    }

    #[test]
    fn test_display_rating_falls_back_to_comments() {
        let product = Product {
            id: "p1".to_string(),
            title: "Taza".to_string(),
            description: String::new(),
            price: Decimal::new(10, 0),
            image: None,
            collection_id: None,
            rating: None,
            comments: vec![comment(3), comment(5)],
        };
        assert_eq!(product.display_rating(), Some(4.0));

        let rated = Product { rating: Some(2.0), ..product };
        assert_eq!(rated.display_rating(), Some(2.0));
    }

    #[test]
    fn test_quantity_is_clamped() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(-3), 1);
        assert_eq!(clamp_quantity(4), 4);
        assert_eq!(clamp_quantity(11), 10);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Decimal::new(1250, 2), 3), Decimal::new(3750, 2));
    }

    #[test]
    fn test_product_input_from_form() {
        let input = ProductInput::from_form(" Taza ", "Cerámica blanca", "12,50").unwrap();
        assert_eq!(input.title, "Taza");
        assert_eq!(input.price, Decimal::new(1250, 2));

        assert_eq!(
            ProductInput::from_form("", "d", "1"),
            Err(ProductInputError::MissingTitle)
        );
        assert_eq!(
            ProductInput::from_form("Taza", "  ", "1"),
            Err(ProductInputError::MissingDescription)
        );
        assert_eq!(
            ProductInput::from_form("Taza", "d", "doce"),
            Err(ProductInputError::InvalidPrice)
        );
        assert_eq!(
            ProductInput::from_form("Taza", "d", "0"),
            Err(ProductInputError::NonPositivePrice)
        );
    }

    #[test]
    fn test_product_input_serializes_price_as_number() {
        let input = ProductInput {
            title: "Taza".to_string(),
            description: "d".to_string(),
            price: Decimal::new(155, 1),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["price"], serde_json::json!(15.5));
    }

    #[test]
    fn test_new_comment_validation() {
        let ok = NewComment {
            product_id: "p1".to_string(),
            comment: "Me encantó".to_string(),
            rating: 5,
        };
        assert_eq!(ok.validate(), Ok(()));

        let blank = NewComment { comment: "   ".to_string(), ..ok.clone() };
        assert_eq!(blank.validate(), Err(CommentError::EmptyComment));

        let zero = NewComment { rating: 0, ..ok.clone() };
        assert_eq!(zero.validate(), Err(CommentError::RatingOutOfRange(0)));

        let six = NewComment { rating: 6, ..ok };
        assert_eq!(six.validate(), Err(CommentError::RatingOutOfRange(6)));
    }
}
