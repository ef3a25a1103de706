// web_app/components/mod.rs - UI components module
//
// Structure:
// - common.rs: Reusable atomic components (Button, Loading, ErrorDisplay, ...)
// - admin.rs: Admin-only gate and the product form
// - search.rs: Discovery inputs (SearchBox, PriceFilter, PaginationControls)
// - product.rs: Product display components (ProductCard, ProductDetail, reviews)

pub mod admin;
pub mod common;
pub mod product;
pub mod search;

pub use admin::*;
pub use common::*;
pub use product::*;
pub use search::*;
