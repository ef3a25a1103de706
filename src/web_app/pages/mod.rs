// web_app/pages/mod.rs - Page components module
//
// - ProductsPage: product discovery (search, price filter, pagination)
// - ProductDetailPage: one product with its reviews
// - LoginPage: sign-in
// - NewProductPage / EditProductPage: catalogue management for administrators

pub mod admin;
pub mod detail;
pub mod login;
pub mod products;

pub use admin::{EditProductPage, NewProductPage};
pub use detail::ProductDetailPage;
pub use login::LoginPage;
pub use products::ProductsPage;
