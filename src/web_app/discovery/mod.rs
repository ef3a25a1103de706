// web_app/discovery/mod.rs - Product discovery logic
//
// Framework-independent: the Leptos components wrap these types, and the
// tests drive them directly.

pub mod controller;
pub mod debounce;
pub mod pagination;
pub mod price;
pub mod search;

pub use controller::{Completion, DiscoveryController, DiscoveryView, FetchStatus, FetchTicket};
#[cfg(feature = "native")]
pub use debounce::TokioScheduler;
pub use debounce::{Debouncer, Scheduler, Task};
pub use pagination::{
    can_go_next, can_go_previous, compute_window, page_for_click, pagination_window, PageItem,
    DEFAULT_NEIGHBOURS,
};
pub use price::{bound_text, parse_price, PriceFilterInput};
pub use search::SearchInput;
