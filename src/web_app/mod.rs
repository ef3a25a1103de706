// web_app/mod.rs - Root module for the storefront web application
//
// Architecture:
// - model/: Shared data types (used by both client and server)
// - error.rs: Fetch error taxonomy shared across the server-function boundary
// - discovery/: Product discovery logic (debounce, inputs, pagination, controller)
// - format.rs: Currency formatting
// - session.rs: Auth session over an injectable session store
// - api/: Backend clients, caching and translation (native only)
// - server_fns.rs: Server function declarations (both client and server)
// - components/: Reusable UI components (both SSR and hydrate)
// - pages/: Page-level components (both SSR and hydrate)
// - app.rs: Root application component with routing (both SSR and hydrate)

pub mod model;
pub mod error;
pub mod discovery;
pub mod format;
pub mod session;

// Backend clients need reqwest/tokio and are never compiled to WASM
#[cfg(feature = "native")]
pub mod api;

// Server function declarations - must be available to both client and server
// The #[server] macro generates client stubs that call the server via HTTP
#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod server_fns;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod components;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod pages;

#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub mod app;

// Re-export main app component for convenience
#[cfg(any(feature = "ssr", feature = "hydrate"))]
pub use app::App;
