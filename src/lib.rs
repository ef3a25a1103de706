// lib.rs - Root module for the Nay's Dreams storefront
//
// The storefront is a Leptos application. Everything under `web_app` that
// does not need a rendering runtime (the discovery controller, the debounce
// utility, pagination, formatting, sessions) compiles on every target so it
// can be tested natively without Leptos.

/// Environment-driven configuration (native targets only)
#[cfg(feature = "native")]
pub mod config;

/// The storefront application: models, discovery logic, backend clients and UI
pub mod web_app;

cfg_if::cfg_if! {
    if #[cfg(feature = "hydrate")] {
        use wasm_bindgen::prelude::wasm_bindgen;

        /// WASM entry point: hydrates the server-rendered page
        #[wasm_bindgen]
        pub fn hydrate() {
            console_error_panic_hook::set_once();
            leptos::mount::hydrate_body(web_app::App);
        }
    }
}
