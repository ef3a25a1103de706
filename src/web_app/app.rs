// web_app/app.rs - Root application component
//
// Sets up routing, the shared UI contexts (language, signed-in user)
// and the page chrome.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;

use crate::web_app::pages::{
    EditProductPage, LoginPage, NewProductPage, ProductDetailPage, ProductsPage,
};
use crate::web_app::session::{check_admin, SessionError, User};

/// Language the catalogue is shown in
pub const DEFAULT_LANGUAGE: &str = "es";

/// Languages offered by the switcher: (code, label)
pub const LANGUAGES: [(&str, &str); 2] = [("es", "Español"), ("en", "English")];

/// Display language selected in the header
#[derive(Clone, Copy)]
pub struct Language(pub RwSignal<String>);

impl Language {
    pub fn current() -> RwSignal<String> {
        use_context::<Language>()
            .map(|l| l.0)
            .unwrap_or_else(|| RwSignal::new(DEFAULT_LANGUAGE.to_string()))
    }
}

/// Signed-in user, restored from browser storage after hydration
#[derive(Clone, Copy)]
pub struct AuthState {
    pub user: RwSignal<Option<User>>,
}

impl AuthState {
    pub fn token(&self) -> Option<String> {
        self.user.with(|u| u.as_ref().and_then(|u| u.token.clone()))
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.with(Option::is_some)
    }

    pub fn is_admin(&self) -> bool {
        self.require_admin().is_ok()
    }

    /// The signed-in administrator; reactive
    pub fn require_admin(&self) -> Result<User, SessionError> {
        self.user.with(|u| check_admin(u.as_ref()).cloned())
    }

    /// Remember `user` in browser storage and show them as signed in
    pub fn sign_in(&self, user: User) -> Result<(), SessionError> {
        #[cfg(feature = "hydrate")]
        {
            use crate::web_app::session::{AuthSession, BrowserSessionStore};
            AuthSession::restore(BrowserSessionStore).login(user.clone())?;
        }
        self.user.set(Some(user));
        Ok(())
    }

    pub fn logout(&self) {
        #[cfg(feature = "hydrate")]
        {
            use crate::web_app::session::{AuthSession, BrowserSessionStore};
            if let Err(e) = AuthSession::restore(BrowserSessionStore).logout() {
                tracing::warn!("Failed to clear session: {}", e);
            }
        }
        self.user.set(None);
    }
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let language = Language(RwSignal::new(DEFAULT_LANGUAGE.to_string()));
    let auth = AuthState {
        user: RwSignal::new(None),
    };
    provide_context(language);
    provide_context(auth);

    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        use crate::web_app::session::{AuthSession, BrowserSessionStore};
        let session = AuthSession::restore(BrowserSessionStore);
        auth.user.set(session.user().cloned());
    });

    view! {
        <Title text="Nay's Dreams" />
        <Meta name="description" content="Personalized gifts and keepsakes by Nay's Dreams" />
        <Meta name="viewport" content="width=device-width, initial-scale=1" />

        <Stylesheet id="leptos" href="/pkg/nays_dreams.css" />

        <Router>
            <Header />
            <main class="min-h-screen bg-pink-50/40">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=ProductsPage />
                    <Route path=path!("/products") view=ProductsPage />
                    <Route path=path!("/products/:id") view=ProductDetailPage />
                    <Route path=path!("/products/:id/edit") view=EditProductPage />
                    <Route path=path!("/admin/products/new") view=NewProductPage />
                    <Route path=path!("/login") view=LoginPage />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn Header() -> impl IntoView {
    let language = Language::current();
    let auth = use_context::<AuthState>();

    view! {
        <header class="bg-white shadow-sm sticky top-0 z-40 border-b border-pink-100">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 h-16 flex items-center justify-between">
                <a href="/" class="flex items-center gap-2">
                    <span class="text-2xl">"🌙"</span>
                    <span class="text-xl font-bold bg-clip-text text-transparent bg-gradient-to-r from-pink-500 to-purple-600">
                        "Nay's Dreams"
                    </span>
                </a>
                <div class="flex items-center gap-4">
                    <select
                        aria-label="Language"
                        class="border border-gray-200 rounded-lg px-2 py-1 text-sm"
                        on:change=move |ev| language.set(event_target_value(&ev))
                        prop:value=move || language.get()
                    >
                        {LANGUAGES
                            .into_iter()
                            .map(|(code, label)| view! { <option value=code>{label}</option> })
                            .collect_view()}
                    </select>
                    {auth.map(|auth| move || match auth.user.get() {
                        Some(user) => view! {
                            <Show when=move || auth.is_admin()>
                                <a href="/admin/products/new" class="text-sm text-pink-600 hover:text-pink-700">
                                    "New product"
                                </a>
                            </Show>
                            <span class="text-sm text-gray-600">{user.username}</span>
                            <button
                                type="button"
                                class="text-sm text-pink-600 hover:text-pink-700"
                                on:click=move |_| auth.logout()
                            >
                                "Sign out"
                            </button>
                        }
                        .into_any(),
                        None => view! {
                            <a href="/login" class="text-sm text-pink-600 hover:text-pink-700 font-medium">
                                "Sign in"
                            </a>
                        }
                        .into_any(),
                    })}
                </div>
            </div>
        </header>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-pink-200 mb-4">"404"</h1>
                <p class="text-xl text-gray-600 mb-8">"Page not found"</p>
                <a
                    href="/products"
                    class="px-6 py-3 bg-pink-600 text-white rounded-lg hover:bg-pink-700 transition-colors"
                >
                    "Back to the shop"
                </a>
            </div>
        </div>
    }
}
