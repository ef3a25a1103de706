// web_app/pages/admin.rs - Catalogue management pages (administrators)
//
// Writes carry the administrator's backend token; the backend has the final
// say on whether it may write, and the server's product cache is cleared
// after every successful write.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_params_map;

use crate::web_app::app::AuthState;
use crate::web_app::components::*;
use crate::web_app::model::{Product, ProductInput};
use crate::web_app::server_fns::{create_product, fetch_error, get_product, update_product};

fn admin_token(auth: Option<AuthState>) -> Option<String> {
    auth?.require_admin().ok()?.token
}

const SESSION_EXPIRED: &str = "Your session has expired. Sign in again.";

#[component]
pub fn NewProductPage() -> impl IntoView {
    let auth = use_context::<AuthState>();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let created = RwSignal::new(None::<String>);

    let on_submit = Callback::new(move |input: ProductInput| {
        let Some(token) = admin_token(auth) else {
            error.set(Some(SESSION_EXPIRED.to_string()));
            return;
        };
        submitting.set(true);
        error.set(None);
        spawn_local(async move {
            match create_product(input, token).await.map_err(fetch_error) {
                Ok(product) => created.set(Some(format!("/products/{}", product.id))),
                Err(e) => error.set(Some(e.user_message())),
            }
            submitting.set(false);
        });
    });

    view! {
        <div class="max-w-2xl mx-auto px-4 py-10 space-y-6">
            <h1 class="text-3xl font-bold text-gray-900">"New product"</h1>
            <AdminOnly>
                <ProductForm
                    on_submit=on_submit
                    submitting=submitting
                    error=error
                    submit_label="Create product"
                />
            </AdminOnly>
            {move || created.get().map(|path| view! { <Redirect path=path /> })}
        </div>
    }
}

#[component]
pub fn EditProductPage() -> impl IntoView {
    let params = use_params_map();
    let id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));
    let product = Resource::new(
        move || id.get(),
        |id| async move { get_product(id).await.map_err(fetch_error) },
    );

    view! {
        <div class="max-w-2xl mx-auto px-4 py-10 space-y-6">
            <a href=move || format!("/products/{}", id.get()) class="text-pink-600 hover:text-pink-700 font-medium">
                "‹ Back to product"
            </a>
            <h1 class="text-3xl font-bold text-gray-900">"Edit product"</h1>
            <AdminOnly>
                <Transition fallback=|| view! { <Loading message="Loading product..." /> }>
                    {move || product.get().map(|result| match result {
                        Ok(Some(found)) => view! { <EditProductForm product=found /> }.into_any(),
                        Ok(None) => view! { <EmptyState search_term=None /> }.into_any(),
                        Err(e) => view! { <ErrorDisplay error=e.user_message() /> }.into_any(),
                    })}
                </Transition>
            </AdminOnly>
        </div>
    }
}

#[component]
fn EditProductForm(product: Product) -> impl IntoView {
    let auth = use_context::<AuthState>();
    let submitting = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let saved = RwSignal::new(None::<String>);
    let id = StoredValue::new(product.id.clone());

    let on_submit = Callback::new(move |input: ProductInput| {
        let Some(token) = admin_token(auth) else {
            error.set(Some(SESSION_EXPIRED.to_string()));
            return;
        };
        submitting.set(true);
        error.set(None);
        let id = id.get_value();
        spawn_local(async move {
            match update_product(id, input, token).await.map_err(fetch_error) {
                Ok(updated) => saved.set(Some(format!("/products/{}", updated.id))),
                Err(e) => error.set(Some(e.user_message())),
            }
            submitting.set(false);
        });
    });

    view! {
        <ProductForm
            initial=ProductInput::from(&product)
            on_submit=on_submit
            submitting=submitting
            error=error
        />
        {move || saved.get().map(|path| view! { <Redirect path=path /> })}
    }
}
