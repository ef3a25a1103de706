// web_app/pages/detail.rs - Product detail page

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::web_app::app::AuthState;
use crate::web_app::components::*;
use crate::web_app::model::Comment;
use crate::web_app::server_fns::{fetch_error, get_product};

#[component]
pub fn ProductDetailPage() -> impl IntoView {
    let params = use_params_map();
    let id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));

    let product = Resource::new(
        move || id.get(),
        |id| async move { get_product(id).await.map_err(fetch_error) },
    );

    // Comments come back with the product, so a new one means a reload
    let on_posted = Callback::new(move |comment: Comment| {
        tracing::debug!("Comment {} posted", comment.id);
        product.refetch();
    });
    let on_retry = Callback::new(move |_: ()| product.refetch());
    let auth = use_context::<AuthState>();
    let is_admin = move || auth.is_some_and(|auth| auth.is_admin());

    view! {
        <div class="max-w-6xl mx-auto px-4 sm:px-6 lg:px-8 py-10 space-y-10">
            <div class="flex items-center justify-between">
                <a href="/products" class="text-pink-600 hover:text-pink-700 font-medium">"‹ Back to products"</a>
                <Show when=is_admin>
                    <a
                        href=move || format!("/products/{}/edit", id.get())
                        class="px-4 py-2 border border-pink-200 text-pink-700 rounded-lg hover:bg-pink-50 font-medium"
                    >
                        "Edit"
                    </a>
                </Show>
            </div>
            <Transition fallback=|| view! { <Loading message="Loading product..." /> }>
                {move || product.get().map(|result| match result {
                    Ok(Some(found)) => {
                        let comments = found.comments.clone();
                        let product_id = found.id.clone();
                        view! {
                            <ProductDetail product=found />
                            <CommentsList comments=Signal::stored(comments) />
                            <CommentForm product_id=product_id on_posted=on_posted />
                        }
                        .into_any()
                    }
                    Ok(None) => view! {
                        <EmptyState search_term=None />
                        <p class="text-center text-gray-500">"This product is no longer available."</p>
                    }
                    .into_any(),
                    Err(e) => view! { <ErrorDisplay error=e.user_message() on_retry=on_retry /> }.into_any(),
                })}
            </Transition>
        </div>
    }
}
