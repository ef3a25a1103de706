// web_app/components/product.rs - Product display components
//
// - ProductCard / ProductGrid: listing cards
// - ProductDetail: full product view with quantity selector
// - CommentsList / CommentForm: customer reviews
// - TranslatedText: catalogue text in the selected language

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::common::{Button, PriceDisplay, StarRating};
use crate::web_app::app::{AuthState, Language};
use crate::web_app::format::{format_currency, preview};
use crate::web_app::model::{
    clamp_quantity, line_total, Comment, NewComment, Product, MAX_QUANTITY,
};
use crate::web_app::server_fns::{fetch_error, post_comment, translate_text};

/// `text` translated into the selected language, or as-is until ready
#[component]
pub fn TranslatedText(text: String) -> impl IntoView {
    let language = Language::current();
    let original = text.clone();
    let fallback = text.clone();
    let translation = Resource::new(
        move || language.get(),
        move |target| {
            let text = text.clone();
            async move {
                match translate_text(text.clone(), target).await {
                    Ok(translation) => translation.text,
                    Err(_) => text,
                }
            }
        },
    );

    view! {
        <Transition fallback=move || fallback.clone()>
            {move || translation.get().unwrap_or_else(|| original.clone())}
        </Transition>
    }
}

/// Product card for the listing grid
#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let href = format!("/products/{}", product.id);
    let rating = product.display_rating();
    let description = preview(&product.description, 120);

    view! {
        <a
            href=href
            class="group bg-white rounded-xl shadow-sm hover:shadow-xl \
                   transition-all duration-300 border border-gray-100 \
                   flex flex-col h-full overflow-hidden transform hover:-translate-y-1"
        >
            {match product.image.clone() {
                Some(src) => view! {
                    <img src=src alt=product.title.clone() loading="lazy" class="h-48 w-full object-cover" />
                }.into_any(),
                None => view! {
                    <div class="h-48 bg-pink-50 flex items-center justify-center text-pink-200">
                        <span class="text-4xl">"🎁"</span>
                    </div>
                }.into_any(),
            }}

            <div class="p-5 flex flex-col flex-1">
                <div class="flex justify-between items-start mb-3">
                    {rating.map(|r| view! { <StarRating rating=r /> })}
                    <PriceDisplay price=product.price />
                </div>
                <h3 class="font-bold text-gray-900 mb-2 line-clamp-2 text-lg group-hover:text-pink-600 transition-colors">
                    <TranslatedText text=product.title.clone() />
                </h3>
                <p class="text-gray-600 text-sm line-clamp-3 flex-1">
                    <TranslatedText text=description />
                </p>
            </div>
        </a>
    }
}

/// Grid of product cards
#[component]
pub fn ProductGrid(
    products: Vec<Product>,
    /// Dim the grid while newer results load
    #[prop(into, default = Signal::stored(false))]
    refreshing: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class=move || if refreshing.get() {
            "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6 opacity-60 transition-opacity"
        } else {
            "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6 transition-opacity"
        }>
            {products
                .into_iter()
                .map(|product| view! { <ProductCard product=product /> })
                .collect_view()}
        </div>
    }
}

/// Full product view
#[component]
pub fn ProductDetail(product: Product) -> impl IntoView {
    let quantity = RwSignal::new(1_u32);
    let price = product.price;
    let total = move || format_currency(Some(line_total(price, quantity.get())));
    let rating = product.display_rating();
    let review_count = product.comments.len();

    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-10">
            {product.image.clone().map(|src| view! {
                <img src=src alt=product.title.clone() class="w-full rounded-2xl shadow-sm object-cover" />
            })}
            <div class="space-y-6">
                <h1 class="text-3xl font-bold text-gray-900">
                    <TranslatedText text=product.title.clone() />
                </h1>
                <div class="flex items-center gap-4">
                    <PriceDisplay price=price class="text-2xl font-bold text-pink-600" />
                    {rating.map(|r| view! {
                        <StarRating rating=r show_text=true />
                        <span class="text-sm text-gray-500">{format!("({review_count} reviews)")}</span>
                    })}
                </div>
                <p class="text-gray-700 leading-relaxed whitespace-pre-line">
                    <TranslatedText text=product.description.clone() />
                </p>

                <div class="flex items-center gap-4 pt-4 border-t border-gray-100">
                    <label class="text-sm font-medium text-gray-700" for="quantity">"Quantity"</label>
                    <select
                        id="quantity"
                        class="border border-gray-300 rounded-lg px-3 py-2"
                        prop:value=move || quantity.get().to_string()
                        on:change=move |ev| {
                            let requested = event_target_value(&ev).parse::<i64>().unwrap_or(1);
                            quantity.set(clamp_quantity(requested));
                        }
                    >
                        {(1..=MAX_QUANTITY)
                            .map(|n| view! { <option value=n.to_string()>{n}</option> })
                            .collect_view()}
                    </select>
                    <span class="text-gray-600">"Total: "</span>
                    <span class="font-semibold text-gray-900">{total}</span>
                </div>
            </div>
        </div>
    }
}

/// Customer reviews, newest first
#[component]
pub fn CommentsList(#[prop(into)] comments: Signal<Vec<Comment>>) -> impl IntoView {
    let sorted = move || {
        let mut comments = comments.get();
        comments.sort_by(|a, b| b.created.cmp(&a.created));
        comments
    };

    view! {
        <section class="space-y-4">
            <h2 class="text-xl font-bold text-gray-900">"Reviews"</h2>
            {move || {
                let comments = sorted();
                if comments.is_empty() {
                    view! { <p class="text-gray-500">"No reviews yet."</p> }.into_any()
                } else {
                    comments
                        .into_iter()
                        .map(|comment| {
                            let author = if comment.username.is_empty() {
                                "Customer".to_string()
                            } else {
                                comment.username.clone()
                            };
                            let date = comment.created.map(|d| d.format("%Y-%m-%d").to_string());
                            view! {
                                <article class="bg-white rounded-xl p-4 border border-gray-100">
                                    <div class="flex items-center justify-between mb-2">
                                        <span class="font-medium text-gray-800">{author}</span>
                                        <StarRating rating=f64::from(comment.rating) />
                                    </div>
                                    <p class="text-gray-700">{comment.comment.clone()}</p>
                                    {date.map(|d| view! { <p class="text-xs text-gray-400 mt-2">{d}</p> })}
                                </article>
                            }
                        })
                        .collect_view()
                        .into_any()
                }
            }}
        </section>
    }
}

/// Review form; signed-in users only
#[component]
pub fn CommentForm(product_id: String, on_posted: Callback<Comment>) -> impl IntoView {
    let auth = use_context::<AuthState>();
    let text = RwSignal::new(String::new());
    let rating = RwSignal::new(5_u8);
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);
    let product_id = StoredValue::new(product_id);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(token) = auth.and_then(|a| a.token()) else {
            error.set(Some("Sign in to leave a review.".to_string()));
            return;
        };
        let comment = NewComment {
            product_id: product_id.get_value(),
            comment: text.get_untracked(),
            rating: rating.get_untracked(),
        };
        if let Err(e) = comment.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        error.set(None);
        submitting.set(true);
        spawn_local(async move {
            match post_comment(comment, token).await {
                Ok(created) => {
                    text.set(String::new());
                    rating.set(5);
                    on_posted.run(created);
                }
                Err(e) => error.set(Some(fetch_error(e).user_message())),
            }
            submitting.set(false);
        });
    };

    let signed_in = move || auth.is_some_and(|a| a.is_signed_in());

    view! {
        <Show
            when=signed_in
            fallback=|| view! {
                <p class="text-gray-500">
                    <a href="/login" class="text-pink-600 hover:text-pink-700 font-medium underline">"Sign in"</a>
                    " to leave a review."
                </p>
            }
        >
            <form on:submit=on_submit class="bg-white rounded-xl p-6 border border-gray-100 space-y-4">
                <h3 class="font-semibold text-gray-900">"Write a review"</h3>
                <select
                    aria-label="Rating"
                    class="border border-gray-300 rounded-lg px-3 py-2"
                    prop:value=move || rating.get().to_string()
                    on:change=move |ev| rating.set(event_target_value(&ev).parse().unwrap_or(5))
                >
                    {(1..=5_u8)
                        .rev()
                        .map(|n| view! { <option value=n.to_string()>{"★".repeat(usize::from(n))}</option> })
                        .collect_view()}
                </select>
                <textarea
                    aria-label="Review"
                    rows="3"
                    class="w-full border border-gray-300 rounded-lg px-3 py-2 focus:ring-2 focus:ring-pink-100 outline-none"
                    prop:value=move || text.get()
                    on:input=move |ev| text.set(event_target_value(&ev))
                ></textarea>
                {move || error.get().map(|e| view! { <p class="text-sm text-red-600">{e}</p> })}
                <Button button_type="submit" disabled=submitting>
                    {move || if submitting.get() { "Posting..." } else { "Post review" }}
                </Button>
            </form>
        </Show>
    }
}
