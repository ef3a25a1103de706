// web_app/components/admin.rs - Catalogue management components
//
// - AdminOnly: renders its children for administrators only
// - ProductForm: title, description and price of a product

use leptos::prelude::*;

use super::common::{Button, ErrorDisplay};
use crate::web_app::app::AuthState;
use crate::web_app::model::ProductInput;
use crate::web_app::session::SessionError;

/// Children for administrators, a sign-in hint for everyone else
///
/// The user is restored after hydration, so the server always renders the
/// hint and the browser swaps in the content.
#[component]
pub fn AdminOnly(children: ChildrenFn) -> impl IntoView {
    let auth = use_context::<AuthState>();
    let access = move || match auth {
        Some(auth) => auth.require_admin().map(|_| ()),
        None => Err(SessionError::NotAuthenticated),
    };

    move || match access() {
        Ok(()) => children().into_any(),
        Err(SessionError::Forbidden) => view! {
            <ErrorDisplay error="Only administrators can manage products.".to_string() />
        }
        .into_any(),
        Err(_) => view! {
            <div class="bg-white rounded-2xl p-12 shadow-sm border border-gray-100 text-center">
                <p class="text-gray-600 text-lg mb-6">"Sign in as an administrator to continue."</p>
                <a href="/login" class="text-pink-600 hover:text-pink-700 font-medium underline">"Sign in"</a>
            </div>
        }
        .into_any(),
    }
}

/// Product editor; `on_submit` receives validated input
#[component]
pub fn ProductForm(
    /// Values to start from when editing
    #[prop(optional)]
    initial: Option<ProductInput>,
    on_submit: Callback<ProductInput>,
    #[prop(into)]
    submitting: Signal<bool>,
    /// Error reported by the backend
    #[prop(into)]
    error: Signal<Option<String>>,
    #[prop(default = "Save changes")]
    submit_label: &'static str,
) -> impl IntoView {
    let initial = initial.unwrap_or_default();
    let title = RwSignal::new(initial.title);
    let description = RwSignal::new(initial.description);
    let price = RwSignal::new(if initial.price.is_zero() {
        String::new()
    } else {
        initial.price.to_string()
    });
    let invalid = RwSignal::new(None::<String>);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match ProductInput::from_form(
            &title.get_untracked(),
            &description.get_untracked(),
            &price.get_untracked(),
        ) {
            Ok(input) => {
                invalid.set(None);
                on_submit.run(input);
            }
            Err(e) => invalid.set(Some(e.to_string())),
        }
    };

    let field_class = "w-full border border-pink-200 rounded-lg px-3 py-2 \
                       focus:ring-2 focus:ring-pink-100 focus:border-pink-400 outline-none";

    view! {
        <form on:submit=submit class="bg-white rounded-2xl p-8 shadow-sm border border-gray-100 space-y-6">
            <label class="block space-y-1">
                <span class="text-sm font-medium text-gray-700">"Title"</span>
                <input
                    type="text"
                    class=field_class
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                />
            </label>
            <label class="block space-y-1">
                <span class="text-sm font-medium text-gray-700">"Description"</span>
                <textarea
                    rows="5"
                    class=field_class
                    prop:value=move || description.get()
                    on:input=move |ev| description.set(event_target_value(&ev))
                ></textarea>
            </label>
            <label class="block space-y-1">
                <span class="text-sm font-medium text-gray-700">"Price"</span>
                <input
                    type="text"
                    inputmode="decimal"
                    placeholder="0.00"
                    class=field_class
                    prop:value=move || price.get()
                    on:input=move |ev| price.set(event_target_value(&ev))
                />
            </label>
            {move || {
                invalid
                    .get()
                    .or_else(|| error.get())
                    .map(|e| view! { <p class="text-sm text-red-600">{e}</p> })
            }}
            <div class="flex justify-end">
                <Button button_type="submit" disabled=submitting>
                    {move || if submitting.get() { "Saving..." } else { submit_label }}
                </Button>
            </div>
        </form>
    }
}
