// web_app/components/common.rs - Reusable UI components
//
// Small, stateless components used throughout the storefront. They receive
// all data via props.

use leptos::prelude::*;
use rust_decimal::Decimal;

use crate::web_app::format::{format_currency, rating_label, star_fills};

/// Loading spinner component
///
/// Displays a centered spinner with optional message.
#[component]
pub fn Loading(
    /// Optional message to display below the spinner
    #[prop(default = "Loading...")]
    message: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center p-12" role="status">
            <div class="animate-spin rounded-full h-10 w-10 border-4 border-pink-100 border-t-pink-500"></div>
            <span class="mt-4 text-gray-500 font-medium animate-pulse">{message}</span>
        </div>
    }
}

/// Error display with an optional retry button
#[component]
pub fn ErrorDisplay(
    /// The error message to display
    error: String,
    #[prop(optional)]
    on_retry: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="bg-red-50 border border-red-200 rounded-xl p-6 flex items-start gap-4" role="alert">
            <div class="bg-red-100 p-2 rounded-full text-red-600">
                <span class="text-xl font-bold">"⚠"</span>
            </div>
            <div class="flex-1">
                <h3 class="text-red-800 font-bold mb-1">"Something went wrong"</h3>
                <p class="text-red-600 text-sm">{error}</p>
                {on_retry.map(|retry| view! {
                    <div class="mt-4">
                        <Button on_click=retry variant=ButtonVariant::Danger>"Try again"</Button>
                    </div>
                })}
            </div>
        </div>
    }
}

/// Shown when a listing has no products
#[component]
pub fn EmptyState(
    /// The active search term, if the user searched
    search_term: Option<String>,
    #[prop(optional)]
    on_clear: Option<Callback<()>>,
) -> impl IntoView {
    let message = match search_term {
        Some(term) => format!("No products match \"{term}\"."),
        None => "No products found.".to_string(),
    };

    view! {
        <div class="bg-white rounded-2xl p-12 shadow-sm border border-gray-100 text-center">
            <div class="text-5xl mb-4">"🛍"</div>
            <p class="text-gray-600 text-lg">{message}</p>
            {on_clear.map(|clear| view! {
                <div class="mt-6">
                    <Button on_click=clear variant=ButtonVariant::Link>"Clear filters"</Button>
                </div>
            })}
        </div>
    }
}

/// Formatted price
#[component]
pub fn PriceDisplay(
    price: Decimal,
    #[prop(default = "text-lg font-bold text-pink-600")]
    class: &'static str,
) -> impl IntoView {
    view! { <span class=class>{format_currency(Some(price))}</span> }
}

/// Five stars, each filled to its share of `rating`
#[component]
pub fn StarRating(
    rating: f64,
    /// Show the numeric rating next to the stars
    #[prop(default = false)]
    show_text: bool,
) -> impl IntoView {
    let stars = star_fills(rating)
        .into_iter()
        .map(|fill| {
            let width = format!("width: {}%", (fill * 100.0).round());
            view! {
                <span class="relative inline-block w-5 h-5 mr-0.5 text-gray-200">
                    "★"
                    <span class="absolute left-0 top-0 overflow-hidden text-pink-500" style=width>"★"</span>
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="flex items-center" aria-label=format!("Rated {} out of 5", rating_label(rating))>
            <div class="flex">{stars}</div>
            {show_text.then(|| view! {
                <span class="ml-2 text-sm font-medium text-pink-600">{rating_label(rating)}</span>
            })}
        </div>
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Danger,
    Link,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            Self::Primary => {
                "px-4 py-2 bg-pink-600 text-white rounded-lg hover:bg-pink-700 \
                 transition-colors disabled:bg-gray-400 disabled:cursor-not-allowed \
                 font-medium shadow-sm active:transform active:scale-95"
            }
            Self::Danger => {
                "px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700 \
                 transition-colors disabled:bg-gray-400 font-medium"
            }
            Self::Link => "text-pink-600 hover:text-pink-700 font-medium underline disabled:text-gray-400",
        }
    }
}

/// Button in one of the storefront styles
#[component]
pub fn Button(
    /// Button label text
    children: Children,
    /// Click handler
    #[prop(optional)]
    on_click: Option<Callback<()>>,
    /// Whether the button is disabled
    #[prop(into, default = Signal::stored(false))]
    disabled: Signal<bool>,
    /// Button type (submit, button, reset)
    #[prop(default = "button")]
    button_type: &'static str,
    #[prop(optional)]
    variant: ButtonVariant,
) -> impl IntoView {
    view! {
        <button
            type=button_type
            disabled=move || disabled.get()
            class=variant.class()
            on:click=move |_| {
                if let Some(handler) = on_click {
                    handler.run(());
                }
            }
        >
            {children()}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_variants_are_distinct() {
        assert_eq!(ButtonVariant::default(), ButtonVariant::Primary);
        assert!(ButtonVariant::Primary.class().contains("bg-pink-600"));
        assert!(ButtonVariant::Danger.class().contains("bg-red-600"));
        assert!(!ButtonVariant::Link.class().contains("bg-"));
    }
}
