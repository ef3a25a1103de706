// web_app/components/search.rs - Discovery input components
//
// - SearchBox: free-text search with a debounced commit
// - PriceFilter: min/max price inputs sharing one debounce timer
// - PaginationControls: page window with previous/next
//
// The components hold the framework-independent input state from
// `discovery` in a `StoredValue`; timers run on the browser's setTimeout.

use std::time::Duration;

use leptos::prelude::*;

use crate::web_app::discovery::{
    can_go_next, can_go_previous, page_for_click, pagination_window, PageItem, PriceFilterInput,
    Scheduler, SearchInput, Task, DEFAULT_NEIGHBOURS,
};
use crate::web_app::model::PriceBounds;

/// `setTimeout`-backed scheduler for the hydrated client
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Option<TimeoutHandle>;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle {
        set_timeout_with_handle(task, delay)
            .map_err(|e| tracing::warn!("setTimeout failed: {:?}", e))
            .ok()
    }

    fn cancel(&self, handle: Self::Handle) {
        if let Some(handle) = handle {
            handle.clear();
        }
    }
}

/// Search box: echoes keystrokes, commits after the user pauses
#[component]
pub fn SearchBox(
    /// Committed term owned by the parent; changes here reset the box
    #[prop(into)]
    value: Signal<String>,
    on_commit: Callback<String>,
    #[prop(default = 300)]
    delay_ms: u64,
) -> impl IntoView {
    let text = RwSignal::new(value.get_untracked());
    let input = StoredValue::new(SearchInput::new(
        value.get_untracked(),
        BrowserScheduler,
        Duration::from_millis(delay_ms),
        move |term| on_commit.run(term),
    ));

    Effect::new(move |_| {
        let external = value.get();
        input.update_value(|state| state.sync_external(external));
        text.set(input.with_value(|state| state.text().to_string()));
    });

    on_cleanup(move || {
        input.try_with_value(|state| state.cancel());
    });

    view! {
        <div class="relative flex-1">
            <div class="absolute inset-y-0 left-0 pl-3 flex items-center pointer-events-none">
                <span class="text-gray-400">"🔍"</span>
            </div>
            <input
                type="search"
                placeholder="Search products..."
                aria-label="Search products"
                class="w-full pl-10 pr-4 py-3 border-2 border-gray-200 rounded-xl \
                       focus:ring-4 focus:ring-pink-100 focus:border-pink-500 \
                       outline-none text-lg transition-all shadow-sm"
                prop:value=move || text.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    text.set(value.clone());
                    input.update_value(|state| state.input(value));
                }
            />
        </div>
    }
}

/// Min/max price inputs
#[component]
pub fn PriceFilter(
    /// Committed bounds owned by the parent
    #[prop(into)]
    bounds: Signal<PriceBounds>,
    on_commit: Callback<PriceBounds>,
    #[prop(default = 300)]
    delay_ms: u64,
    /// Bumped by the parent on an explicit reset, even if `bounds` is unchanged
    #[prop(into, default = Signal::stored(0))]
    resets: Signal<u64>,
) -> impl IntoView {
    let filter = StoredValue::new(PriceFilterInput::new(
        bounds.get_untracked(),
        BrowserScheduler,
        Duration::from_millis(delay_ms),
        move |committed| on_commit.run(committed),
    ));
    let min_text = RwSignal::new(filter.with_value(|f| f.min_text().to_string()));
    let max_text = RwSignal::new(filter.with_value(|f| f.max_text().to_string()));

    Effect::new(move |_| {
        resets.track();
        let external = bounds.get();
        filter.update_value(|f| f.sync_external(external));
        filter.with_value(|f| {
            min_text.set(f.min_text().to_string());
            max_text.set(f.max_text().to_string());
        });
    });

    on_cleanup(move || {
        filter.try_with_value(|f| f.cancel());
    });

    let input_class = "w-full px-3 py-2 border border-gray-300 rounded-lg text-sm \
                       focus:ring-2 focus:ring-pink-100 focus:border-pink-500 outline-none";

    view! {
        <div class="flex items-center gap-2">
            <input
                type="number"
                min="0"
                step="0.01"
                placeholder="Min $"
                aria-label="Minimum price"
                class=input_class
                prop:value=move || min_text.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    min_text.set(value.clone());
                    filter.update_value(|f| f.set_min_text(value));
                }
            />
            <span class="text-gray-400">"–"</span>
            <input
                type="number"
                min="0"
                step="0.01"
                placeholder="Max $"
                aria-label="Maximum price"
                class=input_class
                prop:value=move || max_text.get()
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    max_text.set(value.clone());
                    filter.update_value(|f| f.set_max_text(value));
                }
            />
        </div>
    }
}

/// Page window with previous/next; renders nothing for a single page
#[component]
pub fn PaginationControls(
    #[prop(into)]
    current_page: Signal<u32>,
    #[prop(into)]
    total_pages: Signal<u32>,
    /// Navigation is locked while a page is loading
    #[prop(into)]
    fetching: Signal<bool>,
    on_page: Callback<u32>,
) -> impl IntoView {
    let window = Memo::new(move |_| {
        pagination_window(current_page.get(), total_pages.get(), DEFAULT_NEIGHBOURS)
    });

    let nav_class = "px-3 py-2 rounded-lg border border-gray-200 bg-white text-gray-700 \
                     hover:bg-pink-50 disabled:opacity-40 disabled:cursor-not-allowed";

    move || {
        window.get().map(|items| {
            let buttons = items
                .into_iter()
                .map(|item| match item {
                    PageItem::Page(page) => {
                        let active = move || current_page.get() == page;
                        view! {
                            <button
                                type="button"
                                class=move || if active() {
                                    "px-3 py-2 rounded-lg bg-pink-600 text-white font-semibold"
                                } else {
                                    "px-3 py-2 rounded-lg bg-white border border-gray-200 text-gray-700 hover:bg-pink-50"
                                }
                                aria-current=move || active().then_some("page")
                                disabled=move || fetching.get()
                                on:click=move |_| {
                                    if let Some(target) = page_for_click(item, total_pages.get_untracked()) {
                                        on_page.run(target);
                                    }
                                }
                            >
                                {page}
                            </button>
                        }
                        .into_any()
                    }
                    PageItem::EllipsisLeft | PageItem::EllipsisRight => {
                        view! { <span class="px-2 text-gray-400">"…"</span> }.into_any()
                    }
                })
                .collect_view();

            view! {
                <nav class="flex items-center justify-center gap-2 mt-8" aria-label="Pagination">
                    <button
                        type="button"
                        class=nav_class
                        disabled=move || !can_go_previous(current_page.get(), fetching.get())
                        on:click=move |_| on_page.run(current_page.get_untracked().saturating_sub(1))
                    >
                        "‹ Previous"
                    </button>
                    {buttons}
                    <button
                        type="button"
                        class=nav_class
                        disabled=move || !can_go_next(current_page.get(), total_pages.get(), fetching.get())
                        on:click=move |_| on_page.run(current_page.get_untracked() + 1)
                    >
                        "Next ›"
                    </button>
                </nav>
            }
        })
    }
}
