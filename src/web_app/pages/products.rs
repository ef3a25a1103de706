// web_app/pages/products.rs - Product discovery page
//
// Wires the search box, price filter and pagination to a
// `DiscoveryController` held in a signal. Every committed change alters the
// controller's fetch key; an effect watching the key starts the fetch, and
// the controller drops responses that arrive for an older key.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::web_app::components::*;
use crate::web_app::discovery::{DiscoveryController, DiscoveryView, FetchTicket};
use crate::web_app::model::{DiscoverySettings, PriceBounds};
use crate::web_app::server_fns::{discovery_settings, fetch_error, fetch_products};

/// Product listing; waits for the server's discovery settings first
#[component]
pub fn ProductsPage() -> impl IntoView {
    let settings = Resource::new(|| (), |_| async move {
        discovery_settings().await.unwrap_or_default()
    });

    view! {
        <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-10">
            <div class="mb-8">
                <h1 class="text-3xl font-bold text-gray-900">"Our products"</h1>
                <p class="text-gray-500 mt-1">"Handmade gifts, mugs and keepsakes"</p>
            </div>
            <Suspense fallback=|| view! { <Loading message="Loading products..." /> }>
                {move || settings.get().map(|settings| view! { <ProductListing settings=settings /> })}
            </Suspense>
        </div>
    }
}

#[component]
fn ProductListing(settings: DiscoverySettings) -> impl IntoView {
    let controller = RwSignal::new(DiscoveryController::new(settings.per_page));

    let run = move |ticket: Option<FetchTicket>| {
        let Some(ticket) = ticket else { return };
        spawn_local(async move {
            let outcome = fetch_products(ticket.filters, ticket.page)
                .await
                .map_err(fetch_error);
            controller.update(|c| {
                c.complete(&ticket.key, outcome);
            });
        });
    };

    // Fetch whenever the committed query changes
    let key = Memo::new(move |_| controller.with(|c| c.fetch_key()));
    Effect::new(move |_| {
        key.track();
        run(controller.try_update(|c| c.begin_fetch()).flatten());
    });

    let search_term = Memo::new(move |_| controller.with(|c| c.filters().search_term.clone()));
    let bounds = Memo::new(move |_| controller.with(|c| c.filters().price_bounds()));
    let resets = Memo::new(move |_| controller.with(|c| c.resets()));
    let current_page = Memo::new(move |_| controller.with(|c| c.page()));
    let total_pages = Memo::new(move |_| controller.with(|c| c.total_pages().unwrap_or(0)));
    let fetching = Memo::new(move |_| controller.with(|c| c.is_fetching()));
    let listing = Memo::new(move |_| controller.with(|c| c.view()));

    let on_search = Callback::new(move |term: String| {
        controller.update(|c| {
            c.commit_search(term);
        });
    });
    let on_price = Callback::new(move |bounds: PriceBounds| {
        controller.update(|c| {
            c.commit_price(bounds);
        });
    });
    let on_page = Callback::new(move |page: u32| {
        controller.update(|c| {
            c.set_page(page);
        });
    });
    let on_clear = Callback::new(move |_: ()| {
        controller.update(|c| {
            c.clear_filters();
        });
    });
    let on_retry = Callback::new(move |_: ()| {
        run(controller.try_update(|c| c.retry()).flatten());
    });

    view! {
        <div class="flex flex-col md:flex-row gap-4 mb-8">
            <SearchBox value=search_term on_commit=on_search delay_ms=settings.search_debounce_ms />
            <div class="md:w-72">
                <PriceFilter
                    bounds=bounds
                    on_commit=on_price
                    delay_ms=settings.price_debounce_ms
                    resets=resets
                />
            </div>
        </div>

        {move || match listing.get() {
            DiscoveryView::Loading => view! { <Loading message="Loading products..." /> }.into_any(),
            DiscoveryView::Failed { message, .. } => {
                view! { <ErrorDisplay error=message on_retry=on_retry /> }.into_any()
            }
            DiscoveryView::Empty { search_term } => {
                view! { <EmptyState search_term=search_term on_clear=on_clear /> }.into_any()
            }
            DiscoveryView::Loaded { products, total_items, refreshing, .. } => view! {
                <p class="text-sm text-gray-500 mb-4">{format!("{total_items} products")}</p>
                <ProductGrid products=products refreshing=Signal::stored(refreshing) />
            }
            .into_any(),
        }}

        <PaginationControls
            current_page=current_page
            total_pages=total_pages
            fetching=fetching
            on_page=on_page
        />
    }
}
