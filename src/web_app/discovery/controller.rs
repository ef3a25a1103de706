// web_app/discovery/controller.rs - Product discovery state machine
//
// Owns the committed filters and the current page, decides when a fetch is
// due, and refuses to apply responses for anything but the latest request.
// No I/O happens here: the caller runs the fetch described by a
// `FetchTicket` and hands the outcome back to `complete`.

use tracing::debug;

use super::pagination::{pagination_window, PageItem, DEFAULT_NEIGHBOURS};
use crate::web_app::error::FetchError;
use crate::web_app::model::{
    FetchKey, FilterState, PageRequest, PagedResult, PriceBounds, Product, DEFAULT_PER_PAGE,
};

#[derive(Clone, Debug, PartialEq)]
pub enum FetchStatus {
    Idle,
    Fetching,
    Loaded,
    Failed(FetchError),
}

/// A fetch the caller should run
#[derive(Clone, Debug, PartialEq)]
pub struct FetchTicket {
    pub key: FetchKey,
    pub filters: FilterState,
    pub page: PageRequest,
}

/// What `complete` did with a response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// What the product list should render
#[derive(Clone, Debug, PartialEq)]
pub enum DiscoveryView {
    Loading,
    Failed {
        message: String,
        error: FetchError,
    },
    Empty {
        search_term: Option<String>,
    },
    Loaded {
        products: Vec<Product>,
        page: u32,
        total_pages: u32,
        total_items: u64,
        window: Option<Vec<PageItem>>,
        /// A newer request is in flight; these are the previous results
        refreshing: bool,
    },
}

#[derive(Clone, Debug)]
pub struct DiscoveryController {
    filters: FilterState,
    page: u32,
    per_page: u32,
    neighbours: u32,
    requested: Option<FetchKey>,
    status: FetchStatus,
    result: Option<PagedResult<Product>>,
    resets: u64,
}

impl Default for DiscoveryController {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl DiscoveryController {
    pub fn new(per_page: u32) -> Self {
        Self {
            filters: FilterState::default(),
            page: 1,
            per_page: per_page.max(1),
            neighbours: DEFAULT_NEIGHBOURS,
            requested: None,
            status: FetchStatus::Idle,
            result: None,
            resets: 0,
        }
    }

    pub fn with_neighbours(mut self, neighbours: u32) -> Self {
        self.neighbours = neighbours;
        self
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_fetching(&self) -> bool {
        self.status == FetchStatus::Fetching
    }

    pub fn result(&self) -> Option<&PagedResult<Product>> {
        self.result.as_ref()
    }

    /// Pages known from the last applied result
    pub fn total_pages(&self) -> Option<u32> {
        self.result.as_ref().map(|r| r.total_pages)
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// Key of the query the current state describes
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey::new(&self.filters, self.page_request())
    }

    /// Committed search term; returns whether anything changed
    ///
    /// Surrounding whitespace never reaches a backend, so it is not a change.
    pub fn commit_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into().trim().to_string();
        if term == self.filters.search_term {
            return false;
        }
        self.filters.search_term = term;
        self.page = 1;
        true
    }

    /// Committed price bounds; returns whether anything changed
    pub fn commit_price(&mut self, bounds: PriceBounds) -> bool {
        if bounds == self.filters.price_bounds() {
            return false;
        }
        self.filters.min_price = bounds.min_price;
        self.filters.max_price = bounds.max_price;
        self.page = 1;
        true
    }

    /// Number of explicit clears so far; inputs re-sync when it moves
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Explicit "clear filters"; returns whether the filters changed
    pub fn clear_filters(&mut self) -> bool {
        self.resets += 1;
        if self.filters.is_unfiltered() {
            return false;
        }
        self.filters = FilterState::default();
        self.page = 1;
        true
    }

    /// Explicit navigation; out-of-range and same-page requests are ignored
    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 || page == self.page {
            return false;
        }
        if let Some(total) = self.total_pages() {
            if page > total {
                return false;
            }
        }
        self.page = page;
        true
    }

    /// Start a fetch for the current state, unless one for the same key has
    /// already been requested (in flight, loaded, or failed)
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let key = self.fetch_key();
        if self.requested.as_ref() == Some(&key) {
            return None;
        }
        debug!("Fetching products for {}", key);
        self.requested = Some(key.clone());
        self.status = FetchStatus::Fetching;
        Some(FetchTicket {
            key,
            filters: self.filters.clone(),
            page: self.page_request(),
        })
    }

    /// Re-issue the current query after a failure
    pub fn retry(&mut self) -> Option<FetchTicket> {
        if !matches!(self.status, FetchStatus::Failed(_)) {
            return None;
        }
        self.requested = None;
        self.begin_fetch()
    }

    /// Apply the outcome of the fetch for `key`
    pub fn complete(
        &mut self,
        key: &FetchKey,
        outcome: Result<PagedResult<Product>, FetchError>,
    ) -> Completion {
        if self.requested.as_ref() != Some(key) {
            debug!("Discarding stale response for {}", key);
            return Completion::Stale;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result.normalized());
                self.status = FetchStatus::Loaded;
            }
            Err(err) => {
                debug!("Fetch for {} failed: {}", key, err);
                self.status = FetchStatus::Failed(err);
            }
        }
        Completion::Applied
    }

    pub fn view(&self) -> DiscoveryView {
        if let FetchStatus::Failed(error) = &self.status {
            return DiscoveryView::Failed {
                message: error.user_message(),
                error: error.clone(),
            };
        }
        let Some(result) = &self.result else {
            return DiscoveryView::Loading;
        };
        let refreshing = self.is_fetching();
        // Until the new result lands, describe the page that is on screen
        let page = if refreshing { result.page } else { self.page };
        if result.is_empty() {
            if refreshing {
                return DiscoveryView::Loading;
            }
            let term = self.filters.search_term.trim();
            return DiscoveryView::Empty {
                search_term: (!term.is_empty()).then(|| term.to_string()),
            };
        }
        DiscoveryView::Loaded {
            products: result.items.clone(),
            page,
            total_pages: result.total_pages,
            total_items: result.total_items,
            window: pagination_window(page, result.total_pages, self.neighbours),
            refreshing,
        }
    }
}
