// ── Catalog controller ──
//
// Orchestrates the browsing pipeline: derives the cache key from sort +
// facet selections, triggers fetches through the query cache, then
// applies the client-only stages (free-text search, pagination) to the
// cached result. Holds the per-session view state and its reset rules.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use vetrina_api::{CatalogClient, ProductQuery, TransportConfig};

use crate::cache::{QueryCache, QueryState};
use crate::config::CatalogConfig;
use crate::error::{CoreError, ErrorInfo};
use crate::facets::{FacetObservation, FacetStore};
use crate::model::Product;
use crate::query::QueryKey;

/// Fixed size of one visible page.
pub const ITEMS_PER_PAGE: usize = 12;

// ── View types ───────────────────────────────────────────────────────

/// One visible window of the catalog after search filtering and slicing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<Product>,
    /// The requested page number (1-based), echoed back unclamped.
    pub page: usize,
    /// `ceil(total_items / ITEMS_PER_PAGE)`, floored at 1. Collaborators
    /// hide pagination controls when this is <= 1.
    pub total_pages: usize,
    /// Match count after search filtering, before slicing.
    pub total_items: usize,
}

/// The derived view handed to presentation collaborators.
///
/// A failed fetch never falls back to stale data: the error view is the
/// whole answer. Zero matches is a Ready view with empty items, not an
/// error.
#[derive(Debug, Clone)]
pub enum CatalogView {
    /// No settled result for the current key yet.
    Loading,
    /// The fetch failed; carries the normalized message.
    Failed(ErrorInfo),
    Ready(CatalogPage),
}

// ── Session view state ───────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ViewState {
    sort: String,
    search_term: String,
    page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: String::new(),
            search_term: String::new(),
            page: 1,
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Owns the HTTP client, the query cache,
/// the facet store, and the session view state; every mutation flows
/// through here so the change signal and the pagination-reset rule stay
/// consistent.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    client: CatalogClient,
    cache: QueryCache,
    facets: FacetStore,
    view: watch::Sender<ViewState>,
    version: watch::Sender<u64>,
}

impl Catalog {
    /// Create a catalog from configuration. Does not fetch -- call
    /// [`discover()`](Self::discover) and [`ensure()`](Self::ensure) to
    /// populate.
    pub fn new(config: &CatalogConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = CatalogClient::new(config.base_url.as_str(), &transport)?;
        Ok(Self::from_client(client))
    }

    /// Wrap a pre-built [`CatalogClient`].
    pub fn from_client(client: CatalogClient) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        let (version, _) = watch::channel(0u64);
        Self {
            inner: Arc::new(CatalogInner {
                client,
                cache: QueryCache::new(),
                facets: FacetStore::new(),
                view,
                version,
            }),
        }
    }

    // ── State setters (upward interface) ─────────────────────────────

    /// Set the logical sort order. Never resets the page.
    pub fn set_sort(&self, sort: impl Into<String>) {
        let sort = sort.into();
        self.inner.view.send_modify(|v| v.sort = sort);
        self.bump();
    }

    /// Set the free-text search term.
    ///
    /// Whenever the term actually changes, the pagination page snaps
    /// back to 1 before the next view computation.
    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        let mut changed = false;
        self.inner.view.send_modify(|v| {
            if v.search_term != term {
                v.search_term = term;
                v.page = 1;
                changed = true;
            }
        });
        if changed {
            self.bump();
        }
    }

    /// Set the pagination page (1-based). Values below 1 are treated as
    /// page 1; values past the last page are kept as-is and yield an
    /// empty window.
    pub fn set_page(&self, page: usize) {
        self.inner.view.send_modify(|v| v.page = page.max(1));
        self.bump();
    }

    /// Toggle a brand selection. Never resets the page.
    pub fn toggle_brand(&self, value: &str) {
        self.inner.facets.toggle_brand(value);
        self.bump();
    }

    /// Toggle a model selection. Never resets the page.
    pub fn toggle_model(&self, value: &str) {
        self.inner.facets.toggle_model(value);
        self.bump();
    }

    // ── State accessors ──────────────────────────────────────────────

    pub fn sort(&self) -> String {
        self.inner.view.borrow().sort.clone()
    }

    pub fn search_term(&self) -> String {
        self.inner.view.borrow().search_term.clone()
    }

    pub fn page(&self) -> usize {
        self.inner.view.borrow().page
    }

    pub fn known_brands(&self) -> Vec<String> {
        self.inner.facets.known_brands()
    }

    pub fn known_models(&self) -> Vec<String> {
        self.inner.facets.known_models()
    }

    pub fn selected_brands(&self) -> Vec<String> {
        self.inner.facets.selected_brands()
    }

    pub fn selected_models(&self) -> Vec<String> {
        self.inner.facets.selected_models()
    }

    /// Subscribe to change notifications. Consumers re-call
    /// [`view()`](Self::view) after each signal.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version.subscribe()
    }

    // ── Key derivation ───────────────────────────────────────────────

    /// Derive the cache key for the current sort + facet selections.
    ///
    /// Pure with respect to rendering: nothing is fetched or mutated.
    pub fn current_key(&self) -> QueryKey {
        let sort = self.inner.view.borrow().sort.clone();
        QueryKey::new(
            sort,
            self.inner.facets.selected_brands(),
            self.inner.facets.selected_models(),
        )
    }

    // ── Fetch orchestration ──────────────────────────────────────────

    /// Request-if-needed step for the current key.
    ///
    /// If no fetch has settled or started for the key, performs the
    /// outbound request and applies the result to the cache. Concurrent
    /// calls for the same key coalesce into a single network request;
    /// losers return immediately and observe Loading until the winner's
    /// completion fires the change signal.
    pub async fn ensure(&self) {
        let key = self.current_key();
        self.fetch_into_cache(&key).await;
    }

    /// Unfiltered discovery fetch, populating the facet universe.
    ///
    /// The response doubles as a valid cached result for the empty key.
    /// If that entry is already settled, the universe is re-derived from
    /// the cached data without a network round trip.
    pub async fn discover(&self) {
        let key = QueryKey::default();

        if let Some(QueryState::Ready(items)) = self.inner.cache.get(&key) {
            self.apply_observation(&items);
            return;
        }
        self.fetch_into_cache(&key).await;
    }

    /// Invalidate the current key and refetch it.
    pub async fn refresh(&self) {
        let key = self.current_key();
        self.inner.cache.invalidate(&key);
        self.bump();
        self.fetch_into_cache(&key).await;
    }

    async fn fetch_into_cache(&self, key: &QueryKey) {
        let Some(epoch) = self.inner.cache.begin(key) else {
            return;
        };

        let query = ProductQuery::from(key);
        let result = self
            .inner
            .client
            .list_products(&query)
            .await
            .map(|records| records.into_iter().map(Product::from).collect::<Vec<_>>());

        // Discovery side channel: the unfiltered response reports facet
        // values. Extraction is a pure scan applied here, not inside the
        // fetch or cache layers.
        if key.is_unfiltered() {
            if let Ok(products) = &result {
                self.apply_observation(products);
            }
        }

        self.inner.cache.complete(key, epoch, result);
        self.bump();
    }

    fn apply_observation(&self, products: &[Product]) {
        let observation = FacetObservation::scan(products);
        if !observation.is_empty() {
            debug!(
                brands = observation.brands.len(),
                models = observation.models.len(),
                "applying facet observation"
            );
            self.inner
                .facets
                .observe(observation.brands, observation.models);
        }
    }

    // ── Derived view ─────────────────────────────────────────────────

    /// Compute the visible page for the current state.
    ///
    /// Synchronous and side-effect free: reads the cache entry for the
    /// current key and applies search filtering plus the pagination
    /// window. Pages past the end yield an empty window (no clamping).
    pub fn view(&self) -> CatalogView {
        let state = self.inner.view.borrow().clone();
        let key = self.current_key();

        let items = match self.inner.cache.get(&key) {
            None | Some(QueryState::Idle | QueryState::Loading) => return CatalogView::Loading,
            Some(QueryState::Failed(info)) => return CatalogView::Failed(info),
            Some(QueryState::Ready(items)) => items,
        };

        let filtered: Vec<&Product> = items
            .iter()
            .filter(|p| p.name_matches(&state.search_term))
            .collect();

        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(ITEMS_PER_PAGE).max(1);

        let start = (state.page - 1) * ITEMS_PER_PAGE;
        let window = if start >= total_items {
            Vec::new()
        } else {
            let end = (start + ITEMS_PER_PAGE).min(total_items);
            filtered[start..end].iter().map(|p| (*p).clone()).collect()
        };

        CatalogView::Ready(CatalogPage {
            items: window,
            page: state.page,
            total_pages,
            total_items,
        })
    }

    // ── Single-item lookup ───────────────────────────────────────────

    /// Fetch one product by id. Shares the normalized-error contract
    /// with the listing path.
    pub async fn product(&self, id: &str) -> Result<Product, CoreError> {
        match self.inner.client.get_product(id).await {
            Ok(record) => Ok(record.into()),
            Err(err) if err.is_not_found() => Err(CoreError::ProductNotFound {
                identifier: id.to_owned(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn bump(&self) {
        self.inner.version.send_modify(|v| *v += 1);
    }
}
