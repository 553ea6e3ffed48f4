//! Query cache and derived-view pipeline between `vetrina-api` and UI
//! consumers.
//!
//! This crate owns the business logic and state for catalog browsing:
//!
//! - **[`Catalog`]** — Central facade. Holds the session view state
//!   (sort, search term, page), derives the cache key for the current
//!   filter combination, triggers fetches, and computes the visible page.
//!   [`Catalog::view()`] is synchronous; [`Catalog::ensure()`] is the
//!   explicit request-if-needed step.
//!
//! - **[`QueryCache`]** — One entry per distinct [`QueryKey`], with an
//!   atomic Loading claim so concurrent requests for the same filter
//!   combination collapse into a single network call. Built on `DashMap`
//!   plus `tokio::sync::watch` change signals.
//!
//! - **[`FacetStore`]** — The facet universe (grow-only) and current
//!   selections (toggle), populated by the unfiltered discovery fetch.
//!
//! - **[`ErrorInfo`]** — Display-safe normalization of every fetch
//!   failure; raw transport errors never cross this crate's boundary.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod convert;
pub mod error;
pub mod facets;
pub mod model;
pub mod query;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{QueryCache, QueryState};
pub use catalog::{Catalog, CatalogPage, CatalogView, ITEMS_PER_PAGE};
pub use config::CatalogConfig;
pub use error::{CoreError, ErrorInfo};
pub use facets::{FacetObservation, FacetSets, FacetStore};
pub use model::Product;
pub use query::QueryKey;
