// ── Facet universe and selection ──
//
// Two set disciplines share this store and must not be conflated:
// known-sets only grow (discovery merges into them, nothing removes),
// selected-sets toggle. Selection is never validated against the known
// universe -- a value selected before discovery stays selected.

use std::collections::BTreeSet;

use tokio::sync::watch;
use tracing::debug;

use crate::model::Product;

/// Facet values extracted from one catalog response.
///
/// Pure data: the fetch path produces one of these and a coordinator
/// applies it to the store, so response transformation never mutates
/// shared state as a side effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetObservation {
    pub brands: BTreeSet<String>,
    pub models: BTreeSet<String>,
}

impl FacetObservation {
    /// Scan a product sequence for facet values. Empty attribute values
    /// are not facets and are skipped.
    pub fn scan(products: &[Product]) -> Self {
        let mut observation = Self::default();
        for product in products {
            if !product.brand.is_empty() {
                observation.brands.insert(product.brand.clone());
            }
            if !product.model.is_empty() {
                observation.models.insert(product.model.clone());
            }
        }
        observation
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty() && self.models.is_empty()
    }
}

/// Full facet state snapshot, as broadcast to subscribers.
#[derive(Debug, Clone, Default)]
pub struct FacetSets {
    pub brands_known: BTreeSet<String>,
    pub models_known: BTreeSet<String>,
    pub brands_selected: BTreeSet<String>,
    pub models_selected: BTreeSet<String>,
}

/// Store of known facet values and the caller-selected subset of each.
///
/// State lives inside a `watch` channel: every mutation goes through
/// `send_modify`, which notifies subscribers for free.
pub struct FacetStore {
    state: watch::Sender<FacetSets>,
}

impl FacetStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(FacetSets::default());
        Self { state }
    }

    /// Merge newly observed values into the known-sets.
    ///
    /// Additive, idempotent, and order-independent: re-observing is a
    /// no-op and known values never disappear.
    pub fn observe(
        &self,
        brands: impl IntoIterator<Item = String>,
        models: impl IntoIterator<Item = String>,
    ) {
        self.state.send_modify(|sets| {
            sets.brands_known.extend(brands);
            sets.models_known.extend(models);
        });
        debug!("facet universe updated");
    }

    /// Toggle a brand's membership in the selected-set. Returns `true`
    /// if the value is selected afterwards.
    pub fn toggle_brand(&self, value: &str) -> bool {
        let mut selected = false;
        self.state.send_modify(|sets| {
            if !sets.brands_selected.remove(value) {
                sets.brands_selected.insert(value.to_owned());
                selected = true;
            }
        });
        selected
    }

    /// Toggle a model's membership in the selected-set. Returns `true`
    /// if the value is selected afterwards.
    pub fn toggle_model(&self, value: &str) -> bool {
        let mut selected = false;
        self.state.send_modify(|sets| {
            if !sets.models_selected.remove(value) {
                sets.models_selected.insert(value.to_owned());
                selected = true;
            }
        });
        selected
    }

    // ── Snapshots ────────────────────────────────────────────────────
    //
    // Sorted Vec copies; BTreeSet iteration keeps them deterministic so
    // selection order never leaks into key construction.

    pub fn known_brands(&self) -> Vec<String> {
        self.state.borrow().brands_known.iter().cloned().collect()
    }

    pub fn known_models(&self) -> Vec<String> {
        self.state.borrow().models_known.iter().cloned().collect()
    }

    pub fn selected_brands(&self) -> Vec<String> {
        self.state.borrow().brands_selected.iter().cloned().collect()
    }

    pub fn selected_models(&self) -> Vec<String> {
        self.state.borrow().models_selected.iter().cloned().collect()
    }

    /// Subscribe to facet state changes (full snapshot per change).
    pub fn subscribe(&self) -> watch::Receiver<FacetSets> {
        self.state.subscribe()
    }
}

impl Default for FacetStore {
    fn default() -> Self {
        Self::new()
    }
}
