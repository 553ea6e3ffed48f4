// ── Query identity ──
//
// A QueryKey is the deterministic identity of one server-side filter
// combination. Cache entries are addressed by it, so two keys with the
// same content MUST compare equal no matter what order the user toggled
// facets in -- hence BTreeSet, not Vec.

use std::collections::BTreeSet;
use std::fmt;

/// Identity of a server-side query combination: sort + brand set + model set.
///
/// Free-text search and pagination are client-side concerns and are
/// deliberately absent -- they never change which cache slot a result
/// lands in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Logical sort name; empty means server default order.
    pub sort: String,
    pub brands: BTreeSet<String>,
    pub models: BTreeSet<String>,
}

impl QueryKey {
    /// Build a key from a sort name and facet selections.
    ///
    /// Selections are taken as-is: a value selected before discovery has
    /// reported it still participates in the key.
    pub fn new(
        sort: impl Into<String>,
        brands: impl IntoIterator<Item = String>,
        models: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            sort: sort.into(),
            brands: brands.into_iter().collect(),
            models: models.into_iter().collect(),
        }
    }

    /// `true` for the discovery request shape (no server-side filter).
    pub fn is_unfiltered(&self) -> bool {
        self.sort.is_empty() && self.brands.is_empty() && self.models.is_empty()
    }
}

/// Deterministic serialization: equal content always renders the same
/// string regardless of selection order. Used for logs and diagnostics.
impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let brands: Vec<&str> = self.brands.iter().map(String::as_str).collect();
        let models: Vec<&str> = self.models.iter().map(String::as_str).collect();
        write!(
            f,
            "sort={};brands={};models={}",
            self.sort,
            brands.join(","),
            models.join(",")
        )
    }
}
