// Wire types for the catalog API.
//
// The service returns plain JSON arrays of camelCase product records --
// no envelope. Records are deserialized verbatim; domain normalization
// happens in `vetrina-core`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A catalog product as returned by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Server-side filter parameters for a catalog listing request.
///
/// Only the server-relevant filter subset lives here -- free-text search
/// and pagination are applied client-side and never reach the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Logical sort name, translated through [`sort_params`].
    pub sort: String,
    pub brands: Vec<String>,
    pub models: Vec<String>,
}

impl ProductQuery {
    /// `true` if no server-side filter is set (the discovery request shape).
    pub fn is_unfiltered(&self) -> bool {
        self.sort.is_empty() && self.brands.is_empty() && self.models.is_empty()
    }
}

/// Translate a logical sort name into its query parameters.
///
/// Fixed lookup table; unrecognized names map to `None` and contribute
/// nothing to the request.
pub fn sort_params(sort: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match sort {
        "old-to-new" => Some(&[("sortBy", "createdAt"), ("order", "asc")]),
        "new-to-old" => Some(&[("sortBy", "createdAt"), ("order", "desc")]),
        "price-asc" => Some(&[("sortBy", "price"), ("order", "asc")]),
        "price-desc" => Some(&[("sortBy", "price"), ("order", "desc")]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_table_covers_known_names() {
        assert_eq!(
            sort_params("price-asc"),
            Some(&[("sortBy", "price"), ("order", "asc")][..])
        );
        assert_eq!(
            sort_params("new-to-old"),
            Some(&[("sortBy", "createdAt"), ("order", "desc")][..])
        );
    }

    #[test]
    fn unknown_sort_contributes_nothing() {
        assert_eq!(sort_params(""), None);
        assert_eq!(sort_params("alphabetical"), None);
    }

    #[test]
    fn unfiltered_query_detection() {
        assert!(ProductQuery::default().is_unfiltered());

        let filtered = ProductQuery {
            brands: vec!["Apple".into()],
            ..ProductQuery::default()
        };
        assert!(!filtered.is_unfiltered());
    }
}
