// ── Domain model ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product in canonical domain form.
///
/// `brand` and `model` are the facet attributes the server can filter
/// on; `name` is the field the client-side free-text search matches
/// against. Price stays a raw string -- formatting and checkout math are
/// presentation-layer concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub price: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Case-insensitive substring match of `term` against the product
    /// name. An empty term matches everything.
    pub fn name_matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> Product {
        Product {
            id: "1".into(),
            name: name.into(),
            brand: String::new(),
            model: String::new(),
            price: String::new(),
            description: String::new(),
            image: None,
            created_at: None,
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(product("Pro Max").name_matches("Pro"));
        assert!(product("proline").name_matches("Pro"));
        assert!(!product("Basic").name_matches("Pro"));
    }

    #[test]
    fn empty_term_matches_everything() {
        assert!(product("anything").name_matches(""));
    }
}
