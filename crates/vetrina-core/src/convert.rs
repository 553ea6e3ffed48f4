// ── API-to-domain type conversions ──
//
// Bridges raw `vetrina_api` wire types into canonical `vetrina_core`
// domain types, and query keys back into wire query parameters.

use vetrina_api::{ProductQuery, ProductRecord};

use crate::model::Product;
use crate::query::QueryKey;

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            brand: record.brand.unwrap_or_default(),
            model: record.model.unwrap_or_default(),
            price: record.price.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            image: record.image,
            created_at: record.created_at,
        }
    }
}

impl From<&QueryKey> for ProductQuery {
    fn from(key: &QueryKey) -> Self {
        // BTreeSet iteration is sorted, so the comma-joined wire lists
        // are deterministic for equal key content.
        Self {
            sort: key.sort.clone(),
            brands: key.brands.iter().cloned().collect(),
            models: key.models.iter().cloned().collect(),
        }
    }
}
