#![allow(clippy::unwrap_used)]
// End-to-end tests for the `Catalog` pipeline using wiremock: cache
// de-duplication, discovery, error views, and the derived-view stages.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vetrina_core::{Catalog, CatalogConfig, CatalogView, CoreError};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Catalog) {
    let server = MockServer::start().await;
    let config = CatalogConfig::new(server.uri().parse().unwrap());
    let catalog = Catalog::new(&config).unwrap();
    (server, catalog)
}

fn phone(id: usize, name: &str, brand: &str, model: &str) -> serde_json::Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "brand": brand,
        "model": model,
        "price": "100",
        "image": "https://cdn.example.com/p.png",
        "createdAt": "2023-07-17T07:21:02.000Z"
    })
}

fn fleet(count: usize) -> serde_json::Value {
    let items: Vec<_> = (0..count)
        .map(|i| phone(i, &format!("Phone {i}"), "Acme", "A1"))
        .collect();
    json!(items)
}

// ── Fetch and view ──────────────────────────────────────────────────

#[tokio::test]
async fn ensure_populates_the_view() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            phone(1, "Pro Max", "Apple", "14 Pro Max"),
            phone(2, "Basic", "Nokia", "3310"),
        ])))
        .mount(&server)
        .await;

    assert!(matches!(catalog.view(), CatalogView::Loading));

    catalog.ensure().await;

    match catalog.view() {
        CatalogView::Ready(page) => {
            assert_eq!(page.total_items, 2);
            assert_eq!(page.total_pages, 1);
            assert_eq!(page.items[0].name, "Pro Max");
        }
        other => panic!("expected Ready view, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_ensures_issue_one_request() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fleet(3))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (a, b, c) = (catalog.clone(), catalog.clone(), catalog.clone());
    tokio::join!(a.ensure(), b.ensure(), c.ensure());

    assert!(matches!(catalog.view(), CatalogView::Ready(_)));
    // expect(1) is verified when the server drops.
}

#[tokio::test]
async fn settled_entries_are_served_from_cache() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fleet(2)))
        .expect(1)
        .mount(&server)
        .await;

    catalog.ensure().await;
    catalog.ensure().await;
    catalog.ensure().await;

    assert!(matches!(catalog.view(), CatalogView::Ready(_)));
}

#[tokio::test]
async fn filtered_fetch_carries_server_side_params() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("sortBy", "price"))
        .and(query_param("order", "asc"))
        .and(query_param("brand", "Apple,Samsung"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([phone(1, "Pro Max", "Apple", "14 Pro Max")])),
        )
        .mount(&server)
        .await;

    catalog.set_sort("price-asc");
    // Toggle order must not matter: the key serializes sorted.
    catalog.toggle_brand("Samsung");
    catalog.toggle_brand("Apple");
    catalog.ensure().await;

    match catalog.view() {
        CatalogView::Ready(page) => assert_eq!(page.total_items, 1),
        other => panic!("expected Ready view, got {other:?}"),
    }
}

// ── Error flows ─────────────────────────────────────────────────────

#[tokio::test]
async fn failed_key_does_not_poison_siblings() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("brand", "A"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "backend exploded" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("brand", "B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fleet(1)))
        .mount(&server)
        .await;

    catalog.set_sort("price-asc");
    catalog.toggle_brand("A");
    catalog.ensure().await;

    match catalog.view() {
        CatalogView::Failed(info) => {
            assert_eq!(info.message, "Error 500: backend exploded");
        }
        other => panic!("expected Failed view, got {other:?}"),
    }

    // A different brand selection is an independent entry: it can still
    // succeed even though its sibling failed.
    catalog.toggle_brand("A");
    catalog.toggle_brand("B");
    catalog.ensure().await;

    assert!(matches!(catalog.view(), CatalogView::Ready(_)));
}

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn discovery_populates_the_facet_universe() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param_is_missing("brand"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            phone(1, "Pro Max", "Apple", "14 Pro Max"),
            phone(2, "S23 Ultra", "Samsung", "S23"),
            phone(3, "Basic", "Nokia", "3310"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    catalog.discover().await;

    assert_eq!(catalog.known_brands(), vec!["Apple", "Nokia", "Samsung"]);
    assert_eq!(catalog.known_models(), vec!["14 Pro Max", "3310", "S23"]);

    // The discovery response doubles as the unfiltered browse result,
    // and a second discover re-derives the universe without refetching.
    assert!(matches!(catalog.view(), CatalogView::Ready(_)));
    catalog.discover().await;
}

#[tokio::test]
async fn pre_discovery_selection_survives() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param_is_missing("brand"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([phone(1, "Pro Max", "Apple", "14 Pro Max")])),
        )
        .mount(&server)
        .await;

    // Selection lands before the discovery fetch resolves.
    catalog.toggle_brand("Apple");
    catalog.discover().await;

    assert_eq!(catalog.selected_brands(), vec!["Apple"]);
    assert!(catalog.current_key().brands.contains("Apple"));
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_refetches_the_current_key() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fleet(2)))
        .expect(2)
        .mount(&server)
        .await;

    catalog.ensure().await;
    catalog.refresh().await;

    assert!(matches!(catalog.view(), CatalogView::Ready(_)));
}

// ── Pagination through the full pipeline ────────────────────────────

#[tokio::test]
async fn thirteen_items_window_one_on_page_two() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fleet(13)))
        .mount(&server)
        .await;

    catalog.ensure().await;
    catalog.set_page(2);

    match catalog.view() {
        CatalogView::Ready(page) => {
            assert_eq!(page.items.len(), 1);
            assert_eq!(page.total_pages, 2);
        }
        other => panic!("expected Ready view, got {other:?}"),
    }
}

#[tokio::test]
async fn search_resets_page_but_facets_do_not() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fleet(30)))
        .mount(&server)
        .await;

    catalog.ensure().await;
    catalog.set_page(3);

    catalog.toggle_brand("Acme");
    assert_eq!(catalog.page(), 3);

    catalog.set_search_term("Phone 1");
    assert_eq!(catalog.page(), 1);
}

// ── Single-item lookup ──────────────────────────────────────────────

#[tokio::test]
async fn product_lookup_round_trips() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(phone(7, "Pro Max", "Apple", "14 Pro Max")),
        )
        .mount(&server)
        .await;

    let product = catalog.product("7").await.unwrap();
    assert_eq!(product.name, "Pro Max");
    assert_eq!(product.brand, "Apple");
}

#[tokio::test]
async fn missing_product_maps_to_not_found() {
    let (server, catalog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let err = catalog.product("nope").await.unwrap_err();
    match err {
        CoreError::ProductNotFound { identifier } => assert_eq!(identifier, "nope"),
        other => panic!("expected ProductNotFound, got {other:?}"),
    }
}
