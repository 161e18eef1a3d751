//! Integration tests for the person and product services

use backoffice_http::types::{
    PersonDraft, PersonFilters, PersonPatch, ProductDraft, ProductFilters, ProductPatch,
};
use backoffice_http::{ApiClient, ErrorKind, MemoryTokenStore, NoopNavigator, SessionManager, TokenStore};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    let store = Arc::new(MemoryTokenStore::new());
    store.set("access_token", "tok-123");
    ApiClient::builder()
        .base_url(server.uri())
        .session(Arc::new(SessionManager::new(store, Arc::new(NoopNavigator))))
        .build()
        .unwrap()
}

fn juan() -> serde_json::Value {
    json!({
        "id": 1,
        "first_name": "Juan",
        "last_name": "Pérez",
        "email": "juan@example.com",
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": "2024-01-15T10:30:00Z"
    })
}

fn laptop() -> serde_json::Value {
    json!({
        "id": 10,
        "name": "Laptop",
        "sku": "LAP-001",
        "price": "1299.99",
        "owner": 1,
        "owner_details": {
            "id": 1,
            "first_name": "Juan",
            "last_name": "Pérez",
            "email": "juan@example.com"
        }
    })
}

async fn query_of_last_request(server: &MockServer) -> Option<String> {
    let requests = server.received_requests().await.unwrap();
    requests.last().unwrap().url.query().map(str::to_string)
}

#[tokio::test]
async fn test_list_persons_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/persons/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 25,
            "next": "http://localhost:8000/api/v1/auth/persons/?page=2",
            "previous": null,
            "results": [juan()]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let filters = PersonFilters {
        search: Some("Juan".into()),
        email: Some(String::new()),
        page: Some(1),
        ..Default::default()
    };

    let page = client.list_persons(&filters).await.unwrap();

    assert_eq!(
        query_of_last_request(&server).await.as_deref(),
        Some("search=Juan&page=1")
    );
    assert_eq!(page.count, 25);
    assert_eq!(page.total_pages(10), 3);
    assert!(page.has_next());
    assert!(!page.has_previous());
    assert_eq!(page.results[0].full_name(), "Juan Pérez");
    assert!(page.results[0].created_at.is_some());
}

#[tokio::test]
async fn test_list_persons_without_filters_has_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/persons/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .list_persons(&PersonFilters::default())
        .await
        .unwrap();

    assert_eq!(query_of_last_request(&server).await, None);
    assert!(page.results.is_empty());
    assert_eq!(page.total_pages(10), 0);
}

#[tokio::test]
async fn test_person_crud() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/persons/"))
        .and(body_json(json!({
            "first_name": "Juan",
            "last_name": "Pérez",
            "email": "juan@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(juan()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/persons/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(juan()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/auth/persons/1/"))
        .and(body_json(json!({"email": "jp@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "first_name": "Juan",
            "last_name": "Pérez",
            "email": "jp@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/auth/persons/1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let created = client
        .create_person(&PersonDraft {
            first_name: "Juan".into(),
            last_name: "Pérez".into(),
            email: "juan@example.com".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let fetched = client.get_person(1).await.unwrap();
    assert_eq!(fetched, created);

    let updated = client
        .update_person(
            1,
            &PersonPatch {
                email: Some("jp@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "jp@example.com");

    client.delete_person(1).await.unwrap();
}

#[tokio::test]
async fn test_create_person_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/persons/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["Enter a valid email address."],
            "first_name": ["This field is required.", "Too short."]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_person(&PersonDraft::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.message(),
        "email: Enter a valid email address.\nfirst_name: This field is required., Too short."
    );
}

#[tokio::test]
async fn test_list_products_sends_zero_and_decimal_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products/"))
        .and(query_param("price_min", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1, "next": null, "previous": null, "results": [laptop()]
        })))
        .mount(&server)
        .await;

    let filters = ProductFilters {
        sku: Some("LAP".into()),
        price_min: Some(Decimal::ZERO),
        price_max: Some(Decimal::from_str("1500.50").unwrap()),
        q: Some(String::new()),
        page: Some(2),
        page_size: Some(20),
        ..Default::default()
    };

    let page = client(&server).list_products(&filters).await.unwrap();

    assert_eq!(
        query_of_last_request(&server).await.as_deref(),
        Some("sku=LAP&price_min=0&price_max=1500.50&page=2&page_size=20")
    );
    let product = &page.results[0];
    assert_eq!(product.price, Decimal::from_str("1299.99").unwrap());
    assert_eq!(product.owner, Some(1));
    assert_eq!(product.owner_details.as_ref().unwrap().last_name, "Pérez");
}

#[tokio::test]
async fn test_product_crud() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/products/"))
        .and(body_json(json!({
            "name": "Laptop",
            "sku": "LAP-001",
            "price": "1299.99",
            "owner": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(laptop()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products/10/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(laptop()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/products/10/"))
        .and(body_json(json!({"owner": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 10,
            "name": "Laptop",
            "sku": "LAP-001",
            "price": "1299.99",
            "owner": null,
            "owner_details": null
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/products/10/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);

    let created = client
        .create_product(&ProductDraft {
            name: "Laptop".into(),
            sku: "LAP-001".into(),
            price: Decimal::from_str("1299.99").unwrap(),
            owner: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 10);

    let fetched = client.get_product(10).await.unwrap();
    assert_eq!(fetched.sku, "LAP-001");

    let updated = client
        .update_product(
            10,
            &ProductPatch {
                owner: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.owner, None);
    assert!(updated.owner_details.is_none());

    client.delete_product(10).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_product() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/products/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let err = client(&server).delete_product(99).await.unwrap_err();
    assert_eq!(err.status(), 404);
    assert_eq!(err.message(), "Resource not found.");
}
