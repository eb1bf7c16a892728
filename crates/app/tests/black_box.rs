use rust_decimal::Decimal;
use serde_json::json;

use storefront_app::AppServices;
use storefront_core::{CustomerId, DomainError, ProductId, ServiceError};
use storefront_customers::{CreateCustomer, Customer};
use storefront_infra::{AppConfig, Backend};
use storefront_orders::{CreateOrderRequest, RequestedProduct};
use storefront_products::{CreateProduct, Product, ProductsRepository};

async fn services() -> AppServices {
    // Default configuration selects the in-memory backend.
    let services = AppServices::from_config(&AppConfig::default()).await.unwrap();
    assert_eq!(services.backend(), Backend::InMemory);
    services
}

async fn customer(services: &AppServices) -> Customer {
    services
        .create_customer(CreateCustomer {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
        })
        .await
        .unwrap()
}

async fn product(services: &AppServices, name: &str, price: Decimal, quantity: i64) -> Product {
    services
        .create_product(CreateProduct {
            name: name.to_string(),
            price,
            quantity,
        })
        .await
        .unwrap()
}

async fn stock(services: &AppServices, id: ProductId) -> i64 {
    let store = services.in_memory_store().unwrap();
    store.find_all_by_id(&[id]).await.unwrap()[0].quantity
}

fn order_for(customer_id: CustomerId, lines: &[(ProductId, i64)]) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id,
        products: lines
            .iter()
            .map(|(id, quantity)| RequestedProduct {
                id: *id,
                quantity: *quantity,
            })
            .collect(),
    }
}

#[tokio::test]
async fn order_round_trip_through_app_services() {
    let services = services().await;
    let grace = customer(&services).await;
    let a = product(&services, "A", Decimal::new(10, 0), 5).await;

    let order = services
        .create_order(order_for(grace.id, &[(a.id, 3)]))
        .await
        .unwrap();

    assert_eq!(stock(&services, a.id).await, 2);

    let found = services.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(found, order);

    let body = serde_json::to_value(&found).unwrap();
    assert_eq!(body["customer"]["email"], json!("grace@example.com"));
    assert_eq!(
        body["items"],
        json!([{ "product_id": a.id.to_string(), "quantity": 3, "price": "10" }])
    );
}

#[tokio::test]
async fn rejected_order_maps_to_400_and_leaves_stock() {
    let services = services().await;
    let grace = customer(&services).await;
    let a = product(&services, "A", Decimal::new(10, 0), 5).await;

    let err = services
        .create_order(order_for(grace.id, &[(a.id, 10)]))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.as_domain().map(DomainError::message),
        Some(format!("The quantity: 5 is not available for id: {}", a.id).as_str())
    );
    assert_eq!(stock(&services, a.id).await, 5);
    assert_eq!(
        services.in_memory_store().unwrap().order_count().unwrap(),
        0
    );
}

#[tokio::test]
async fn second_order_sees_stock_left_by_first() {
    let services = services().await;
    let grace = customer(&services).await;
    let a = product(&services, "A", Decimal::new(250, 2), 4).await;

    services
        .create_order(order_for(grace.id, &[(a.id, 3)]))
        .await
        .unwrap();
    let err = services
        .create_order(order_for(grace.id, &[(a.id, 2)]))
        .await
        .unwrap_err();

    match err {
        ServiceError::Domain(DomainError::Validation(msg)) => {
            assert_eq!(msg, format!("The quantity: 1 is not available for id: {}", a.id));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let services = services().await;
    customer(&services).await;

    let err = services
        .create_customer(CreateCustomer {
            name: "Grace again".to_string(),
            email: "grace@example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 409);
}
