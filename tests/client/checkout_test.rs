use nexlify::client::{complete_checkout, CheckoutRequest, ClientError, Storage};
use nexlify::modules::activity::schema::ActivityType;
use nexlify::modules::enrollments::schema::ItemType;

use super::support::{course_input, offline_client, product_input, register_request};

#[tokio::test]
async fn product_checkout_grants_the_purchase() {
    let (client, store) = offline_client();
    let product = store.create_product(&product_input("Planner", 12.5)).await.unwrap();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();

    let request = CheckoutRequest::for_product(&user, &product, "ngn").unwrap();
    assert_eq!(request.amount, 1250);
    assert_eq!(request.currency, "NGN");
    assert_eq!(request.email, "ada@example.com");

    let updated = complete_checkout(&client, &request, "T-1001").await.unwrap();

    assert_eq!(updated.purchased_products, vec![product.id.clone()]);
    assert_eq!(client.current_user().unwrap().purchased_products, vec![product.id.clone()]);
    assert!(store.get_user(&user.id).await.unwrap().owns_product(&product.id));

    let feed = client.activity().await.unwrap();
    let purchase = feed.iter().find(|e| e.log_type == ActivityType::Purchase).unwrap();
    assert!(purchase.description.contains("T-1001"));
}

#[tokio::test]
async fn course_checkout_enrolls() {
    let (client, store) = offline_client();
    let course = store.create_course(&course_input("Rust 101", 49.99)).await.unwrap();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();

    let request = CheckoutRequest::for_course(&user, &course, "USD").unwrap();
    assert_eq!(request.item.item_type, ItemType::Course);
    assert_eq!(request.amount, 4999);

    let updated = complete_checkout(&client, &request, "T-2002").await.unwrap();

    assert!(updated.is_enrolled(&course.id));
    assert_eq!(store.get_enrollments(&user.id).await.unwrap(), vec![course.id]);
}

#[tokio::test]
async fn checkout_requires_a_session() {
    let (client, store) = offline_client();
    let product = store.create_product(&product_input("Planner", 12.5)).await.unwrap();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();
    let request = CheckoutRequest::for_product(&user, &product, "USD").unwrap();
    client.logout().unwrap();

    let err = complete_checkout(&client, &request, "T-3003").await.unwrap_err();

    assert_eq!(err, ClientError::sign_in_required());
    assert!(store.get_user(&user.id).await.unwrap().purchased_products.is_empty());
}

#[tokio::test]
async fn checkout_for_a_deleted_item_fails() {
    let (client, store) = offline_client();
    let product = store.create_product(&product_input("Planner", 12.5)).await.unwrap();
    let user = client.register(&register_request("ada@example.com")).await.unwrap();
    let request = CheckoutRequest::for_product(&user, &product, "USD").unwrap();
    store.delete_product(&product.id).await.unwrap();

    let err = complete_checkout(&client, &request, "T-4004").await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert!(client.current_user().unwrap().purchased_products.is_empty());
}
