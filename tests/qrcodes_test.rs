use std::collections::VecDeque;
use std::sync::Arc;

use serde_json::{json, Value};
use shop_admin::db::{self, InvalidQrCode, NewQrCode};
use shop_admin::error::{AdminError, GraphQlError};
use shop_admin::model::QrDestination;
use shop_admin::qrcodes;
use shop_admin::shopify::AdminApi;
use tokio::sync::Mutex;

const SHOP: &str = "snow-shop.myshopify.com";

async fn setup_pool() -> db::Pool {
    let pool = db::init_pool("sqlite::memory:").await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

#[derive(Clone, Default)]
struct RecordingAdmin {
    responses: Arc<Mutex<VecDeque<Result<Value, AdminError>>>>,
    calls: Arc<Mutex<Vec<Option<Value>>>>,
}

impl RecordingAdmin {
    fn with_responses(responses: Vec<Result<Value, AdminError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Default::default()
        }
    }

    async fn calls(&self) -> Vec<Option<Value>> {
        self.calls.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl AdminApi for RecordingAdmin {
    async fn graphql(&self, _query: &str, variables: Option<Value>) -> Result<Value, AdminError> {
        self.calls.lock().await.push(variables);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(AdminError::UpstreamRequest("no queued response".into())))
    }
}

fn new_qr(title: &str, product: u64) -> NewQrCode {
    NewQrCode {
        title: title.into(),
        product_id: format!("gid://shopify/Product/{product}"),
        product_handle: format!("board-{product}"),
        product_variant_id: format!("gid://shopify/ProductVariant/{product}0"),
        destination: QrDestination::Product,
    }
}

#[tokio::test]
async fn empty_store_makes_no_upstream_calls() {
    let pool = setup_pool().await;
    let admin = RecordingAdmin::default();

    let records = qrcodes::get_qr_codes(&pool, &admin, SHOP).await.unwrap();

    assert!(records.is_empty());
    assert!(admin.calls().await.is_empty());
}

#[tokio::test]
async fn qr_codes_are_supplemented_newest_first() {
    let pool = setup_pool().await;
    let older = db::insert_qr_code(&pool, SHOP, &new_qr("Winter launch", 1))
        .await
        .unwrap();
    let newer = db::insert_qr_code(&pool, SHOP, &new_qr("A very long spring campaign title", 2))
        .await
        .unwrap();
    db::insert_qr_code(&pool, "other.myshopify.com", &new_qr("Elsewhere", 3))
        .await
        .unwrap();

    let admin = RecordingAdmin::with_responses(vec![
        Ok(json!({
            "data": {
                "product": {
                    "title": "Green Snowboard",
                    "images": { "nodes": [{ "url": "https://cdn.shopify.com/green.png", "altText": null }] }
                }
            }
        })),
        Ok(json!({ "data": { "product": null } })),
    ]);

    let records = qrcodes::get_qr_codes(&pool, &admin, SHOP).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, newer);
    assert_eq!(records[0].title, "A very long spring campai…");
    assert_eq!(records[0].product_title, "Green Snowboard");
    assert!(!records[0].product_deleted);
    assert_eq!(
        records[0].product_image.as_deref(),
        Some("https://cdn.shopify.com/green.png")
    );

    assert_eq!(records[1].id, older);
    assert!(records[1].product_deleted);
    assert_eq!(records[1].product_title, "");

    let calls = admin.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].as_ref().unwrap()["id"], "gid://shopify/Product/2");
    assert_eq!(calls[1].as_ref().unwrap()["id"], "gid://shopify/Product/1");
}

#[tokio::test]
async fn upstream_errors_propagate_unmodified() {
    let pool = setup_pool().await;
    db::insert_qr_code(&pool, SHOP, &new_qr("Winter launch", 1))
        .await
        .unwrap();
    let admin = RecordingAdmin::with_responses(vec![Err(AdminError::UpstreamApi(vec![
        GraphQlError::new("Throttled"),
    ]))]);

    let err = qrcodes::get_qr_codes(&pool, &admin, SHOP).await.unwrap_err();

    match err.downcast_ref::<AdminError>() {
        Some(AdminError::UpstreamApi(errors)) => assert_eq!(errors[0].message, "Throttled"),
        other => panic!("unexpected error: {other:?}"),
    }
    // One failure stops the listing; nothing is retried.
    assert_eq!(admin.calls().await.len(), 1);
}

#[tokio::test]
async fn malformed_supplement_is_a_precondition_violation() {
    let pool = setup_pool().await;
    db::insert_qr_code(&pool, SHOP, &new_qr("Winter launch", 1))
        .await
        .unwrap();
    let admin = RecordingAdmin::with_responses(vec![Ok(json!({ "data": null }))]);

    let err = qrcodes::get_qr_codes(&pool, &admin, SHOP).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<AdminError>(),
        Some(AdminError::Precondition(_))
    ));
}

#[tokio::test]
async fn absent_product_key_counts_as_deleted() {
    let pool = setup_pool().await;
    db::insert_qr_code(&pool, SHOP, &new_qr("Winter launch", 1))
        .await
        .unwrap();
    let admin = RecordingAdmin::with_responses(vec![Ok(json!({ "data": {} }))]);

    let records = qrcodes::get_qr_codes(&pool, &admin, SHOP).await.unwrap();

    assert_eq!(records.len(), 1);
    assert!(records[0].product_deleted);
    assert_eq!(records[0].product_title, "");
}

#[tokio::test]
async fn record_scan_increments_counter() {
    let pool = setup_pool().await;
    let id = db::insert_qr_code(&pool, SHOP, &new_qr("Winter launch", 1))
        .await
        .unwrap();

    let first = db::record_scan(&pool, id).await.unwrap().unwrap();
    let second = db::record_scan(&pool, id).await.unwrap().unwrap();

    assert_eq!(first.scans, 1);
    assert_eq!(second.scans, 2);
    assert!(db::record_scan(&pool, id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_rejects_blank_title() {
    let pool = setup_pool().await;
    let mut qr = new_qr("  ", 1);
    let err = db::insert_qr_code(&pool, SHOP, &qr).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<InvalidQrCode>(),
        Some(&InvalidQrCode::BlankTitle)
    );

    qr.title = "Ok".into();
    let id = db::insert_qr_code(&pool, SHOP, &qr).await.unwrap();
    let stored = db::get_qr_code(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Ok");
    assert_eq!(stored.destination, QrDestination::Product);
    assert_eq!(stored.scans, 0);
}
