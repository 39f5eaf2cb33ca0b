//! HTTP surface consumed by the admin front end.
//!
//! Each page has a read path (GET) returning projected records and a write
//! path (POST). Upstream failures are not retried; they become JSON error
//! bodies.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::db::{self, InvalidQrCode, NewQrCode, Pool};
use crate::error::AdminError;
use crate::fetch;
use crate::model::{CreatedProduct, ProductPage, QrCode, QrCodeRecord};
use crate::projector;
use crate::qrcodes;
use crate::shopify::{AdminApi, Session};

#[derive(Clone)]
pub struct AppState {
    pub admin: Arc<dyn AdminApi>,
    pub session: Session,
    pub pool: Pool,
    pub page_size: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/app", get(index_loader).post(index_action))
        .route("/app/products", get(products_loader).post(products_action))
        .route("/app/qrcodes", post(create_qr_code))
        .route("/qrcodes/:id/scan", get(scan_qr_code))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler error; rejected input maps to 422, upstream failures to 502,
/// everything else to 500.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<InvalidQrCode>().is_some() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            match self.0.downcast_ref::<AdminError>() {
                Some(AdminError::UpstreamRequest(_)) | Some(AdminError::UpstreamApi(_)) => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };
        error!(err = ?self.0, %status, "request failed");
        (status, Json(json!({ "error": format!("{:#}", self.0) }))).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexData {
    pub shop: String,
    pub qr_codes: Vec<QrCodeRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsData {
    pub shop: String,
    #[serde(flatten)]
    pub page: ProductPage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestProductData {
    pub shop: String,
    pub products_list: ProductPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub after: Option<String>,
}

async fn index_loader(State(state): State<AppState>) -> Result<Json<IndexData>, AppError> {
    let qr_codes =
        qrcodes::get_qr_codes(&state.pool, state.admin.as_ref(), &state.session.shop).await?;
    Ok(Json(IndexData {
        shop: state.session.shop_name().to_string(),
        qr_codes,
    }))
}

async fn index_action(State(state): State<AppState>) -> Result<Json<CreatedProduct>, AppError> {
    let input = fetch::demo_product_input(&mut rand::thread_rng());
    let body = fetch::create_demo_product(state.admin.as_ref(), input).await?;
    let created = projector::project_created_product(&state.session, &body)?;
    info!(product_id = %created.product_id, "demo product created");
    Ok(Json(created))
}

async fn products_loader(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ProductsData>, AppError> {
    let body = fetch::fetch_products(
        state.admin.as_ref(),
        state.page_size,
        query.after.as_deref(),
    )
    .await?;
    let page = projector::project_products(&body)?;
    Ok(Json(ProductsData {
        shop: state.session.shop_name().to_string(),
        page,
    }))
}

async fn products_action(
    State(state): State<AppState>,
) -> Result<Json<LatestProductData>, AppError> {
    let body = fetch::fetch_products(state.admin.as_ref(), 1, None).await?;
    let products_list = projector::project_products(&body)?;
    Ok(Json(LatestProductData {
        shop: state.session.shop_name().to_string(),
        products_list,
    }))
}

async fn create_qr_code(
    State(state): State<AppState>,
    Json(new): Json<NewQrCode>,
) -> Result<(StatusCode, Json<QrCode>), AppError> {
    let id = db::insert_qr_code(&state.pool, &state.session.shop, &new).await?;
    let qr = db::get_qr_code(&state.pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("qr code {} vanished after insert", id))?;
    info!(id, "qr code created");
    Ok((StatusCode::CREATED, Json(qr)))
}

async fn scan_qr_code(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let Some(qr) = db::record_scan(&state.pool, id).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    let url = qrcodes::destination_url(&qr);
    info!(id, scans = qr.scans, %url, "qr code scanned");
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
