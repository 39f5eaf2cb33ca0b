use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::db::{self, Pool};
use crate::fetch;
use crate::model::{QrCode, QrCodeRecord, QrDestination};
use crate::projector;
use crate::shopify::{gid_tail, AdminApi};

/// Stored QR codes of `shop`, newest first, each joined with its product.
///
/// Products are looked up one at a time; an empty store makes no upstream
/// calls at all.
#[instrument(skip(pool, api))]
pub async fn get_qr_codes(
    pool: &Pool,
    api: &dyn AdminApi,
    shop: &str,
) -> Result<Vec<QrCodeRecord>> {
    let stored = db::list_qr_codes(pool, shop).await?;
    if stored.is_empty() {
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(stored.len());
    for qr in &stored {
        let body = fetch::fetch_product_summary(api, &qr.product_id)
            .await
            .with_context(|| format!("failed to supplement qr code {}", qr.id))?;
        records.push(projector::project_qr_code(qr, &body)?);
    }
    info!(count = records.len(), "loaded qr codes");
    Ok(records)
}

/// Storefront URL a scan of `qr` should land on.
pub fn destination_url(qr: &QrCode) -> String {
    match qr.destination {
        QrDestination::Product => format!("https://{}/products/{}", qr.shop, qr.product_handle),
        QrDestination::Cart => format!(
            "https://{}/cart/{}:1",
            qr.shop,
            gid_tail(&qr.product_variant_id)
        ),
    }
}
