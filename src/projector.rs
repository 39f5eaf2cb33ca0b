//! Turns raw Admin API bodies into the flat records the pages render.
//!
//! Everything here is pure. Shape mismatches surface as
//! [`AdminError::Precondition`].

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AdminError, GraphQlError};
use crate::model::{
    CreatedProduct, ProductPage, ProductRecord, PublicationStatus, QrCode, QrCodeRecord,
};
use crate::shopify::model::{ProductCreateData, ProductsData, Response, SupplementData};
use crate::shopify::Session;

pub const TITLE_MAX_CHARS: usize = 25;
pub const ELLIPSIS: char = '…';

/// Shortens a display title to [`TITLE_MAX_CHARS`] characters plus `…`.
pub fn truncate(title: Option<&str>) -> String {
    let Some(title) = title.filter(|t| !t.is_empty()) else {
        return String::new();
    };
    if title.chars().count() <= TITLE_MAX_CHARS {
        return title.to_string();
    }
    let mut out: String = title.chars().take(TITLE_MAX_CHARS).collect();
    out.push(ELLIPSIS);
    out
}

/// Calendar date such as `Mon Oct 19 2026`, independent of locale.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%a %b %d %Y").to_string()
}

pub fn project_products(body: &Value) -> Result<ProductPage, AdminError> {
    let resp = Response::<ProductsData>::deserialize(body)?;
    let connection = resp.data.products;
    let products = connection
        .edges
        .into_iter()
        .map(|edge| {
            let node = edge.node;
            ProductRecord {
                id: node.id,
                title: node.title.unwrap_or_default(),
                handle: node.handle,
                publication: node.publication.map(|p| PublicationStatus {
                    publication_name: p.publication.name,
                    publish_date: p.publish_date,
                    is_published: p.is_published,
                }),
            }
        })
        .collect();
    Ok(ProductPage {
        products,
        page_info: connection.page_info.unwrap_or_default().into(),
    })
}

/// Joins a stored QR code with its `supplementQRCode` lookup. A null
/// `product` means the product was deleted upstream.
pub fn project_qr_code(stored: &QrCode, body: &Value) -> Result<QrCodeRecord, AdminError> {
    let resp = Response::<SupplementData>::deserialize(body)?;
    let product = resp.data.product;
    let image = product
        .as_ref()
        .and_then(|p| p.images.as_ref())
        .and_then(|images| images.nodes.first());

    Ok(QrCodeRecord {
        id: stored.id,
        title: truncate(Some(&stored.title)),
        product_title: truncate(product.as_ref().and_then(|p| p.title.as_deref())),
        product_image: image.map(|i| i.url.clone()),
        product_alt: image.and_then(|i| i.alt_text.clone()),
        product_deleted: product.is_none(),
        created_at: stored.created_at,
        date_created: format_date(stored.created_at),
        scans: stored.scans,
    })
}

/// Extracts the created product, turning `userErrors` into an API error.
pub fn project_created_product(
    session: &Session,
    body: &Value,
) -> Result<CreatedProduct, AdminError> {
    let resp = Response::<ProductCreateData>::deserialize(body)?;
    let payload = resp.data.product_create;
    if !payload.user_errors.is_empty() {
        return Err(AdminError::UpstreamApi(
            payload
                .user_errors
                .into_iter()
                .map(|e| match e.field {
                    Some(field) if !field.is_empty() => {
                        GraphQlError::new(format!("{}: {}", field.join("."), e.message))
                    }
                    _ => GraphQlError::new(e.message),
                })
                .collect(),
        ));
    }

    let product = payload
        .product
        .ok_or_else(|| serde_json::Error::custom("productCreate returned no product"))?;
    let gid = product
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| serde_json::Error::custom("created product has no id"))?;

    Ok(CreatedProduct {
        product_id: crate::shopify::product_numeric_id(gid).to_string(),
        admin_url: session.product_admin_url(gid),
        product,
    })
}
