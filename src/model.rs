use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shopify::model::PageInfo;

/// Where a scanned QR code sends the customer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrDestination {
    Product,
    Cart,
}

impl QrDestination {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrDestination::Product => "product",
            QrDestination::Cart => "cart",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "product" => Some(QrDestination::Product),
            "cart" => Some(QrDestination::Cart),
            _ => None,
        }
    }
}

/// QR code row as stored locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    pub id: i64,
    pub shop: String,
    pub title: String,
    pub product_id: String,
    pub product_handle: String,
    pub product_variant_id: String,
    pub destination: QrDestination,
    pub scans: i64,
    pub created_at: DateTime<Utc>,
}

/// Publication state of a product on the app's current publication.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicationStatus {
    pub publication_name: String,
    pub publish_date: Option<DateTime<Utc>>,
    pub is_published: bool,
}

/// One row of the products table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub publication: Option<PublicationStatus>,
}

/// A page of products in upstream order.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductRecord>,
    pub page_info: PageInfoView,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoView {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl From<PageInfo> for PageInfoView {
    fn from(info: PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            end_cursor: info.end_cursor,
        }
    }
}

/// One row of the QR code table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeRecord {
    pub id: i64,
    /// Display title, truncated.
    pub title: String,
    /// Truncated product title; empty when the product is gone.
    pub product_title: String,
    pub product_image: Option<String>,
    pub product_alt: Option<String>,
    pub product_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub date_created: String,
    pub scans: i64,
}

/// Result of the demo `productCreate` call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProduct {
    pub product: serde_json::Value,
    pub product_id: String,
    pub admin_url: String,
}
