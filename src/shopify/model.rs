//! Raw Admin API response shapes, as far as the listings read them.
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Top-level `{ "data": ... }` wrapper.
#[derive(Deserialize, Debug)]
pub struct Response<T> {
    pub data: T,
}

/// Connection-style pagination: `{ edges: [{ cursor, node }], pageInfo }`.
#[derive(Deserialize, Debug)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    #[serde(rename = "pageInfo", default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Deserialize, Debug)]
pub struct Edge<T> {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: T,
}

/// `{ nodes: [...] }` shorthand connection.
#[derive(Deserialize, Debug)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ProductsData {
    pub products: Connection<ProductNode>,
}

#[derive(Deserialize, Debug)]
pub struct ProductNode {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub handle: String,
    #[serde(rename = "resourcePublicationOnCurrentPublication", default)]
    pub publication: Option<ResourcePublication>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePublication {
    pub publication: Publication,
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
    pub is_published: bool,
}

#[derive(Deserialize, Debug)]
pub struct Publication {
    pub name: String,
    pub id: String,
}

#[derive(Deserialize, Debug)]
pub struct SupplementData {
    pub product: Option<SupplementProduct>,
}

#[derive(Deserialize, Debug)]
pub struct SupplementProduct {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub images: Option<Nodes<ProductImage>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreateData {
    pub product_create: ProductCreatePayload,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatePayload {
    /// Kept as raw JSON: the admin page shows it verbatim.
    pub product: Option<serde_json::Value>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}
