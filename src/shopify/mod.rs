//! Shopify Admin GraphQL client.
//!
//! The server never talks to Shopify directly: handlers and the fetch adapter
//! go through [`AdminApi`], which is what the session layer hands out. The
//! only production implementation is [`AdminClient`]; tests plug in fakes.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{AdminError, GraphQlError};

pub mod model;
pub mod queries;

const SHOP_DOMAIN_SUFFIX: &str = ".myshopify.com";
const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated shop session. Produced outside this crate's core (config or
/// an OAuth layer) and passed in explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub shop: String,
    pub access_token: String,
}

impl Session {
    /// Shop handle without the `.myshopify.com` suffix.
    pub fn shop_name(&self) -> &str {
        self.shop
            .strip_suffix(SHOP_DOMAIN_SUFFIX)
            .unwrap_or(&self.shop)
    }

    /// Admin URL for a product, given its gid or numeric id.
    pub fn product_admin_url(&self, product_id: &str) -> String {
        format!(
            "https://admin.shopify.com/store/{}/admin/products/{}",
            self.shop_name(),
            product_numeric_id(product_id)
        )
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("shop", &self.shop)
            .finish_non_exhaustive()
    }
}

/// `gid://shopify/Product/123` -> `123`. Anything else is returned as-is.
pub fn product_numeric_id(gid: &str) -> &str {
    gid.strip_prefix(PRODUCT_GID_PREFIX).unwrap_or(gid)
}

/// `gid://shopify/ProductVariant/42` -> `42`, for any gid resource type.
pub fn gid_tail(gid: &str) -> &str {
    gid.rsplit('/').next().unwrap_or(gid)
}

/// Capability to run GraphQL operations against the Admin API of one shop.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Executes `query` and returns the whole JSON body (`data` included).
    async fn graphql(&self, query: &str, variables: Option<Value>) -> Result<Value, AdminError>;
}

#[derive(Clone)]
pub struct AdminClient {
    http: Client,
    base_url: Url,
    access_token: String,
    api_version: String,
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    pub fn new(session: &Session, api_version: impl Into<String>) -> Result<Self, AdminError> {
        let base_url = Url::parse(&format!("https://{}/", session.shop))
            .map_err(|e| AdminError::UpstreamRequest(format!("invalid shop domain: {e}")))?;
        Self::with_base_url(session, api_version, base_url)
    }

    pub fn with_base_url(
        session: &Session,
        api_version: impl Into<String>,
        base_url: Url,
    ) -> Result<Self, AdminError> {
        let http = Client::builder()
            .user_agent("shop-admin/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url,
            access_token: session.access_token.clone(),
            api_version: api_version.into(),
        })
    }

    /// Builds a client from the loaded configuration, honouring `base_url`.
    pub fn from_config(cfg: &crate::config::Config) -> Result<Self, AdminError> {
        let session = cfg.session();
        match cfg.shopify.base_url.as_deref() {
            Some(base) => {
                let url = Url::parse(base)
                    .map_err(|e| AdminError::UpstreamRequest(format!("invalid base URL: {e}")))?;
                Self::with_base_url(&session, cfg.shopify.api_version.clone(), url)
            }
            None => Self::new(&session, cfg.shopify.api_version.clone()),
        }
    }

    pub fn endpoint(&self) -> Result<Url, AdminError> {
        self.base_url
            .join(&format!("admin/api/{}/graphql.json", self.api_version))
            .map_err(|e| AdminError::UpstreamRequest(format!("invalid Admin API URL: {e}")))
    }

    pub fn build_request(&self, body: &Value) -> Result<reqwest::Request, AdminError> {
        let endpoint = self.endpoint()?;
        let request = self
            .http
            .post(endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(body)
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn graphql(&self, query: &str, variables: Option<Value>) -> Result<Value, AdminError> {
        let body = graphql_body(query, variables);
        let request = self.build_request(&body)?;
        info!(url = %request.url(), "admin api request");
        for (name, value) in request.headers() {
            if name.as_str().eq_ignore_ascii_case("x-shopify-access-token") {
                debug!("  {}: [REDACTED]", name);
            } else {
                debug!("  {}: {}", name, value.to_str().unwrap_or("[invalid]"));
            }
        }
        debug!(
            "Request Payload: {}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| format!("{:?}", body))
        );

        let res = self.http.execute(request).await?;
        let status = res.status();
        info!(%status, "admin api response");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = res.text().await.unwrap_or_default();
            warn!("Rate limited by Shopify: {}", body);
            return Err(AdminError::UpstreamRequest(format!(
                "received 429 from Shopify: {}",
                body
            )));
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!("Shopify API error - Status: {}, Body: {}", status, body);
            return Err(AdminError::UpstreamRequest(format!(
                "shopify error {}: {}",
                status, body
            )));
        }

        let text = res.text().await?;
        debug!("Response Body: {}", text);
        parse_graphql_body(&text)
    }
}

/// `{ "query": ..., "variables": ... }`, omitting `variables` when absent.
pub fn graphql_body(query: &str, variables: Option<Value>) -> Value {
    match variables {
        Some(vars) => json!({ "query": query, "variables": vars }),
        None => json!({ "query": query }),
    }
}

/// Parses a GraphQL response body and rejects it if `errors` is populated.
pub fn parse_graphql_body(text: &str) -> Result<Value, AdminError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| AdminError::UpstreamRequest(format!("invalid JSON body: {e}")))?;

    match value.get("errors") {
        Some(Value::Array(items)) if !items.is_empty() => {
            Err(AdminError::UpstreamApi(items.iter().map(to_graphql_error).collect()))
        }
        // Auth failures come back as a bare string.
        Some(Value::String(message)) => {
            Err(AdminError::UpstreamApi(vec![GraphQlError::new(message.clone())]))
        }
        _ => Ok(value),
    }
}

fn to_graphql_error(item: &Value) -> GraphQlError {
    serde_json::from_value::<GraphQlError>(item.clone())
        .unwrap_or_else(|_| GraphQlError::new(item.to_string()))
}
