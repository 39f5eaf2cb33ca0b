//! Admin API reads and the demo write, returning raw JSON bodies.
use rand::Rng;
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::error::AdminError;
use crate::shopify::{queries, AdminApi};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Admin API connections cap `first` at 250.
pub const MAX_PAGE_SIZE: i64 = 250;

const DEMO_COLORS: [&str; 4] = ["Red", "Orange", "Yellow", "Green"];

#[instrument(skip(api))]
pub async fn fetch_products(
    api: &dyn AdminApi,
    first: i64,
    after: Option<&str>,
) -> Result<Value, AdminError> {
    let variables = json!({ "first": first, "after": after });
    api.graphql(queries::PRODUCTS, Some(variables)).await
}

#[instrument(skip(api))]
pub async fn fetch_product_summary(
    api: &dyn AdminApi,
    product_id: &str,
) -> Result<Value, AdminError> {
    api.graphql(queries::SUPPLEMENT_QR_CODE, Some(json!({ "id": product_id })))
        .await
}

/// `productCreate` input for a randomly coloured snowboard.
pub fn demo_product_input<R: Rng>(rng: &mut R) -> Value {
    let color = DEMO_COLORS[rng.gen_range(0..DEMO_COLORS.len())];
    let cents: u32 = rng.gen_range(0..10_000);
    json!({
        "title": format!("{} Snowboard", color),
        "variants": [{
            "price": format!("{}.{:02}", cents / 100, cents % 100),
            "inventoryItem": { "tracked": true }
        }]
    })
}

/// Runs `productCreate` with an input built by [`demo_product_input`].
#[instrument(skip_all)]
pub async fn create_demo_product(api: &dyn AdminApi, input: Value) -> Result<Value, AdminError> {
    info!(title = %input["title"], "creating demo product");
    api.graphql(queries::POPULATE_PRODUCT, Some(json!({ "input": input })))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn demo_input_has_colour_title_and_price() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let input = demo_product_input(&mut rng);
            let title = input["title"].as_str().unwrap();
            let color = title.strip_suffix(" Snowboard").unwrap();
            assert!(DEMO_COLORS.contains(&color));

            let variant = &input["variants"][0];
            let price: f64 = variant["price"].as_str().unwrap().parse().unwrap();
            assert!((0.0..100.0).contains(&price));
            assert_eq!(variant["inventoryItem"]["tracked"], true);
        }
    }

    #[test]
    fn demo_price_never_reaches_one_hundred() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            let input = demo_product_input(&mut rng);
            let price = input["variants"][0]["price"].as_str().unwrap().to_string();
            let (whole, fraction) = price.split_once('.').unwrap();
            assert_eq!(fraction.len(), 2);
            assert!(whole.parse::<u32>().unwrap() < 100, "price {price}");
        }
    }
}
