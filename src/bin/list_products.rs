use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use shop_admin::config;
use shop_admin::fetch::{self, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use shop_admin::projector;
use shop_admin::shopify::AdminClient;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the newest products of the configured shop")]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Page size (1..=250)
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(i64).range(1..=MAX_PAGE_SIZE)
    )]
    first: i64,

    /// Cursor returned as `endCursor` by a previous page
    #[arg(long)]
    after: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let client = AdminClient::from_config(&cfg)?;

    let body = fetch::fetch_products(&client, args.first, args.after.as_deref()).await?;
    let page = projector::project_products(&body)?;

    if page.products.is_empty() {
        println!("No products in {}", cfg.shopify.shop);
        return Ok(());
    }
    println!("Products of {}:", cfg.shopify.shop);
    for p in &page.products {
        let published = match &p.publication {
            Some(status) if status.is_published => status.publication_name.as_str(),
            Some(_) => "unpublished",
            None => "-",
        };
        println!(
            "  {} -> {{ title: {}, handle: {}, publication: {} }}",
            p.id,
            projector::truncate(Some(&p.title)),
            p.handle,
            published
        );
    }
    if let Some(cursor) = page.page_info.end_cursor.filter(|_| page.page_info.has_next_page) {
        println!("More: --after {}", cursor);
    }
    Ok(())
}
