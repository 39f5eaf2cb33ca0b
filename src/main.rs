use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use shop_admin::config;
use shop_admin::db;
use shop_admin::server::{self, AppState};
use shop_admin::shopify::AdminClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Overrides `app.listen`
    #[arg(long)]
    listen: Option<String>,
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
    cfg.ensure_dirs()?;

    let pool = db::init_pool(&cfg.database_url()).await?;
    db::run_migrations(&pool).await?;

    let admin = AdminClient::from_config(&cfg)?;
    info!(?admin, "admin api client ready");

    let state = AppState {
        admin: Arc::new(admin),
        session: cfg.session(),
        pool,
        page_size: cfg.app.page_size,
    };

    let addr = args.listen.unwrap_or_else(|| cfg.app.listen.clone());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, shop = %cfg.shopify.shop, "starting admin server");
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
