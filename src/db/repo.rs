use super::model::NewQrCode;
use crate::model::{QrCode, QrDestination};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::instrument;

pub type Pool = SqlitePool;

const QR_CODE_COLUMNS: &str = "id, shop, title, product_id, product_handle, product_variant_id, \
                               destination, scans, created_at";

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized).await?;
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await?;
    Ok(pool)
}

/// Expands a leading `~/` in file-backed SQLite URLs and creates the parent
/// directory. In-memory and non-sqlite URLs pass through untouched.
fn prepare_sqlite_url(url: &str) -> String {
    if !url.starts_with("sqlite:") || url.starts_with("sqlite::memory") {
        return url.to_string();
    }

    let rest = &url["sqlite:".len()..];
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path.is_empty() {
        return url.to_string();
    }

    let path = match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(tail), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), tail),
        _ => path.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    // sqlx creates missing files only with mode=rwc.
    let mut rebuilt = format!("sqlite://{}", path);
    match query {
        Some(q) => {
            rebuilt.push('?');
            rebuilt.push_str(q);
        }
        None => rebuilt.push_str("?mode=rwc"),
    }
    rebuilt
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn row_to_qr_code(row: &SqliteRow) -> Result<QrCode> {
    let id: i64 = row.try_get("id")?;
    let destination: String = row.try_get("destination")?;
    let destination = QrDestination::parse(&destination)
        .ok_or_else(|| anyhow!("qr code {} has unknown destination {}", id, destination))?;
    Ok(QrCode {
        id,
        shop: row.try_get("shop")?,
        title: row.try_get("title")?,
        product_id: row.try_get("product_id")?,
        product_handle: row.try_get("product_handle")?,
        product_variant_id: row.try_get("product_variant_id")?,
        destination,
        scans: row.try_get("scans")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[instrument(skip_all)]
pub async fn insert_qr_code(pool: &Pool, shop: &str, new: &NewQrCode) -> Result<i64> {
    new.validate()?;
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO qr_codes (shop, title, product_id, product_handle, product_variant_id, destination, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(shop)
    .bind(new.title.trim())
    .bind(&new.product_id)
    .bind(&new.product_handle)
    .bind(&new.product_variant_id)
    .bind(new.destination.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// All QR codes of a shop, newest first.
#[instrument(skip_all)]
pub async fn list_qr_codes(pool: &Pool, shop: &str) -> Result<Vec<QrCode>> {
    let rows = sqlx::query(&format!(
        "SELECT {QR_CODE_COLUMNS} FROM qr_codes WHERE shop = ? ORDER BY id DESC"
    ))
    .bind(shop)
    .fetch_all(pool)
    .await?;
    rows.iter().map(row_to_qr_code).collect()
}

#[instrument(skip_all)]
pub async fn get_qr_code(pool: &Pool, id: i64) -> Result<Option<QrCode>> {
    let row = sqlx::query(&format!("SELECT {QR_CODE_COLUMNS} FROM qr_codes WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(row_to_qr_code).transpose()
}

/// Bumps the scan counter and returns the updated row.
#[instrument(skip_all)]
pub async fn record_scan(pool: &Pool, id: i64) -> Result<Option<QrCode>> {
    let row = sqlx::query(&format!(
        "UPDATE qr_codes SET scans = scans + 1 WHERE id = ? RETURNING {QR_CODE_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(row_to_qr_code).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_sqlite_url_passes_memory_through() {
        assert_eq!(prepare_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            prepare_sqlite_url("postgres://localhost/db"),
            "postgres://localhost/db"
        );
    }

    #[test]
    fn prepare_sqlite_url_adds_create_mode() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("nested").join("shop_admin.db");
        let url = format!("sqlite://{}", file.display());
        let prepared = prepare_sqlite_url(&url);
        assert_eq!(prepared, format!("sqlite://{}?mode=rwc", file.display()));
        assert!(file.parent().unwrap().exists());

        let with_query = format!("sqlite://{}?mode=ro", file.display());
        assert_eq!(prepare_sqlite_url(&with_query), with_query);
    }
}
