//! QR code storage: entity inputs and SQL repositories.
//!
//! - `model`: inputs accepted by the repository.
//! - `repo`: SQL-only functions that map rows into `crate::model::QrCode`.
//!
//! Callers import from `shop_admin::db`; the repository API is re-exported.

pub mod model;
pub mod repo;

pub use repo::*;

pub use model::{InvalidQrCode, NewQrCode};
