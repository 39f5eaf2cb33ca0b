//! Repository inputs. Business logic lives in higher layers.

use serde::Deserialize;
use thiserror::Error;

use crate::model::QrDestination;

/// Fields required to create a QR code for a shop.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewQrCode {
    pub title: String,
    pub product_id: String,
    pub product_handle: String,
    pub product_variant_id: String,
    pub destination: QrDestination,
}

/// Rejected `NewQrCode` input; nothing was written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidQrCode {
    #[error("qr code title must be non-empty")]
    BlankTitle,
    #[error("qr code productId must be non-empty")]
    BlankProductId,
}

impl NewQrCode {
    pub fn validate(&self) -> Result<(), InvalidQrCode> {
        if self.title.trim().is_empty() {
            return Err(InvalidQrCode::BlankTitle);
        }
        if self.product_id.trim().is_empty() {
            return Err(InvalidQrCode::BlankProductId);
        }
        Ok(())
    }
}
