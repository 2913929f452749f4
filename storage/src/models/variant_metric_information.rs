//! Per-variant delivery metric of a push message.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VariantMetricInformation {
    pub id: String,
    pub variant_id: String,
    pub receivers: i64,
    /// `Some(false)` flags a delivery failure; `None` means not reported yet.
    pub delivery_status: Option<bool>,
    pub reason: Option<String>,
}

impl VariantMetricInformation {
    pub fn new(variant_id: impl Into<String>, receivers: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            variant_id: variant_id.into(),
            receivers,
            delivery_status: None,
            reason: None,
        }
    }

    pub fn delivered(mut self) -> Self {
        self.delivery_status = Some(true);
        self.reason = None;
        self
    }

    pub fn failed(mut self, reason: impl Into<String>) -> Self {
        self.delivery_status = Some(false);
        self.reason = Some(reason.into());
        self
    }
}
