//! Push message information record.
//!
//! Maps to the `push_message_information` table. One row per submitted push
//! message; per-variant delivery metrics live in `variant_metric_information`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::VariantMetricInformation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PushMessageInformation {
    pub id: String,
    pub push_application_id: String,
    pub raw_json_message: Option<String>,
    pub ip_address: Option<String>,
    pub client_identifier: Option<String>,
    pub submit_date: DateTime<Utc>,
    pub total_receivers: i64,
    pub app_open_counter: i64,
    pub first_open_date: Option<DateTime<Utc>>,
    pub last_open_date: Option<DateTime<Utc>>,
    /// Loaded separately; not a column of the record row.
    #[sqlx(skip)]
    pub variant_informations: Vec<VariantMetricInformation>,
}

impl PushMessageInformation {
    /// Creates a new record for `push_application_id` with a generated UUID and current timestamp.
    pub fn new(push_application_id: impl Into<String>) -> Self {
        Self::submitted_at(push_application_id, Utc::now())
    }

    /// Same as [`new`](Self::new) with an explicit submit date.
    pub fn submitted_at(push_application_id: impl Into<String>, submit_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            push_application_id: push_application_id.into(),
            raw_json_message: None,
            ip_address: None,
            client_identifier: None,
            submit_date,
            total_receivers: 0,
            app_open_counter: 0,
            first_open_date: None,
            last_open_date: None,
            variant_informations: Vec::new(),
        }
    }

    /// Adds a metric owned by this record and adds its `receivers` to
    /// `total_receivers`. Assign `total_receivers` directly when the total is
    /// known independently of the attached metrics.
    pub fn with_variant_information(mut self, info: VariantMetricInformation) -> Self {
        self.total_receivers += info.receivers;
        self.variant_informations.push(info);
        self
    }
}
