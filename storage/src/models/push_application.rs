//! Parent application and variant rows.
//!
//! Only the identifying columns needed by owner-scoped reporting queries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PushApplication {
    pub push_application_id: String,
    pub name: String,
    /// Login name of the owning developer.
    pub developer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Variant {
    pub variant_id: String,
    pub push_application_id: String,
    pub name: String,
    pub developer: String,
}
