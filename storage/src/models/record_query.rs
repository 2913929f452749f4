//! Filter, ordering and page types for push message information queries.
//!
//! Used by PagedQueryRunner and the PushMessageInformationDao listing methods.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Direction applied to `submit_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Indexed field a record listing can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterField {
    PushApplication,
    /// Matches through the record's variant metrics.
    Variant,
}

impl FilterField {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterField::PushApplication => "push-application",
            FilterField::Variant => "variant",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push-application" | "push_application" | "application" | "app" => {
                Ok(FilterField::PushApplication)
            }
            "variant" => Ok(FilterField::Variant),
            other => Err(StorageError::InvalidFilter(other.to_string())),
        }
    }
}

/// A single-field filter; `value` is always bound as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub field: FilterField,
    pub value: String,
}

impl RecordFilter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn push_application(push_application_id: impl Into<String>) -> Self {
        Self::new(FilterField::PushApplication, push_application_id)
    }

    pub fn variant(variant_id: impl Into<String>) -> Self {
        Self::new(FilterField::Variant, variant_id)
    }
}

/// One page of a result set plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub records: Vec<T>,
    pub total_count: i64,
}

impl<T> PageResult<T> {
    pub fn new(records: Vec<T>, total_count: i64) -> Self {
        Self {
            records,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
