mod push_application;
mod push_message_information;
mod record_query;
mod variant_metric_information;

pub use push_application::{PushApplication, Variant};
pub use push_message_information::PushMessageInformation;
pub use record_query::{FilterField, PageResult, RecordFilter, SortOrder};
pub use variant_metric_information::VariantMetricInformation;
