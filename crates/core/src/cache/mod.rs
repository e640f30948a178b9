mod bus;
mod error;
mod keys;
mod serialization;
mod traits;

pub use bus::MutationBus;
pub use error::{CacheError, Result};
pub use keys::{collection_from_key, invalidation_targets, is_report_key, report_key};
pub use serialization::{deserialize_report, serialize_report, SerializationError};
pub use traits::Cache;
