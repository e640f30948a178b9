mod buckets;
mod response;
mod types;

pub use buckets::bucket_counts;
pub use response::{GraphDataset, GraphResponse, DEFAULT_BAR_COLOR};
pub use types::{AppointmentGraphFilter, Granularity, ReportRequest, TravelGraphFilter};
