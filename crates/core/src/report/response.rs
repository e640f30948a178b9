use serde::{Deserialize, Serialize};

/// Bar color the browser chart expects on every dataset.
pub const DEFAULT_BAR_COLOR: &str = "rgba(75, 192, 192, 0.6)";

/// One chart dataset; `data[i]` pairs positionally with the response labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDataset {
    pub label: String,
    pub data: Vec<u64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
}

/// Wire shape of a graph endpoint response.
///
/// A request matching zero records yields empty `labels` and `data`, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub labels: Vec<String>,
    pub datasets: Vec<GraphDataset>,
}

impl GraphResponse {
    /// Builds the response from chronologically ordered (label, count) pairs.
    pub fn from_buckets(series_label: impl Into<String>, buckets: Vec<(String, u64)>) -> Self {
        let (labels, data): (Vec<String>, Vec<u64>) = buckets.into_iter().unzip();
        Self {
            labels,
            datasets: vec![GraphDataset {
                label: series_label.into(),
                data,
                background_color: DEFAULT_BAR_COLOR.to_string(),
            }],
        }
    }
}
