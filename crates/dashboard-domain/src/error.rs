use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("embedded {snapshot} snapshot is malformed: {message}")]
    Malformed {
        snapshot: &'static str,
        message: String,
    },
    #[error("marker {id} has an out-of-range coordinate ({lat}, {lng})")]
    InvalidCoordinate { id: String, lat: f64, lng: f64 },
    #[error("chart feed has {labels} labels but {values} values")]
    ChartLengthMismatch { labels: usize, values: usize },
}

impl SnapshotError {
    pub(crate) fn malformed(snapshot: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Malformed {
            snapshot,
            message: error.to_string(),
        }
    }
}
