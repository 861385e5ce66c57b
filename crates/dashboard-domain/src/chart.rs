use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Pre-aggregated series handed to the chart renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChartFeed")]
pub struct ChartFeed {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct RawChartFeed {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<RawChartFeed> for ChartFeed {
    type Error = SnapshotError;

    fn try_from(raw: RawChartFeed) -> Result<Self, Self::Error> {
        if raw.labels.len() != raw.values.len() {
            return Err(SnapshotError::ChartLengthMismatch {
                labels: raw.labels.len(),
                values: raw.values.len(),
            });
        }
        Ok(Self {
            labels: raw.labels,
            values: raw.values,
        })
    }
}

impl ChartFeed {
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartFeeds {
    #[serde(default, rename = "type")]
    pub by_type: Option<ChartFeed>,
    #[serde(default, rename = "status")]
    pub by_status: Option<ChartFeed>,
}

pub fn parse_chart_feed(raw: &str) -> Result<ChartFeed, SnapshotError> {
    serde_json::from_str(raw).map_err(|error| SnapshotError::malformed("chart", error))
}
