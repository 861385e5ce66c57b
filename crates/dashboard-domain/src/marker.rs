use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::identifiers::MarkerId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerPopup {
    pub kind: String,
    pub location: String,
}

impl MarkerPopup {
    pub fn html(&self) -> String {
        format!(
            "<b>{}</b><br>{}",
            escape_html(&self.kind),
            escape_html(&self.location)
        )
    }
}

/// A map point seeded from the embedded marker snapshot. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarkerRecord")]
pub struct MapMarker {
    pub id: MarkerId,
    pub point: GeoPoint,
    pub popup: MarkerPopup,
}

#[derive(Debug, Deserialize)]
struct MarkerRecord {
    id: MarkerId,
    lat: f64,
    lng: f64,
    #[serde(rename = "type")]
    kind: String,
    location: String,
}

impl TryFrom<MarkerRecord> for MapMarker {
    type Error = SnapshotError;

    fn try_from(record: MarkerRecord) -> Result<Self, Self::Error> {
        let point = GeoPoint::new(record.lat, record.lng);
        if !point.is_valid() {
            return Err(SnapshotError::InvalidCoordinate {
                id: record.id.as_str().to_owned(),
                lat: record.lat,
                lng: record.lng,
            });
        }
        Ok(Self {
            id: record.id,
            point,
            popup: MarkerPopup {
                kind: record.kind,
                location: record.location,
            },
        })
    }
}

/// Parses the embedded `[{id, lat, lng, type, location}, ...]` snapshot.
pub fn parse_marker_snapshot(raw: &str) -> Result<Vec<MapMarker>, SnapshotError> {
    serde_json::from_str(raw).map_err(|error| SnapshotError::malformed("map marker", error))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
