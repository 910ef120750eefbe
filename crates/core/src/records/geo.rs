//! Geographic distribution of records for the map view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agro_shared::types::RecordId;

use super::types::Record;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in [-90, 90].
    pub latitude: Decimal,
    /// Longitude in [-180, 180].
    pub longitude: Decimal,
}

impl GeoPoint {
    /// Map center used when there are no records (Pune, Maharashtra).
    pub const DEFAULT_CENTER: Self = Self {
        latitude: Decimal::from_parts(185_204, 0, 0, false, 4),
        longitude: Decimal::from_parts(738_567, 0, 0, false, 4),
    };

    /// Returns true if both coordinates are inside their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let lat_limit = Decimal::from(90);
        let lon_limit = Decimal::from(180);
        self.latitude.abs() <= lat_limit && self.longitude.abs() <= lon_limit
    }
}

/// One map marker per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarker {
    /// Record the marker points at.
    pub record_id: RecordId,
    /// Producer display name.
    pub owner_label: String,
    /// Village label, if any.
    pub village: Option<String>,
    /// Crop label, if any.
    pub crop: Option<String>,
    /// Plot area, if any.
    pub area: Option<Decimal>,
    /// Marker position.
    pub position: GeoPoint,
}

/// Map data: a center and the markers to draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapView {
    /// Initial map center.
    pub center: GeoPoint,
    /// Markers in input order.
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// Builds the map view. The center is the first record's position.
    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        let markers: Vec<MapMarker> = records
            .iter()
            .map(|r| MapMarker {
                record_id: r.id,
                owner_label: r.owner_label.clone(),
                village: r.village_label().map(str::to_string),
                crop: r.crop_label().map(str::to_string),
                area: r.area,
                position: GeoPoint {
                    latitude: r.latitude,
                    longitude: r.longitude,
                },
            })
            .collect();

        let center = markers
            .first()
            .map_or(GeoPoint::DEFAULT_CENTER, |m| m.position);

        Self { center, markers }
    }
}
