//! Record data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agro_shared::types::{OwnerId, RecordId};

/// One per-plot agricultural observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable record identity.
    pub id: RecordId,
    /// Producer who owns the record.
    pub owner_id: OwnerId,
    /// Producer display name.
    pub owner_label: String,
    /// Crop label (e.g. "Wheat").
    #[serde(default)]
    pub crop: Option<String>,
    /// Village label.
    #[serde(default)]
    pub village: Option<String>,
    /// Plot area in acres.
    #[serde(default)]
    pub area: Option<Decimal>,
    /// Harvested yield in kilograms.
    #[serde(default)]
    pub yield_kg: Option<Decimal>,
    /// Latitude in [-90, 90].
    pub latitude: Decimal,
    /// Longitude in [-180, 180].
    pub longitude: Decimal,
}

/// Fields a view may require from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    /// Crop label.
    Crop,
    /// Village label.
    Village,
    /// Plot area.
    Area,
    /// Harvested yield.
    Yield,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crop => write!(f, "crop"),
            Self::Village => write!(f, "village"),
            Self::Area => write!(f, "area"),
            Self::Yield => write!(f, "yield_kg"),
        }
    }
}

impl Record {
    /// Returns the crop label, or `None` when absent or blank.
    #[must_use]
    pub fn crop_label(&self) -> Option<&str> {
        non_blank(self.crop.as_deref())
    }

    /// Returns the village label, or `None` when absent or blank.
    #[must_use]
    pub fn village_label(&self) -> Option<&str> {
        non_blank(self.village.as_deref())
    }

    /// Returns the measured quantity for `field` when it is present and not negative.
    ///
    /// Label fields always return `None`.
    #[must_use]
    pub fn quantity(&self, field: RecordField) -> Option<Decimal> {
        let value = match field {
            RecordField::Area => self.area,
            RecordField::Yield => self.yield_kg,
            RecordField::Crop | RecordField::Village => None,
        }?;
        (!value.is_sign_negative()).then_some(value)
    }
}

fn non_blank(label: Option<&str>) -> Option<&str> {
    label.map(str::trim).filter(|l| !l.is_empty())
}
