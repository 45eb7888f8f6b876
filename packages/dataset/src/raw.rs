//! Raw dataset rows and their normalization.
//!
//! A [`RawFacilityRow`] is one row exactly as it appears in the source
//! file, before any validation. Field names accept the published export's
//! Chinese headers as well as common English spellings; anything
//! unrecognized passes through into `extra` untouched. CSV cells arrive as
//! strings, so every field tolerates string values.

use std::collections::BTreeMap;

use amenity_map_facility_models::{FacilityRecord, valid_coordinates};
use serde::Deserialize;

use crate::kind_mapping;

/// A cell that may be a native JSON number or a string holding one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Native number.
    Number(f64),
    /// String cell, possibly numeric text.
    Text(String),
}

impl CellValue {
    /// Coerces the cell to a float, parsing string cells.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Coerces the cell to a non-negative integer.
    ///
    /// Numeric cells are accepted only when they are whole and in range,
    /// since spreadsheet exports sometimes widen integer columns to floats.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n)
                if n.is_finite()
                    && *n >= 0.0
                    && *n <= u64::MAX as f64
                    && n.fract().abs() < f64::EPSILON =>
            {
                Some(*n as u64)
            }
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One row from a facility export, before validation.
#[derive(Debug, Deserialize)]
pub struct RawFacilityRow {
    /// Stable identifier, when the export carries one.
    #[serde(default, alias = "Id", alias = "ID", alias = "編號", alias = "序號")]
    pub id: Option<CellValue>,

    /// Raw facility category label.
    #[serde(
        default,
        alias = "type",
        alias = "Type",
        alias = "category",
        alias = "類型",
        alias = "設施類型",
        alias = "分類"
    )]
    pub kind: Option<String>,

    /// Street address or place description.
    #[serde(default, alias = "Address", alias = "地址", alias = "位置", alias = "地點")]
    pub address: Option<String>,

    /// Latitude cell.
    #[serde(
        default,
        alias = "lat",
        alias = "Lat",
        alias = "LAT",
        alias = "緯度",
        alias = "y",
        alias = "Y"
    )]
    pub latitude: Option<CellValue>,

    /// Longitude cell.
    #[serde(
        default,
        alias = "lng",
        alias = "lon",
        alias = "Lng",
        alias = "Lon",
        alias = "LON",
        alias = "經度",
        alias = "x",
        alias = "X"
    )]
    pub longitude: Option<CellValue>,

    /// Every column not recognized above, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawFacilityRow {
    /// Converts this raw row into a working-set record.
    ///
    /// Returns `None` when the row has no usable coordinate pair (missing,
    /// unparseable, non-finite, or out of range) or no category label.
    /// `fallback_id` is assigned when the row carries no id column.
    #[must_use]
    pub fn to_record(&self, fallback_id: u64) -> Option<FacilityRecord> {
        let latitude = self.latitude.as_ref().and_then(CellValue::as_f64)?;
        let longitude = self.longitude.as_ref().and_then(CellValue::as_f64)?;
        if !valid_coordinates(latitude, longitude) {
            return None;
        }

        let label = self.kind.as_deref().map_or("", str::trim);
        if label.is_empty() {
            return None;
        }

        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_owned);

        Some(FacilityRecord {
            id: self
                .id
                .as_ref()
                .and_then(CellValue::as_u64)
                .unwrap_or(fallback_id),
            kind: kind_mapping::map_kind_label(label),
            address,
            latitude,
            longitude,
            extra: self.extra.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use amenity_map_facility_models::FacilityKind;

    use super::*;

    fn row(json: serde_json::Value) -> RawFacilityRow {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn normalizes_chinese_headers() {
        let raw = row(serde_json::json!({
            "編號": 3,
            "類型": "飲水機",
            "地址": " 基隆路四段43號 ",
            "緯度": 25.0135,
            "經度": 121.5418,
        }));

        let record = raw.to_record(99).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.kind, FacilityKind::DrinkingFountain);
        assert_eq!(record.address.as_deref(), Some("基隆路四段43號"));
        assert!((record.latitude - 25.0135).abs() < 1e-9);
        assert!((record.longitude - 121.5418).abs() < 1e-9);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn coerces_string_coordinates() {
        let raw = row(serde_json::json!({
            "type": "trash can",
            "lat": " 25.0135 ",
            "lng": "121.5418",
        }));

        let record = raw.to_record(0).unwrap();
        assert!((record.latitude - 25.0135).abs() < 1e-9);
        assert!((record.longitude - 121.5418).abs() < 1e-9);
    }

    #[test]
    fn unrecognized_columns_land_in_extra() {
        let raw = row(serde_json::json!({
            "type": "公廁",
            "lat": 25.0,
            "lng": 121.5,
            "樓層": "1F",
            "open24h": true,
        }));

        let record = raw.to_record(0).unwrap();
        assert_eq!(
            record.extra.get("樓層"),
            Some(&serde_json::Value::String("1F".to_owned()))
        );
        assert_eq!(record.extra.get("open24h"), Some(&serde_json::Value::Bool(true)));
    }

    #[test]
    fn rejects_unusable_coordinates() {
        let missing = row(serde_json::json!({ "type": "公廁", "lat": 25.0 }));
        assert!(missing.to_record(0).is_none());

        let garbage = row(serde_json::json!({
            "type": "公廁", "lat": "north-ish", "lng": 121.5,
        }));
        assert!(garbage.to_record(0).is_none());

        let out_of_range = row(serde_json::json!({
            "type": "公廁", "lat": 91.0, "lng": 121.5,
        }));
        assert!(out_of_range.to_record(0).is_none());
    }

    #[test]
    fn rejects_rows_without_a_label() {
        let unlabeled = row(serde_json::json!({ "lat": 25.0, "lng": 121.5 }));
        assert!(unlabeled.to_record(0).is_none());

        let blank = row(serde_json::json!({ "type": "  ", "lat": 25.0, "lng": 121.5 }));
        assert!(blank.to_record(0).is_none());
    }

    #[test]
    fn falls_back_to_the_given_id() {
        let raw = row(serde_json::json!({ "type": "公廁", "lat": 25.0, "lng": 121.5 }));
        assert_eq!(raw.to_record(7).unwrap().id, 7);

        let text_id = row(serde_json::json!({
            "id": "12", "type": "公廁", "lat": 25.0, "lng": 121.5,
        }));
        assert_eq!(text_id.to_record(7).unwrap().id, 12);
    }
}
