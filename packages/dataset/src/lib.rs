#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Facility dataset loading and normalization.
//!
//! Reads a published facility export (a JSON records array or a CSV file
//! with a header row), normalizes headers, labels, and coordinates, and
//! yields the immutable working set the rest of the system operates on.
//! Rows without a usable coordinate pair or category label are dropped and
//! counted here, which is what lets every consumer assume that a
//! working-set record always has finite, in-range coordinates.

mod kind_mapping;
mod raw;

pub use kind_mapping::map_kind_label;
pub use raw::{CellValue, RawFacilityRow};

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use amenity_map_facility_models::{FacilityKind, FacilityRecord};
use chrono::{DateTime, Utc};

/// Errors from dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error reading the dataset file.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The input is not a JSON records array.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing error.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The file extension is unrecognized and the content does not sniff
    /// as JSON.
    #[error("unsupported dataset format: {path}")]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: String,
    },

    /// The input parsed but contained no rows at all.
    #[error("dataset contains no rows")]
    Empty,

    /// Two rows resolved to the same id. Ranking tie-breaks and marker
    /// identity both depend on ids being unique.
    #[error("duplicate facility id {id}")]
    DuplicateId {
        /// The id that occurred more than once.
        id: u64,
    },
}

/// The immutable working set for one serving session.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Usable facility records, in source order. Every record has finite,
    /// in-range coordinates and a unique id.
    pub facilities: Vec<FacilityRecord>,
    /// Source rows dropped during normalization.
    pub dropped: usize,
    /// When this set was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Loads a dataset from a file, choosing the format by extension.
    ///
    /// `.json` files are parsed as a records array, `.csv` as CSV with a
    /// header row. Any other extension is accepted only when the content
    /// sniffs as a JSON array.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::Io`] if the file cannot be read.
    /// * [`DatasetError::UnsupportedFormat`] if the format cannot be
    ///   determined.
    /// * Everything [`Self::from_json_slice`] and [`Self::from_csv_reader`]
    ///   return.
    pub fn load_path(path: &Path) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path).map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_slice(&bytes),
            Some("csv") => Self::from_csv_reader(bytes.as_slice()),
            _ if looks_like_json_array(&bytes) => Self::from_json_slice(&bytes),
            _ => Err(DatasetError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Parses a JSON records array (the shape the published export uses).
    ///
    /// # Errors
    ///
    /// * [`DatasetError::Json`] if `bytes` is not a JSON array.
    /// * [`DatasetError::Empty`] if the array has no elements.
    /// * [`DatasetError::DuplicateId`] if two rows resolve to the same id.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        let rows: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
        Self::from_rows(rows)
    }

    /// Parses CSV with a header row. Cells are carried as strings and run
    /// through the same normalization as JSON rows.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::Csv`] if the header row cannot be read.
    /// * [`DatasetError::Empty`] if there are no data rows.
    /// * [`DatasetError::DuplicateId`] if two rows resolve to the same id.
    pub fn from_csv_reader(reader: impl std::io::Read) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();

        let mut rows: Vec<serde_json::Value> = Vec::new();
        for result in csv_reader.records() {
            let record = result?;

            let mut map = serde_json::Map::new();
            for (i, header) in headers.iter().enumerate() {
                let value = record.get(i).unwrap_or("").trim().to_owned();
                map.insert(header.clone(), serde_json::Value::String(value));
            }
            rows.push(serde_json::Value::Object(map));
        }

        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<serde_json::Value>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }

        let total = rows.len();
        let mut facilities: Vec<FacilityRecord> = Vec::with_capacity(total);
        let mut seen_ids: BTreeSet<u64> = BTreeSet::new();
        let mut dropped = 0usize;

        for (index, row) in rows.into_iter().enumerate() {
            let raw: RawFacilityRow = match serde_json::from_value(row) {
                Ok(r) => r,
                Err(e) => {
                    log::debug!("skipping row {index}: {e}");
                    dropped += 1;
                    continue;
                }
            };

            let Some(record) = raw.to_record(index as u64) else {
                log::debug!("skipping row {index}: no usable coordinates or label");
                dropped += 1;
                continue;
            };

            if !seen_ids.insert(record.id) {
                return Err(DatasetError::DuplicateId { id: record.id });
            }
            facilities.push(record);
        }

        if dropped > 0 {
            log::warn!("dropped {dropped} of {total} rows during normalization");
        }
        log::info!("loaded {} facilities ({dropped} rows dropped)", facilities.len());

        Ok(Self {
            facilities,
            dropped,
            loaded_at: Utc::now(),
        })
    }

    /// Number of usable records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Returns `true` if no usable records were loaded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// The set of kinds that actually occur in the working set.
    #[must_use]
    pub fn present_kinds(&self) -> BTreeSet<FacilityKind> {
        self.facilities.iter().map(|f| f.kind.clone()).collect()
    }

    /// Record counts per kind, for the API and CLI summaries.
    #[must_use]
    pub fn kind_counts(&self) -> BTreeMap<FacilityKind, usize> {
        let mut counts = BTreeMap::new();
        for facility in &self.facilities {
            *counts.entry(facility.kind.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Returns `true` if the content starts with a JSON array once leading
/// whitespace is skipped.
fn looks_like_json_array(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[')
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_EXPORT: &str = r#"[
        {"編號": 1, "類型": "飲水機", "地址": "基隆路四段43號", "緯度": 25.0135, "經度": 121.5418},
        {"編號": 2, "類型": "公廁", "地址": "和平東路三段", "緯度": 25.0150, "經度": 121.5430, "樓層": "1F"},
        {"編號": 3, "類型": "垃圾桶", "地址": "", "緯度": "25.0173", "經度": "121.5400"},
        {"編號": 4, "類型": "寵物便清袋箱", "地址": "公園北側", "緯度": null, "經度": 121.55}
    ]"#;

    #[test]
    fn loads_the_published_json_shape() {
        let dataset = Dataset::from_json_slice(JSON_EXPORT.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dropped, 1);

        let kinds: Vec<FacilityKind> =
            dataset.facilities.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                FacilityKind::DrinkingFountain,
                FacilityKind::Restroom,
                FacilityKind::TrashCan,
            ]
        );

        // Row 3 has an empty address cell, which must not survive as "".
        assert_eq!(dataset.facilities[2].address, None);
        // Row 2's unrecognized column rides along.
        assert_eq!(
            dataset.facilities[1].extra.get("樓層"),
            Some(&serde_json::Value::String("1F".to_owned()))
        );
    }

    #[test]
    fn loads_csv_with_english_headers() {
        let csv_text = "id,type,address,lat,lng,note\n\
             10,drinking fountain,1F lobby,25.0135,121.5418,indoor\n\
             11,trash can,,25.0150,121.5430,\n\
             12,restroom,park,not-a-number,121.5400,\n";

        let dataset = Dataset::from_csv_reader(csv_text.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dropped, 1);
        assert_eq!(dataset.facilities[0].id, 10);
        assert_eq!(dataset.facilities[0].kind, FacilityKind::DrinkingFountain);
        assert_eq!(
            dataset.facilities[0].extra.get("note"),
            Some(&serde_json::Value::String("indoor".to_owned()))
        );
        // Empty CSV cells still land in extra as empty strings; addresses
        // do not.
        assert_eq!(dataset.facilities[1].address, None);
    }

    #[test]
    fn assigns_row_index_ids_when_the_export_has_none() {
        let json = r#"[
            {"type": "restroom", "lat": 25.0, "lng": 121.5},
            {"type": "trash can", "lat": 25.1, "lng": 121.6}
        ]"#;

        let dataset = Dataset::from_json_slice(json.as_bytes()).unwrap();
        let ids: Vec<u64> = dataset.facilities.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"[
            {"id": 5, "type": "restroom", "lat": 25.0, "lng": 121.5},
            {"id": 5, "type": "trash can", "lat": 25.1, "lng": 121.6}
        ]"#;

        let err = Dataset::from_json_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateId { id: 5 }));
    }

    #[test]
    fn rejects_empty_inputs() {
        assert!(matches!(
            Dataset::from_json_slice(b"[]"),
            Err(DatasetError::Empty)
        ));
        assert!(matches!(
            Dataset::from_csv_reader(&b"id,type,lat,lng\n"[..]),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn rejects_non_array_json() {
        assert!(matches!(
            Dataset::from_json_slice(b"{\"rows\": []}"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn counts_by_kind() {
        let dataset = Dataset::from_json_slice(JSON_EXPORT.as_bytes()).unwrap();
        let counts = dataset.kind_counts();
        assert_eq!(counts.get(&FacilityKind::DrinkingFountain), Some(&1));
        assert_eq!(counts.len(), 3);
        assert_eq!(dataset.present_kinds().len(), 3);
    }

    #[test]
    fn picks_format_by_extension_and_sniffing() {
        let tmp = std::env::temp_dir().join("amenity_map_dataset_test_load");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();

        let json_path = tmp.join("facilities.json");
        std::fs::write(&json_path, JSON_EXPORT).unwrap();
        assert_eq!(Dataset::load_path(&json_path).unwrap().len(), 3);

        // Extensionless file with JSON content is sniffed.
        let bare_path = tmp.join("facilities");
        std::fs::write(&bare_path, JSON_EXPORT).unwrap();
        assert_eq!(Dataset::load_path(&bare_path).unwrap().len(), 3);

        let odd_path = tmp.join("facilities.xlsx");
        std::fs::write(&odd_path, b"PK\x03\x04not-actually-parsed").unwrap();
        assert!(matches!(
            Dataset::load_path(&odd_path),
            Err(DatasetError::UnsupportedFormat { .. })
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
