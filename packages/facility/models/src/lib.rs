#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Facility domain types shared across the amenity map toolchain.
//!
//! This crate defines the canonical facility record produced by the dataset
//! loader and consumed by the proximity ranker and the API server, plus the
//! user-location value every ranking pass is computed against. The types
//! carry no behavior beyond construction and validation; everything that
//! interprets them lives in the consuming crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Category label for a public facility.
///
/// The known variants cover the facility kinds the map was built for; any
/// other label found in a dataset is preserved verbatim in [`Self::Other`],
/// so the set of kinds stays open-ended. Canonical labels are kebab-case
/// (`"drinking-fountain"`, `"trash-can"`, ...).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "kebab-case")]
pub enum FacilityKind {
    /// Public drinking fountain / water dispenser.
    DrinkingFountain,
    /// Public restroom.
    Restroom,
    /// Public trash can.
    TrashCan,
    /// Pet-waste bag dispenser / disposal station.
    PetWasteStation,
    /// Publicly usable power outlet.
    PowerOutlet,
    /// Any label outside the known set, kept verbatim.
    #[strum(default)]
    Other(String),
}

impl FacilityKind {
    /// Returns the known (non-`Other`) kinds in canonical order.
    #[must_use]
    pub const fn known() -> &'static [Self] {
        const KNOWN: &[FacilityKind] = &[
            FacilityKind::DrinkingFountain,
            FacilityKind::Restroom,
            FacilityKind::TrashCan,
            FacilityKind::PetWasteStation,
            FacilityKind::PowerOutlet,
        ];
        KNOWN
    }

    /// Human-readable name, used for tooltips when a facility has no
    /// address text. `Other` labels are shown as-is.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::DrinkingFountain => "Drinking fountain",
            Self::Restroom => "Restroom",
            Self::TrashCan => "Trash can",
            Self::PetWasteStation => "Pet-waste station",
            Self::PowerOutlet => "Power outlet",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for FacilityKind {
    fn from(label: String) -> Self {
        label.parse().unwrap_or_else(|_| Self::Other(label))
    }
}

impl From<FacilityKind> for String {
    fn from(kind: FacilityKind) -> Self {
        kind.to_string()
    }
}

/// A public facility with a fixed geographic location.
///
/// Every record in a loaded working set satisfies the coordinate invariant:
/// both values present, finite, and inside WGS84 bounds. The loader
/// establishes it; [`Self::has_valid_coordinates`] lets consumers re-check
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
    /// Stable identifier. Taken from an explicit id column when the dataset
    /// has one, otherwise the zero-based row index at load time.
    pub id: u64,
    /// Facility category.
    pub kind: FacilityKind,
    /// Free-text address or place description, display-only.
    pub address: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Source fields not interpreted anywhere in the toolchain, passed
    /// through for display and export.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FacilityRecord {
    /// Returns `true` if this record's coordinates are finite and in range.
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }

    /// Display label for this facility: the address when present and
    /// non-empty, otherwise the kind's human-readable name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        match self.address.as_deref() {
            Some(address) if !address.trim().is_empty() => address,
            _ => self.kind.display_name(),
        }
    }
}

/// How the user's current coordinates were obtained.
///
/// Informational only: the ranking result does not depend on it, but the
/// renderer styles the user marker and warning banner from it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PositionSource {
    /// Browser/device geolocation.
    Gps,
    /// Manually entered address, resolved by an external geocoder.
    ManualAddress,
    /// No positioning source has succeeded; the fixed fallback point is in
    /// use.
    #[serde(rename = "default")]
    #[strum(serialize = "default")]
    Fallback,
}

/// Latitude of the built-in fallback point (the original map's center, the
/// NTUST campus in Taipei).
pub const FALLBACK_LATITUDE: f64 = 25.0135;
/// Longitude of the built-in fallback point.
pub const FALLBACK_LONGITUDE: f64 = 121.5418;

/// The user's current position, as supplied by an external positioning
/// provider (device GPS, manual address lookup, or the fallback point).
///
/// Ranking always receives a concrete location; callers substitute
/// [`Self::fallback`] when no positioning source has succeeded rather than
/// passing anything absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Where the coordinates came from.
    pub source: PositionSource,
}

impl UserLocation {
    /// Creates a user location from explicit coordinates.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, source: PositionSource) -> Self {
        Self {
            latitude,
            longitude,
            source,
        }
    }

    /// The built-in fallback location.
    #[must_use]
    pub const fn fallback() -> Self {
        Self::fallback_at(FALLBACK_LATITUDE, FALLBACK_LONGITUDE)
    }

    /// A fallback location at a configured point (e.g. from the server
    /// config), tagged with [`PositionSource::Fallback`].
    #[must_use]
    pub const fn fallback_at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            source: PositionSource::Fallback,
        }
    }

    /// Returns `true` if the coordinates are finite and in range.
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        valid_coordinates(self.latitude, self.longitude)
    }
}

/// Returns `true` if both values are finite and inside WGS84 bounds.
#[must_use]
pub fn valid_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}
