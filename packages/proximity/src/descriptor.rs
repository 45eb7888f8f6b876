//! Render descriptors for map markers.
//!
//! The ranker decides which tier a facility belongs to; this module turns
//! ranked facilities and the user location into the flat, renderer-agnostic
//! structs the frontend consumes. Tooltip policy lives here and nowhere
//! else: nearest markers carry the distance rounded to whole meters, and
//! normal markers carry the label alone.

use amenity_map_facility_models::{FacilityKind, PositionSource, UserLocation};
use serde::{Deserialize, Serialize};

use crate::{RankedFacility, Tier};

/// A facility marker ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDescriptor {
    /// Marker latitude in degrees.
    pub latitude: f64,
    /// Marker longitude in degrees.
    pub longitude: f64,
    /// Facility kind, for icon selection.
    pub kind: FacilityKind,
    /// Tooltip text. Distance appears only on [`Tier::Nearest`] markers.
    pub tooltip: String,
    /// Display tier.
    pub tier: Tier,
}

impl MarkerDescriptor {
    /// Builds the descriptor for one ranked facility.
    ///
    /// Nearest markers get `"<label> (<n> m)"` with the distance rounded
    /// to the nearest whole meter; normal markers get the label alone.
    /// The label is the facility's address when it has one, otherwise the
    /// kind's display name.
    #[must_use]
    pub fn for_facility(ranked: &RankedFacility) -> Self {
        let label = ranked.facility.display_label();
        let tooltip = match ranked.tier {
            Tier::Nearest => {
                format!("{label} ({} m)", rounded_meters(ranked.distance_meters))
            }
            Tier::Normal => label.to_owned(),
        };
        Self {
            latitude: ranked.facility.latitude,
            longitude: ranked.facility.longitude,
            kind: ranked.facility.kind.clone(),
            tooltip,
            tier: ranked.tier,
        }
    }
}

/// The user's own marker. A separate type from [`MarkerDescriptor`] so the
/// user pin can never appear in a facility tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMarker {
    /// Marker latitude in degrees.
    pub latitude: f64,
    /// Marker longitude in degrees.
    pub longitude: f64,
    /// How the position was obtained.
    pub source: PositionSource,
}

impl From<UserLocation> for UserMarker {
    fn from(location: UserLocation) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
            source: location.source,
        }
    }
}

/// Rounds a distance to whole meters for tooltip display.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rounded_meters(distance: f64) -> u64 {
    distance.round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use amenity_map_facility_models::FacilityRecord;

    use super::*;

    fn ranked(tier: Tier, address: Option<&str>, distance_meters: f64) -> RankedFacility {
        RankedFacility {
            facility: FacilityRecord {
                id: 7,
                kind: FacilityKind::DrinkingFountain,
                address: address.map(str::to_owned),
                latitude: 25.0135,
                longitude: 121.5418,
                extra: BTreeMap::new(),
            },
            distance_meters,
            tier,
        }
    }

    #[test]
    fn nearest_tooltip_carries_rounded_distance() {
        let descriptor =
            MarkerDescriptor::for_facility(&ranked(Tier::Nearest, Some("信義路五段7號"), 83.4));
        assert_eq!(descriptor.tooltip, "信義路五段7號 (83 m)");
        assert_eq!(descriptor.tier, Tier::Nearest);
    }

    #[test]
    fn distance_rounds_to_nearest_whole_meter() {
        let up = MarkerDescriptor::for_facility(&ranked(Tier::Nearest, Some("A"), 83.5));
        assert_eq!(up.tooltip, "A (84 m)");
        let down = MarkerDescriptor::for_facility(&ranked(Tier::Nearest, Some("A"), 0.4));
        assert_eq!(down.tooltip, "A (0 m)");
    }

    #[test]
    fn normal_tooltip_is_label_only() {
        let descriptor =
            MarkerDescriptor::for_facility(&ranked(Tier::Normal, Some("信義路五段7號"), 83.4));
        assert_eq!(descriptor.tooltip, "信義路五段7號");
        assert!(!descriptor.tooltip.contains(" m)"));
    }

    #[test]
    fn missing_address_falls_back_to_kind_name() {
        let descriptor = MarkerDescriptor::for_facility(&ranked(Tier::Normal, None, 12.0));
        assert_eq!(descriptor.tooltip, "Drinking fountain");
    }

    #[test]
    fn user_marker_keeps_position_and_source() {
        let marker = UserMarker::from(UserLocation::new(
            25.0330,
            121.5654,
            PositionSource::ManualAddress,
        ));
        assert!((marker.latitude - 25.0330).abs() < 1e-9);
        assert!((marker.longitude - 121.5654).abs() < 1e-9);
        assert_eq!(marker.source, PositionSource::ManualAddress);
    }
}
