#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Proximity ranking core for the amenity map.
//!
//! Given the session's facility working set, the user's current location,
//! and a kind filter, [`rank`] partitions the filtered facilities into the
//! `k` nearest (ordered, emphasized on the map) and the remainder. The
//! computation is pure and stateless: it never mutates its inputs and holds
//! nothing between calls, so a location update or a refresh tick simply
//! calls it again.
//!
//! Distances are great-circle meters from a single spherical model for the
//! whole pass; equal distances are ordered by record id so repeated runs
//! over the same inputs always produce the same output.

pub mod descriptor;
mod distance;

pub use distance::great_circle_meters;

use std::collections::BTreeSet;

use amenity_map_facility_models::{FacilityKind, FacilityRecord, UserLocation};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Marker emphasis tier for a ranked facility.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tier {
    /// One of the k closest facilities; rendered large, tooltip carries the
    /// distance.
    Nearest,
    /// Any other filtered facility; rendered small, tooltip has no distance.
    Normal,
}

/// A facility with its computed distance from the user and display tier.
///
/// Derived on demand, never stored: a pure function of (working set, user
/// location, kind filter, k).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFacility {
    /// The underlying facility record.
    pub facility: FacilityRecord,
    /// Great-circle distance from the user, in meters. Non-negative and
    /// finite.
    pub distance_meters: f64,
    /// Display tier.
    pub tier: Tier,
}

/// Result of one complete ranking pass.
///
/// `nearest` and `remainder` are disjoint and together contain exactly the
/// facilities whose kind was selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    /// The `min(k, filtered)` closest facilities, ascending by distance,
    /// ties broken by ascending id.
    pub nearest: Vec<RankedFacility>,
    /// Every other filtered facility, tier [`Tier::Normal`]. No ordering is
    /// part of the contract, but the order is deterministic for identical
    /// inputs.
    pub remainder: Vec<RankedFacility>,
}

impl Ranking {
    /// Total number of facilities that passed the kind filter.
    #[must_use]
    pub const fn filtered_count(&self) -> usize {
        self.nearest.len() + self.remainder.len()
    }
}

/// Errors from the proximity ranker.
///
/// Both are caller-fixable input problems; the ranker never retries or
/// masks them.
#[derive(Debug, Error)]
pub enum RankError {
    /// The user location is unusable: a coordinate is non-finite or outside
    /// WGS84 bounds.
    #[error("invalid user location: latitude {latitude}, longitude {longitude}")]
    InvalidArgument {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },

    /// A facility with non-finite or out-of-range coordinates reached the
    /// ranker. The loader drops such rows before they enter the working
    /// set, so this error means the input slice was built some other way.
    #[error("facility {id} has malformed coordinates: latitude {latitude}, longitude {longitude}")]
    MalformedRecord {
        /// Id of the offending record.
        id: u64,
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },
}

/// Ranks `facilities` by great-circle distance from `user`.
///
/// Facilities whose kind is not in `selected_kinds` are ignored. An empty
/// `selected_kinds` yields empty outputs rather than falling back to every
/// kind. An empty `facilities` slice is not an error either.
///
/// The first `min(k, filtered)` facilities by (distance, id) become
/// [`Tier::Nearest`]; the rest are the [`Tier::Normal`] remainder. Input
/// records are cloned, never mutated.
///
/// # Errors
///
/// * [`RankError::InvalidArgument`] if `user` has non-finite or
///   out-of-range coordinates.
/// * [`RankError::MalformedRecord`] if any facility in `facilities` has
///   non-finite or out-of-range coordinates, regardless of the kind filter.
pub fn rank(
    facilities: &[FacilityRecord],
    user: UserLocation,
    selected_kinds: &BTreeSet<FacilityKind>,
    k: usize,
) -> Result<Ranking, RankError> {
    if !user.has_valid_coordinates() {
        return Err(RankError::InvalidArgument {
            latitude: user.latitude,
            longitude: user.longitude,
        });
    }

    // Reject malformed records before any distance math, whether or not
    // their kind is selected.
    if let Some(bad) = facilities.iter().find(|f| !f.has_valid_coordinates()) {
        return Err(RankError::MalformedRecord {
            id: bad.id,
            latitude: bad.latitude,
            longitude: bad.longitude,
        });
    }

    if selected_kinds.is_empty() {
        return Ok(Ranking {
            nearest: Vec::new(),
            remainder: Vec::new(),
        });
    }

    let mut ranked: Vec<RankedFacility> = facilities
        .iter()
        .filter(|f| selected_kinds.contains(&f.kind))
        .map(|f| RankedFacility {
            distance_meters: great_circle_meters(
                user.latitude,
                user.longitude,
                f.latitude,
                f.longitude,
            ),
            facility: f.clone(),
            tier: Tier::Normal,
        })
        .collect();

    // One total order for the whole pass. `total_cmp` is safe here: every
    // distance is finite after the validation above.
    ranked.sort_by(|a, b| {
        a.distance_meters
            .total_cmp(&b.distance_meters)
            .then_with(|| a.facility.id.cmp(&b.facility.id))
    });

    let remainder = ranked.split_off(k.min(ranked.len()));
    for item in &mut ranked {
        item.tier = Tier::Nearest;
    }

    Ok(Ranking {
        nearest: ranked,
        remainder,
    })
}
