#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the amenity map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the core ranking types to allow independent evolution of the API
//! contract.

use amenity_map_facility_models::{FacilityKind, PositionSource};
use amenity_map_proximity::descriptor::{MarkerDescriptor, UserMarker};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of usable facilities in the working set.
    pub facility_count: usize,
    /// When the working set was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// One entry in the kinds listing: a kind present in the working set.
///
/// The frontend builds its filter checkboxes from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKindEntry {
    /// Canonical kind value, usable in the `kinds` query parameter.
    pub kind: FacilityKind,
    /// Human-readable label.
    pub label: String,
    /// Number of facilities of this kind.
    pub count: usize,
}

/// A bare coordinate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPoint {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

/// Frontend bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Map center and user fallback when no position is available.
    pub default_center: ApiPoint,
    /// Default number of nearest facilities when a query has no `k`.
    pub nearest_count: usize,
    /// How often the frontend should re-request `/api/nearby`, in seconds.
    pub refresh_seconds: u64,
}

/// Query parameters for the nearby endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQueryParams {
    /// User latitude. Must be supplied together with `lng`.
    pub lat: Option<f64>,
    /// User longitude. Must be supplied together with `lat`.
    pub lng: Option<f64>,
    /// Comma-separated kind labels. Omitted means every kind in the
    /// working set; present but empty means an empty selection.
    pub kinds: Option<String>,
    /// Number of nearest facilities to emphasize.
    pub k: Option<usize>,
    /// How the supplied coordinates were obtained.
    pub source: Option<PositionSource>,
}

/// Response from the nearby endpoint: one complete ranking pass rendered
/// as marker descriptors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    /// The user's own marker, separate from every facility tier.
    pub user: UserMarker,
    /// `true` when no coordinates were supplied and the configured
    /// fallback location was used.
    pub using_default_location: bool,
    /// The k nearest facilities, ascending by distance.
    pub nearest: Vec<MarkerDescriptor>,
    /// Every other selected facility, unordered.
    pub remainder: Vec<MarkerDescriptor>,
}
