//! HTTP handler functions for the amenity map API.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, web};
use amenity_map_facility_models::{FacilityKind, PositionSource, UserLocation};
use amenity_map_proximity::descriptor::{MarkerDescriptor, UserMarker};
use amenity_map_proximity::{RankError, rank};
use amenity_map_server_models::{
    ApiConfig, ApiHealth, ApiKindEntry, ApiPoint, NearbyQueryParams, NearbyResponse,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        facility_count: state.dataset.len(),
        loaded_at: state.dataset.loaded_at,
    })
}

/// `GET /api/kinds`
///
/// Lists the kinds present in the working set with their record counts.
pub async fn kinds(state: web::Data<AppState>) -> HttpResponse {
    let entries: Vec<ApiKindEntry> = state
        .dataset
        .kind_counts()
        .into_iter()
        .map(|(kind, count)| ApiKindEntry {
            label: kind.display_name().to_owned(),
            kind,
            count,
        })
        .collect();

    HttpResponse::Ok().json(entries)
}

/// `GET /api/config`
///
/// Frontend bootstrap values: fallback center, default `k`, and the
/// re-rank cadence.
pub async fn config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiConfig {
        default_center: ApiPoint {
            lat: state.config.default_location.lat,
            lng: state.config.default_location.lng,
        },
        nearest_count: state.config.nearest_count,
        refresh_seconds: state.config.refresh_seconds,
    })
}

/// `GET /api/nearby`
///
/// Runs one complete ranking pass for the supplied (or fallback) user
/// position and returns the tiered marker descriptors.
pub async fn nearby(
    state: web::Data<AppState>,
    params: web::Query<NearbyQueryParams>,
) -> HttpResponse {
    let Some((user, using_default_location)) = resolve_user_location(
        &params,
        state.config.default_location.lat,
        state.config.default_location.lng,
    ) else {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "lat and lng must be supplied together"
        }));
    };

    let selected = params
        .kinds
        .as_deref()
        .map_or_else(|| state.dataset.present_kinds(), parse_kinds);

    let k = params.k.unwrap_or(state.config.nearest_count);

    match rank(&state.dataset.facilities, user, &selected, k) {
        Ok(ranking) => {
            let nearest: Vec<MarkerDescriptor> = ranking
                .nearest
                .iter()
                .map(MarkerDescriptor::for_facility)
                .collect();
            let remainder: Vec<MarkerDescriptor> = ranking
                .remainder
                .iter()
                .map(MarkerDescriptor::for_facility)
                .collect();

            HttpResponse::Ok().json(NearbyResponse {
                user: UserMarker::from(user),
                using_default_location,
                nearest,
                remainder,
            })
        }
        Err(e @ RankError::InvalidArgument { .. }) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e @ RankError::MalformedRecord { .. }) => {
            log::error!("working set invariant violated: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "malformed facility record"
            }))
        }
    }
}

/// Picks the user location for a nearby query.
///
/// Both coordinates present: used as-is, `source` from the query (`gps`
/// when unspecified). Both absent: the configured fallback, flagged so the
/// frontend can warn. One without the other: `None`, a client error.
fn resolve_user_location(
    params: &NearbyQueryParams,
    fallback_lat: f64,
    fallback_lng: f64,
) -> Option<(UserLocation, bool)> {
    match (params.lat, params.lng) {
        (Some(lat), Some(lng)) => Some((
            UserLocation::new(lat, lng, params.source.unwrap_or(PositionSource::Gps)),
            false,
        )),
        (None, None) => Some((UserLocation::fallback_at(fallback_lat, fallback_lng), true)),
        _ => None,
    }
}

/// Parses the comma-separated `kinds` query value.
///
/// An empty value is an explicit empty selection. Unknown labels become
/// [`FacilityKind::Other`] and simply match nothing.
fn parse_kinds(list: &str) -> BTreeSet<FacilityKind> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| FacilityKind::from(s.to_owned()))
        .collect()
}
