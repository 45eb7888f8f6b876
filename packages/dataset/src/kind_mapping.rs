//! Facility kind mapping utilities.
//!
//! Maps raw dataset labels to the canonical [`FacilityKind`] taxonomy. The
//! published exports carry Chinese labels, hand-edited copies often mix in
//! English ones, so we use keyword detection rather than exact matching.

use amenity_map_facility_models::FacilityKind;

/// Maps a raw facility label from any dataset to the canonical kind.
///
/// Keyword-based and case-insensitive. Labels that match nothing are kept
/// verbatim (trimmed) as [`FacilityKind::Other`] so unknown categories
/// still make it onto the map.
#[must_use]
pub fn map_kind_label(raw: &str) -> FacilityKind {
    let lower = raw.trim().to_lowercase();

    // Pet waste before trash: "pet-waste-station" and 寵物便袋 would
    // otherwise hit the generic waste keywords.
    if contains_any(&lower, &["寵物", "狗便", "pet"]) {
        return FacilityKind::PetWasteStation;
    }
    if contains_any(&lower, &["飲水", "drinking", "water fountain"]) {
        return FacilityKind::DrinkingFountain;
    }
    if contains_any(
        &lower,
        &["廁", "洗手間", "restroom", "toilet", "washroom", "bathroom"],
    ) {
        return FacilityKind::Restroom;
    }
    if contains_any(&lower, &["垃圾", "trash", "garbage", "rubbish", "waste"]) {
        return FacilityKind::TrashCan;
    }
    if contains_any(
        &lower,
        &["插座", "充電", "outlet", "socket", "charging", "power"],
    ) {
        return FacilityKind::PowerOutlet;
    }

    FacilityKind::Other(raw.trim().to_owned())
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
