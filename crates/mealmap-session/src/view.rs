//! Presentation-ready projections of session state.
//!
//! Pure functions from domain types to display rows, groups, and map
//! points. Nothing here calls the network or mutates the session.

use mealmap_core::{CountryBucket, GeoCoordinate, IngredientRecord, NutriScore, NutrientKind};

/// One line of the nutrition breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientRow {
    pub label: &'static str,
    pub ratio: f64,
    /// Ratio formatted to two decimal places.
    pub formatted: String,
    /// `true` when the ratio is at or below the 1.0 target; exactly 1.0 is
    /// within target.
    pub within_target: bool,
}

/// Builds the nutrition breakdown in fixed nutrient order (Energy,
/// Carbohydrates, Proteins, Fat). Nutrients the service did not report are
/// omitted rather than shown empty.
#[must_use]
pub fn nutrition_rows(score: &NutriScore) -> Vec<NutrientRow> {
    NutrientKind::ALL
        .into_iter()
        .filter_map(|nutrient| {
            let ratio = score.ratio(nutrient)?;
            Some(NutrientRow {
                label: nutrient.label(),
                ratio,
                formatted: format!("{ratio:.2}"),
                within_target: ratio <= 1.0,
            })
        })
        .collect()
}

/// Supplier records sharing a geographic-origin bucket.
#[derive(Debug)]
pub struct OriginGroup<'a> {
    pub bucket: CountryBucket,
    pub members: Vec<&'a IngredientRecord>,
}

/// Groups records into the four fixed origin buckets in display order.
/// Buckets with no members are omitted from the output, not shown empty.
#[must_use]
pub fn group_by_origin(records: &[IngredientRecord]) -> Vec<OriginGroup<'_>> {
    CountryBucket::ALL
        .into_iter()
        .filter_map(|bucket| {
            let members: Vec<&IngredientRecord> =
                records.iter().filter(|r| r.bucket == bucket).collect();
            if members.is_empty() {
                None
            } else {
                Some(OriginGroup { bucket, members })
            }
        })
        .collect()
}

/// Splits records into (has coordinate, no coordinate) without discarding
/// either group.
#[must_use]
pub fn partition_by_location(
    records: &[IngredientRecord],
) -> (Vec<&IngredientRecord>, Vec<&IngredientRecord>) {
    records.iter().partition(|r| r.coordinate.is_some())
}

/// Points to plot: the user's location first, then each located supplier in
/// record order.
#[must_use]
pub fn map_points(user: GeoCoordinate, records: &[IngredientRecord]) -> Vec<GeoCoordinate> {
    std::iter::once(user)
        .chain(records.iter().filter_map(|r| r.coordinate))
        .collect()
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points (haversine). Used to fill in
/// supplier distances the origin endpoint does not compute.
#[must_use]
pub fn distance_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
