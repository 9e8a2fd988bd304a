//! Normalization from raw supplier records to [`mealmap_core::IngredientRecord`].
//!
//! The supplier services are lenient about field types; this module resolves
//! each loose field exactly once so the rest of the system never sees
//! `serde_json::Value`.

use mealmap_core::{CountryBucket, GeoCoordinate, IngredientRecord};

use crate::types::RawSupplier;

/// Normalizes one raw supplier record.
///
/// Field rules:
/// - `matched_product`: empty or absent becomes `"Unknown"`.
/// - `country_code`: integer, numeric string, or whole float; anything else
///   (including absence) groups as [`CountryBucket::International`].
/// - coordinate: set only when both `latitude` and `longitude` are finite
///   numbers or numeric strings.
/// - `distance_km`: finite number or numeric string, else unset.
#[must_use]
pub fn normalize_supplier(raw: RawSupplier) -> IngredientRecord {
    let matched_product = raw
        .matched_product
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let bucket = raw
        .country_code
        .as_ref()
        .and_then(value_as_i64)
        .map_or(CountryBucket::International, CountryBucket::from_code);

    let coordinate = match (
        raw.latitude.as_ref().and_then(value_as_f64),
        raw.longitude.as_ref().and_then(value_as_f64),
    ) {
        (Some(latitude), Some(longitude)) => Some(GeoCoordinate::new(latitude, longitude)),
        _ => None,
    };

    let distance_km = raw.distance_km.as_ref().and_then(value_as_f64);

    IngredientRecord {
        matched_product,
        bucket,
        is_local_supplier: raw.is_idf_supplier.unwrap_or(false),
        coordinate,
        distance_km,
    }
}

/// Reads a JSON value as a finite float: accepts numbers and numeric strings.
pub(crate) fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Reads a JSON value as an integer: accepts integers, integer strings, and
/// whole floats (truncated).
fn value_as_i64(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}
