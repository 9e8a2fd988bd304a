//! Wire types for the remote services.
//!
//! The supplier endpoint has two response shapes in the wild (`matches` vs
//! `ingredients`) and its record fields arrive as a mix of numbers, numeric
//! strings, and nulls. Fields with unstable types are kept as
//! `serde_json::Value` here and resolved once in [`crate::normalize`].

use serde::Deserialize;

/// Response from `POST /ingredients/predict`.
///
/// Either field may be present; [`SupplierResponse::into_raw_records`]
/// resolves the two shapes into one list.
#[derive(Debug, Default, Deserialize)]
pub struct SupplierResponse {
    #[serde(default)]
    pub matches: Option<Vec<RawSupplier>>,
    #[serde(default)]
    pub ingredients: Option<Vec<RawSupplier>>,
}

impl SupplierResponse {
    /// Picks the record list: the first non-empty field wins, in the order
    /// `matches` then `ingredients`. Neither present or both empty is an
    /// empty list, not an error.
    #[must_use]
    pub fn into_raw_records(self) -> Vec<RawSupplier> {
        match (self.matches, self.ingredients) {
            (Some(matches), _) if !matches.is_empty() => matches,
            (_, Some(ingredients)) if !ingredients.is_empty() => ingredients,
            _ => Vec::new(),
        }
    }
}

/// One supplier record as the service sends it, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSupplier {
    #[serde(default)]
    pub matched_product: Option<String>,
    /// Number or numeric string; anything else means "no coordinate".
    #[serde(default)]
    pub latitude: Option<serde_json::Value>,
    #[serde(default)]
    pub longitude: Option<serde_json::Value>,
    #[serde(default)]
    pub distance_km: Option<serde_json::Value>,
    #[serde(default)]
    pub is_idf_supplier: Option<bool>,
    /// Integer code 0–3, but observed as strings and nulls too.
    #[serde(default)]
    pub country_code: Option<serde_json::Value>,
}

/// Response from `POST /recipe`.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeResponse {
    #[serde(default)]
    pub quantities_g: Vec<RawSupplier>,
}

/// One result from the geocoder's `GET /search` endpoint.
///
/// Nominatim sends `lat`/`lon` as strings; keep them loose and parse in the
/// client so numeric variants also work.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeHit {
    pub lat: serde_json::Value,
    pub lon: serde_json::Value,
}
