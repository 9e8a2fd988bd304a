//! Domain types shared across the mealmap crates.
//!
//! Everything here is owned by a single browsing session: nothing is
//! persisted or shared across sessions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The meal type a nutrition score is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// The wire value sent to the scoring service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            other => Err(format!(
                "unknown meal type '{other}' (expected breakfast, lunch, or dinner)"
            )),
        }
    }
}

/// The fixed set of nutrients the scoring service reports ratios for.
///
/// Only these four are ever rendered; unknown keys in a response are
/// ignored and missing keys are simply not shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NutrientKind {
    Energy,
    Carbohydrates,
    Proteins,
    Fat,
}

impl NutrientKind {
    /// All nutrients in display order.
    pub const ALL: [NutrientKind; 4] = [
        NutrientKind::Energy,
        NutrientKind::Carbohydrates,
        NutrientKind::Proteins,
        NutrientKind::Fat,
    ];

    /// The JSON key used by the scoring service for this nutrient's ratio.
    #[must_use]
    pub fn wire_key(self) -> &'static str {
        match self {
            NutrientKind::Energy => "Energy_ratio",
            NutrientKind::Carbohydrates => "Carbohydrates_ratio",
            NutrientKind::Proteins => "Proteins_ratio",
            NutrientKind::Fat => "Fat_ratio",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            NutrientKind::Energy => "Energy",
            NutrientKind::Carbohydrates => "Carbohydrates",
            NutrientKind::Proteins => "Proteins",
            NutrientKind::Fat => "Fat",
        }
    }

    /// Maps a wire key back to the nutrient, if it is one of the fixed set.
    #[must_use]
    pub fn from_wire_key(key: &str) -> Option<Self> {
        NutrientKind::ALL.into_iter().find(|n| n.wire_key() == key)
    }
}

/// Nutrient ratios for one (recipe, meal type) pair. A ratio of 1.0 is the
/// ideal target; values above 1.0 exceed it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutriScore {
    ratios: BTreeMap<NutrientKind, f64>,
}

impl NutriScore {
    /// Builds a score from (nutrient, ratio) pairs. Later duplicates win.
    #[must_use]
    pub fn from_ratios(pairs: impl IntoIterator<Item = (NutrientKind, f64)>) -> Self {
        Self {
            ratios: pairs.into_iter().collect(),
        }
    }

    /// The ratio for one nutrient, if the service reported it.
    #[must_use]
    pub fn ratio(&self, nutrient: NutrientKind) -> Option<f64> {
        self.ratios.get(&nutrient).copied()
    }

    /// `true` when the service reported none of the recognized nutrients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}

/// A WGS84 point, produced by geocoding or carried on a supplier record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Coarse geographic-origin classification used only for grouping.
///
/// The wire format is an integer code 0–3; anything absent or unparseable
/// falls back to [`CountryBucket::International`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CountryBucket {
    IleDeFrance,
    France,
    Europe,
    International,
}

impl CountryBucket {
    /// All buckets in display order.
    pub const ALL: [CountryBucket; 4] = [
        CountryBucket::IleDeFrance,
        CountryBucket::France,
        CountryBucket::Europe,
        CountryBucket::International,
    ];

    /// Maps a wire code to a bucket. Unknown codes group as international.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => CountryBucket::IleDeFrance,
            1 => CountryBucket::France,
            2 => CountryBucket::Europe,
            _ => CountryBucket::International,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CountryBucket::IleDeFrance => "Île-de-France / Local",
            CountryBucket::France => "France",
            CountryBucket::Europe => "Europe",
            CountryBucket::International => "International",
        }
    }
}

impl fmt::Display for CountryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One matched ingredient supplier, normalized from either supplier-service
/// response shape.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRecord {
    pub matched_product: String,
    pub bucket: CountryBucket,
    pub is_local_supplier: bool,
    /// Present only when the service returned both a numeric latitude and
    /// longitude for the supplier.
    pub coordinate: Option<GeoCoordinate>,
    pub distance_km: Option<f64>,
}
