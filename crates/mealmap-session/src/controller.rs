//! The query/result state machine for one browsing session.
//!
//! Cache keys decide remote calls: the nutrition score is keyed by
//! (recipe, meal type), the geocode by the normalized address, and the
//! supplier list by (recipe, coordinate). An operation whose key matches the
//! last fetched key returns the cached value without a call; any key
//! component change invalidates the entry. A new recipe invalidates
//! everything downstream; a new address invalidates supplier data only.
//!
//! Events are processed one at a time to completion: every operation takes
//! `&mut self`, so no two remote calls for the same key can be in flight and
//! state is written only after a call returns inside the same exclusive
//! borrow. A caller that drops an in-flight future (cancel-and-restart)
//! leaves state untouched, so a late response is never applied.

use mealmap_core::{GeoCoordinate, IngredientRecord, MealType, NutriScore};
use mealmap_remote::{GeocodeClient, RecipeApiClient, RemoteError};

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq)]
struct ScoreKey {
    recipe: String,
    meal: MealType,
}

#[derive(Debug, Clone, PartialEq)]
struct SupplierKey {
    recipe: String,
    coordinate: GeoCoordinate,
}

/// Owns the user's current selections and the most recent remote results.
pub struct SessionController {
    api: RecipeApiClient,
    geocoder: GeocodeClient,

    recipe: Option<String>,
    meal: Option<MealType>,
    address_raw: String,
    address_normalized: String,

    coordinate: Option<GeoCoordinate>,
    nutri_score: Option<NutriScore>,
    ingredients: Vec<IngredientRecord>,
    ingredients_stale: bool,
    origins: Vec<IngredientRecord>,

    score_key: Option<ScoreKey>,
    geocoded_address: Option<String>,
    supplier_key: Option<SupplierKey>,
    origins_key: Option<String>,
}

impl SessionController {
    #[must_use]
    pub fn new(api: RecipeApiClient, geocoder: GeocodeClient) -> Self {
        Self {
            api,
            geocoder,
            recipe: None,
            meal: None,
            address_raw: String::new(),
            address_normalized: String::new(),
            coordinate: None,
            nutri_score: None,
            ingredients: Vec::new(),
            ingredients_stale: false,
            origins: Vec::new(),
            score_key: None,
            geocoded_address: None,
            supplier_key: None,
            origins_key: None,
        }
    }

    /// Replaces the recipe selection and resets everything downstream:
    /// meal type, score, coordinate, supplier and origin data, and all
    /// cache keys. Makes no remote call.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyRecipe`] for a blank name; state is
    /// unchanged in that case.
    pub fn submit_recipe(&mut self, name: &str) -> Result<(), SessionError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyRecipe);
        }

        self.recipe = Some(trimmed.to_owned());
        self.meal = None;
        self.nutri_score = None;
        self.score_key = None;
        self.coordinate = None;
        self.geocoded_address = None;
        self.ingredients.clear();
        self.ingredients_stale = false;
        self.supplier_key = None;
        self.origins.clear();
        self.origins_key = None;

        tracing::debug!(recipe = trimmed, "recipe selected, session reset");
        Ok(())
    }

    /// Sets the meal type and ensures a nutrition score is loaded for the
    /// current (recipe, meal type) pair. Selecting the same pair twice in
    /// succession issues exactly one remote call.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoRecipeSelected`] if no recipe has been submitted.
    /// - [`SessionError::Remote`] if the scoring call fails; the previously
    ///   cached score (if any) stays intact.
    pub async fn select_meal_type(&mut self, meal: MealType) -> Result<(), SessionError> {
        let recipe = self
            .recipe
            .clone()
            .ok_or(SessionError::NoRecipeSelected)?;
        self.meal = Some(meal);

        let key = ScoreKey { recipe, meal };
        if self.score_key.as_ref() == Some(&key) && self.nutri_score.is_some() {
            return Ok(());
        }

        let score = self
            .api
            .nutri_score(&key.recipe, key.meal)
            .await
            .map_err(|source| SessionError::Remote {
                operation: "nutri_score",
                source,
            })?;

        self.nutri_score = Some(score);
        self.score_key = Some(key);
        Ok(())
    }

    /// Records the address and ensures it is geocoded, reusing the cached
    /// coordinate when the normalized text matches the last successfully
    /// geocoded value. A changed coordinate invalidates supplier data
    /// (records are kept but flagged stale); the nutrition score is
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`SessionError::EmptyAddress`] for blank input; no state change.
    /// - [`SessionError::AddressNotFound`] when the geocoder has no result;
    ///   the coordinate stays as it was.
    /// - [`SessionError::Remote`] on geocoder failure; state unchanged.
    pub async fn submit_address(&mut self, text: &str) -> Result<GeoCoordinate, SessionError> {
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(SessionError::EmptyAddress);
        }

        self.address_raw = text.to_owned();
        self.address_normalized = normalized.to_owned();

        if self.geocoded_address.as_deref() == Some(normalized) {
            if let Some(coordinate) = self.coordinate {
                return Ok(coordinate);
            }
        }

        let coordinate =
            self.geocoder
                .search(normalized)
                .await
                .map_err(|source| match source {
                    RemoteError::AddressNotFound { query } => {
                        SessionError::AddressNotFound { query }
                    }
                    source => SessionError::Remote {
                        operation: "geocode",
                        source,
                    },
                })?;

        self.coordinate = Some(coordinate);
        self.geocoded_address = Some(normalized.to_owned());

        // Coordinate changed, so previously fetched supplier distances are
        // stale. Keep the records: stale data beats a blank screen.
        self.supplier_key = None;
        if !self.ingredients.is_empty() {
            self.ingredients_stale = true;
        }

        tracing::debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "address geocoded"
        );
        Ok(coordinate)
    }

    /// Ensures supplier predictions are loaded for the current
    /// (recipe, coordinate) pair, reusing the cache when the key matches and
    /// the data is not stale.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoRecipeSelected`] / [`SessionError::NoCoordinate`]
    ///   when the preconditions are missing.
    /// - [`SessionError::Remote`] if the call fails; previous records are
    ///   kept but remain flagged stale until the next successful fetch.
    pub async fn fetch_ingredients(&mut self) -> Result<&[IngredientRecord], SessionError> {
        let recipe = self
            .recipe
            .clone()
            .ok_or(SessionError::NoRecipeSelected)?;
        let coordinate = self.coordinate.ok_or(SessionError::NoCoordinate)?;

        let key = SupplierKey { recipe, coordinate };
        let cached = !self.ingredients_stale && self.supplier_key.as_ref() == Some(&key);
        if !cached {
            match self.api.predict_suppliers(&key.recipe, Some(coordinate)).await {
                Ok(records) => {
                    self.ingredients = records;
                    self.supplier_key = Some(key);
                    self.ingredients_stale = false;
                }
                Err(source) => {
                    self.ingredients_stale = true;
                    return Err(SessionError::Remote {
                        operation: "predict_suppliers",
                        source,
                    });
                }
            }
        }

        Ok(&self.ingredients)
    }

    /// Ensures the recipe's ingredient origins are loaded, cached by recipe
    /// name.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoRecipeSelected`] if no recipe has been submitted.
    /// - [`SessionError::Remote`] if the call fails; previous records are
    ///   kept.
    pub async fn fetch_origins(&mut self) -> Result<&[IngredientRecord], SessionError> {
        let recipe = self
            .recipe
            .clone()
            .ok_or(SessionError::NoRecipeSelected)?;

        if self.origins_key.as_deref() != Some(recipe.as_str()) {
            match self.api.recipe_origins(&recipe).await {
                Ok(records) => {
                    self.origins = records;
                    self.origins_key = Some(recipe);
                }
                Err(source) => {
                    return Err(SessionError::Remote {
                        operation: "recipe_origins",
                        source,
                    });
                }
            }
        }

        Ok(&self.origins)
    }

    #[must_use]
    pub fn recipe(&self) -> Option<&str> {
        self.recipe.as_deref()
    }

    #[must_use]
    pub fn meal_type(&self) -> Option<MealType> {
        self.meal
    }

    /// The normalized (trimmed) address text, empty until one is submitted.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address_normalized
    }

    /// The address exactly as the user typed it.
    #[must_use]
    pub fn address_raw(&self) -> &str {
        &self.address_raw
    }

    #[must_use]
    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        self.coordinate
    }

    #[must_use]
    pub fn nutri_score(&self) -> Option<&NutriScore> {
        self.nutri_score.as_ref()
    }

    /// The most recent supplier records. Check [`Self::ingredients_stale`]
    /// before trusting distances: records survive an address change and a
    /// failed re-fetch, but are flagged until the next successful fetch.
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientRecord] {
        &self.ingredients
    }

    #[must_use]
    pub fn ingredients_stale(&self) -> bool {
        self.ingredients_stale
    }

    #[must_use]
    pub fn origins(&self) -> &[IngredientRecord] {
        &self.origins
    }
}
