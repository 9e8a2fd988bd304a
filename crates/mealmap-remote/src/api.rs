//! HTTP client for the recipe API (score, supplier prediction, origins).
//!
//! Wraps `reqwest` with typed response handling. The deployment serves all
//! three endpoints under one base URL; every call is a JSON `POST` and every
//! data-shape problem is surfaced as [`RemoteError::DataShape`] with the
//! offending field name.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::json;

use mealmap_core::{GeoCoordinate, IngredientRecord, MealType, NutriScore, NutrientKind};

use crate::error::RemoteError;
use crate::normalize::normalize_supplier;
use crate::types::{RecipeResponse, SupplierResponse};

/// Client for the recipe scoring, supplier prediction, and origin endpoints.
///
/// Use [`RecipeApiClient::new`] with the configured base URL; tests point it
/// at a wiremock server instead.
pub struct RecipeApiClient {
    client: Client,
    base_url: Url,
}

impl RecipeApiClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RemoteError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: a trailing slash makes Url::join treat the last path
        // segment as a directory rather than replacing it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RemoteError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the nutrition score for a (recipe, meal type) pair.
    ///
    /// Only the four recognized nutrient ratios are kept; unknown keys are
    /// ignored and non-numeric values for recognized keys are dropped.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx status.
    /// - [`RemoteError::Deserialize`] if the body is not valid JSON.
    /// - [`RemoteError::DataShape`] if `nutri_score` is missing or not a
    ///   mapping.
    pub async fn nutri_score(
        &self,
        recipe_name: &str,
        meal_type: MealType,
    ) -> Result<NutriScore, RemoteError> {
        let payload = json!({
            "recipe_name": recipe_name,
            "meal_type": meal_type.as_str(),
        });
        let body = self.post_json("recipescore", &payload).await?;

        let Some(score_value) = body.get("nutri_score") else {
            tracing::warn!(field = "nutri_score", "score response missing field");
            return Err(RemoteError::DataShape {
                context: "recipescore".to_owned(),
                field: "nutri_score".to_owned(),
                reason: "is missing".to_owned(),
            });
        };
        let Some(score_map) = score_value.as_object() else {
            tracing::warn!(field = "nutri_score", "score response field is not a mapping");
            return Err(RemoteError::DataShape {
                context: "recipescore".to_owned(),
                field: "nutri_score".to_owned(),
                reason: "is not a mapping".to_owned(),
            });
        };

        let ratios = score_map.iter().filter_map(|(key, value)| {
            let nutrient = NutrientKind::from_wire_key(key)?;
            Some((nutrient, value.as_f64()?))
        });
        Ok(NutriScore::from_ratios(ratios))
    }

    /// Fetches supplier predictions for a recipe, optionally anchored to the
    /// user's coordinate so the service can compute distances.
    ///
    /// Accepts both response shapes (`matches` or `ingredients`); a response
    /// with neither is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx status.
    /// - [`RemoteError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn predict_suppliers(
        &self,
        recipe_name: &str,
        coordinate: Option<GeoCoordinate>,
    ) -> Result<Vec<IngredientRecord>, RemoteError> {
        let mut payload = json!({ "recipe_name": recipe_name });
        if let Some(coordinate) = coordinate {
            payload["user_lat"] = json!(coordinate.latitude);
            payload["user_lon"] = json!(coordinate.longitude);
        }

        let body = self.post_json("ingredients/predict", &payload).await?;
        let response: SupplierResponse =
            serde_json::from_value(body).map_err(|e| RemoteError::Deserialize {
                context: format!("ingredients/predict(recipe={recipe_name})"),
                source: e,
            })?;

        Ok(response
            .into_raw_records()
            .into_iter()
            .map(normalize_supplier)
            .collect())
    }

    /// Fetches the recipe's ingredient origins (`quantities_g` list).
    ///
    /// # Errors
    ///
    /// - [`RemoteError::Http`] on network failure or non-2xx status.
    /// - [`RemoteError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn recipe_origins(
        &self,
        recipe_name: &str,
    ) -> Result<Vec<IngredientRecord>, RemoteError> {
        let payload = json!({ "recipe_name": recipe_name });
        let body = self.post_json("recipe", &payload).await?;
        let response: RecipeResponse =
            serde_json::from_value(body).map_err(|e| RemoteError::Deserialize {
                context: format!("recipe(recipe={recipe_name})"),
                source: e,
            })?;

        Ok(response
            .quantities_g
            .into_iter()
            .map(normalize_supplier)
            .collect())
    }

    /// Sends a POST with a JSON payload, asserts a 2xx status, and parses the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] on network failure or a non-2xx status.
    /// Returns [`RemoteError::Deserialize`] if the body is not valid JSON.
    async fn post_json(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, RemoteError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| RemoteError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;

        tracing::debug!(%url, "calling recipe API");
        let response = self.client.post(url.clone()).json(payload).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash_duplicates() {
        let client = RecipeApiClient::new("https://api.mealmap.test///", 30, "mealmap-test")
            .expect("client construction should not fail");
        assert_eq!(client.base_url.as_str(), "https://api.mealmap.test/");
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = RecipeApiClient::new("not a url", 30, "mealmap-test");
        assert!(matches!(result, Err(RemoteError::InvalidBaseUrl { .. })));
    }
}
