//! Integration tests for `SessionController` cache and invalidation
//! behavior, using wiremock call counting to verify when remote calls are
//! and are not issued.

use mealmap_core::{MealType, NutrientKind};
use mealmap_remote::{GeocodeClient, RecipeApiClient};
use mealmap_session::{SessionController, SessionError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller(api: &MockServer, geocoder: &MockServer) -> SessionController {
    let api = RecipeApiClient::new(&api.uri(), 30, "mealmap-test")
        .expect("client construction should not fail");
    let geocoder = GeocodeClient::new(&geocoder.uri(), 30, "mealmap-test")
        .expect("client construction should not fail");
    SessionController::new(api, geocoder)
}

fn score_body(energy: f64) -> serde_json::Value {
    serde_json::json!({
        "nutri_score": {
            "Energy_ratio": energy,
            "Carbohydrates_ratio": 0.8,
            "Proteins_ratio": 1.0,
            "Fat_ratio": 0.95
        }
    })
}

async fn mount_score(server: &MockServer, meal: &str, energy: f64, expect: u64) {
    Mock::given(method("POST"))
        .and(path("/recipescore"))
        .and(body_partial_json(serde_json::json!({ "meal_type": meal })))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(energy)))
        .expect(expect)
        .mount(server)
        .await;
}

async fn mount_geocode(server: &MockServer, query: &str, lat: &str, lon: &str, expect: u64) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", query))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "lat": lat, "lon": lon }])),
        )
        .expect(expect)
        .mount(server)
        .await;
}

fn supplier_body() -> serde_json::Value {
    serde_json::json!({
        "matches": [
            {
                "matched_product": "tomato",
                "latitude": 48.9,
                "longitude": 2.4,
                "distance_km": 5.2,
                "is_idf_supplier": true,
                "country_code": 0
            },
            { "matched_product": "beef", "country_code": 3 }
        ]
    })
}

#[tokio::test]
async fn selecting_same_meal_twice_issues_one_score_call() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_score(&api, "lunch", 1.2, 1).await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    session.select_meal_type(MealType::Lunch).await.unwrap();
    session.select_meal_type(MealType::Lunch).await.unwrap();

    let score = session.nutri_score().expect("score should be cached");
    assert_eq!(score.ratio(NutrientKind::Energy), Some(1.2));
    // MockServer verifies expect(1) on drop.
}

#[tokio::test]
async fn changing_meal_type_refetches() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_score(&api, "lunch", 1.2, 1).await;
    mount_score(&api, "dinner", 0.9, 1).await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    session.select_meal_type(MealType::Lunch).await.unwrap();
    session.select_meal_type(MealType::Dinner).await.unwrap();

    assert_eq!(session.meal_type(), Some(MealType::Dinner));
    let score = session.nutri_score().unwrap();
    assert_eq!(score.ratio(NutrientKind::Energy), Some(0.9));
}

#[tokio::test]
async fn new_recipe_clears_all_downstream_state() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_score(&api, "lunch", 1.2, 1).await;
    mount_geocode(&geocoder, "15 rue de la paix, paris", "48.8566", "2.3522", 1).await;
    Mock::given(method("POST"))
        .and(path("/ingredients/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(supplier_body()))
        .mount(&api)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();
    session.select_meal_type(MealType::Lunch).await.unwrap();
    session
        .submit_address("15 rue de la paix, paris")
        .await
        .unwrap();
    session.fetch_ingredients().await.unwrap();
    assert!(!session.ingredients().is_empty());

    session.submit_recipe("ratatouille").unwrap();

    assert_eq!(session.recipe(), Some("ratatouille"));
    assert_eq!(session.meal_type(), None);
    assert!(session.nutri_score().is_none());
    assert!(session.coordinate().is_none());
    assert!(session.ingredients().is_empty());
    assert!(session.origins().is_empty());
}

#[tokio::test]
async fn same_address_twice_geocodes_once() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_geocode(&geocoder, "15 rue de la paix, paris", "48.8566", "2.3522", 1).await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    let first = session
        .submit_address("15 rue de la paix, paris")
        .await
        .unwrap();
    // Same normalized value after trimming: served from cache.
    let second = session
        .submit_address("  15 rue de la paix, paris  ")
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn address_change_invalidates_ingredients_but_not_score() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_score(&api, "lunch", 1.2, 1).await;
    mount_geocode(&geocoder, "paris", "48.8566", "2.3522", 1).await;
    mount_geocode(&geocoder, "lyon", "45.7640", "4.8357", 1).await;
    Mock::given(method("POST"))
        .and(path("/ingredients/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(supplier_body()))
        .mount(&api)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();
    session.select_meal_type(MealType::Lunch).await.unwrap();
    session.submit_address("paris").await.unwrap();
    session.fetch_ingredients().await.unwrap();
    assert!(!session.ingredients_stale());

    session.submit_address("lyon").await.unwrap();

    assert!(session.ingredients_stale(), "records must be flagged stale");
    assert!(
        !session.ingredients().is_empty(),
        "stale records are kept, not cleared"
    );
    let score = session.nutri_score().expect("score must survive");
    assert_eq!(score.ratio(NutrientKind::Energy), Some(1.2));
}

#[tokio::test]
async fn fetch_ingredients_cached_for_same_key() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_geocode(&geocoder, "paris", "48.8566", "2.3522", 1).await;
    Mock::given(method("POST"))
        .and(path("/ingredients/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(supplier_body()))
        .expect(1)
        .mount(&api)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();
    session.submit_address("paris").await.unwrap();

    session.fetch_ingredients().await.unwrap();
    let records = session.fetch_ingredients().await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn failed_score_fetch_keeps_previous_cache() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    // Lunch succeeds once; every later score call fails.
    Mock::given(method("POST"))
        .and(path("/recipescore"))
        .and(body_partial_json(serde_json::json!({ "meal_type": "lunch" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(score_body(1.2)))
        .up_to_n_times(1)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/recipescore"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();
    session.select_meal_type(MealType::Lunch).await.unwrap();

    let err = session.select_meal_type(MealType::Dinner).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Remote {
            operation: "nutri_score",
            ..
        }
    ));

    // The lunch score is still cached and selecting lunch again needs no call.
    let score = session.nutri_score().expect("previous score kept");
    assert_eq!(score.ratio(NutrientKind::Energy), Some(1.2));
    session.select_meal_type(MealType::Lunch).await.unwrap();
}

#[tokio::test]
async fn failed_ingredient_fetch_keeps_records_and_marks_stale() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    mount_geocode(&geocoder, "paris", "48.8566", "2.3522", 1).await;
    mount_geocode(&geocoder, "lyon", "45.7640", "4.8357", 1).await;
    Mock::given(method("POST"))
        .and(path("/ingredients/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(supplier_body()))
        .up_to_n_times(1)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/ingredients/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();
    session.submit_address("paris").await.unwrap();
    session.fetch_ingredients().await.unwrap();

    session.submit_address("lyon").await.unwrap();
    let err = session.fetch_ingredients().await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Remote {
            operation: "predict_suppliers",
            ..
        }
    ));

    assert!(!session.ingredients().is_empty(), "stale data beats blank");
    assert!(session.ingredients_stale());
}

#[tokio::test]
async fn empty_recipe_rejected_without_state_change() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    let err = session.submit_recipe("   ").unwrap_err();
    assert!(matches!(err, SessionError::EmptyRecipe));
    assert_eq!(session.recipe(), Some("bolognese sauce"));
}

#[tokio::test]
async fn empty_address_rejected_without_remote_call() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    let err = session.submit_address("   ").await.unwrap_err();
    assert!(matches!(err, SessionError::EmptyAddress));
    assert!(session.coordinate().is_none());
}

#[tokio::test]
async fn address_not_found_is_distinct_and_leaves_coordinate_unset() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&geocoder)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    let err = session.submit_address("nowhere at all").await.unwrap_err();
    assert!(matches!(err, SessionError::AddressNotFound { .. }));
    assert!(session.coordinate().is_none());

    // The dependent supplier fetch must not run without a coordinate.
    let err = session.fetch_ingredients().await.unwrap_err();
    assert!(matches!(err, SessionError::NoCoordinate));
}

#[tokio::test]
async fn meal_selection_without_recipe_is_rejected() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;

    let mut session = controller(&api, &geocoder);
    let err = session.select_meal_type(MealType::Lunch).await.unwrap_err();
    assert!(matches!(err, SessionError::NoRecipeSelected));
}

#[tokio::test]
async fn origins_cached_by_recipe() {
    let api = MockServer::start().await;
    let geocoder = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recipe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "quantities_g": [
                { "matched_product": "parmesan", "country_code": 2 }
            ]
        })))
        .expect(1)
        .mount(&api)
        .await;

    let mut session = controller(&api, &geocoder);
    session.submit_recipe("bolognese sauce").unwrap();

    session.fetch_origins().await.unwrap();
    let origins = session.fetch_origins().await.unwrap();
    assert_eq!(origins.len(), 1);
    assert_eq!(origins[0].matched_product, "parmesan");
}
