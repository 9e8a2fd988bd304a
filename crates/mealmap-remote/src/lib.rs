//! HTTP clients for the mealmap remote collaborators.
//!
//! Three services back the dashboard flow: the recipe API (nutrition score,
//! ingredient/supplier prediction, recipe origins) and the public geocoder.
//! All scoring and matching happens remotely; this crate owns the wire
//! formats and normalizes loose response shapes into domain types once, at
//! the boundary.

pub mod api;
pub mod error;
pub mod geocode;
pub mod normalize;
pub mod types;

pub use api::RecipeApiClient;
pub use error::RemoteError;
pub use geocode::GeocodeClient;
pub use normalize::normalize_supplier;
pub use types::{GeocodeHit, RawSupplier, RecipeResponse, SupplierResponse};
