use mealmap_remote::RemoteError;
use thiserror::Error;

/// Errors surfaced by the session controller.
///
/// None of these is fatal to the session: every operation is retriable by
/// repeating the user action that triggered it.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected before any remote call; no state change.
    #[error("recipe name must not be empty")]
    EmptyRecipe,

    /// Rejected before any remote call; no state change.
    #[error("address must not be empty")]
    EmptyAddress,

    #[error("no recipe selected")]
    NoRecipeSelected,

    /// Supplier lookup needs a geocoded address first.
    #[error("no coordinate available; submit an address first")]
    NoCoordinate,

    /// The geocoder resolved nothing for the query. Distinct from a call
    /// failure and never retried automatically.
    #[error("address not found: \"{query}\"")]
    AddressNotFound { query: String },

    /// A remote call failed; named after the originating operation.
    #[error("{operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },
}
