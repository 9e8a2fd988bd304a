//! The query session controller and its presentation views.
//!
//! One [`SessionController`] owns everything a user's browsing session
//! touches: the current recipe selection, meal type, address, geocoded
//! coordinate, and the most recent response from each remote endpoint. It
//! decides on every input event whether cached data is still valid or a new
//! remote call is required. The [`view`] module turns controller state into
//! presentation-ready rows, groups, and map points; rendering itself is out
//! of scope.

pub mod controller;
pub mod error;
pub mod view;

pub use controller::SessionController;
pub use error::SessionError;
