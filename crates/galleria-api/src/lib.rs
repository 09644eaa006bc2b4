//! Galleria API Library
//!
//! HTTP handlers, auth middleware, services and application setup for the
//! personal media gallery.

pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
