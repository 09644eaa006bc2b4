pub mod middleware;
pub mod models;
pub mod provider;

pub use models::Principal;
pub use provider::{AuthProvider, HostedAuthProvider};
