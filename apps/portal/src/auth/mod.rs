pub mod context;
pub mod oauth;
pub mod permissions;

pub use context::AuthContext;
pub use oauth::{OAuthAction, OAuthFailure, OAuthService};
pub use permissions::{AuthLevel, Permission, Role};
