//! Typed bindings for the portal REST API, one module per resource.

pub mod admin;
pub mod auth;
pub mod projects;
pub mod users;
