//! User-facing operations composed from the API bindings, the query cache
//! and the session cookies.

pub mod features;
pub mod locale;
pub mod projects;
pub mod session;
