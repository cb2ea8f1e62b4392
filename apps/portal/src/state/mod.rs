pub mod portal_state;

pub use portal_state::{build_portal, PortalBuilder, PortalState};
