//! Test support for the portal crate: a scriptable mock of the portal API
//! and the shared test logger.

pub mod mock_api;
pub mod test_logging;

pub use mock_api::{MockApi, MockResponse, RecordedRequest};
