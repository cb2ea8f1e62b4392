pub mod client;
pub mod request;
pub mod response;
pub mod retry;

pub use client::ApiClient;
pub use request::{ApiRequest, Method, MultipartBody, QueryString, RawResponse};
pub use response::{handle_response, parse_unwrapped};
pub use retry::RetryPolicy;
