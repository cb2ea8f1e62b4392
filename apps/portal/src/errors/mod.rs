//! Error handling for the portal client.

pub mod response_code;
pub mod user_message;
pub mod validation;

pub use response_code::ResponseCode;
pub use user_message::{user_message, MessageKey, UserMessage};
pub use validation::{Validate, ValidationError};
