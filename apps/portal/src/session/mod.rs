pub mod cookies;
pub mod navigation;
pub mod tokens;

pub use cookies::{Cookie, CookieStore, FileCookieStore, MemoryCookieStore};
pub use navigation::{is_auth_route, HeadlessNavigator, Navigator};
pub use tokens::TokenPair;
