use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::i18n::{Locale, LOCALE_COOKIE, LOCALE_MAX_AGE};
use crate::models::user::User;
use crate::session::cookies::Cookie;
use crate::state::PortalState;

/// Locale from the `NEXT_LOCALE` cookie, falling back to Turkish when it
/// is missing, unreadable or unknown.
pub fn current(state: &PortalState) -> Locale {
    match state.cookies().value(LOCALE_COOKIE) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
            debug!(value = %value, "unknown locale cookie, using default");
            Locale::default()
        }),
        Ok(None) => Locale::default(),
        Err(e) => {
            warn!(error = %e, "failed to read locale cookie");
            Locale::default()
        }
    }
}

pub fn set_locale(state: &PortalState, locale: Locale) -> Result<(), ClientError> {
    state
        .cookies()
        .set(Cookie::new(LOCALE_COOKIE, locale.as_str(), LOCALE_MAX_AGE).http_only())?;
    info!(locale = %locale, "locale set");
    Ok(())
}

/// Parses `value` before storing it.
pub fn set_locale_str(state: &PortalState, value: &str) -> Result<Locale, ClientError> {
    let locale: Locale = value.parse()?;
    set_locale(state, locale)?;
    Ok(locale)
}

/// Adopts the signed-in user's language. Returns whether the cookie
/// changed.
pub fn sync_user_language(state: &PortalState, user: &User) -> Result<bool, ClientError> {
    if user.language == current(state) {
        return Ok(false);
    }
    set_locale(state, user.language)?;
    Ok(true)
}
