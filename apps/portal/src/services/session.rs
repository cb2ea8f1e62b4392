//! Sign-in state: the cached session, login/logout, registration and the
//! OAuth hand-off.

use tracing::{debug, info, warn};

use crate::api;
use crate::auth::context::AuthContext;
use crate::auth::oauth::{self, OAuthAction, OAuthFailure};
use crate::cache::session_key;
use crate::error::ClientError;
use crate::errors::Validate;
use crate::i18n::Locale;
use crate::logging::pii::Redacted;
use crate::models::auth::{
    EmailRequest, LoginRequest, LogoutRequest, OAuthCompleteQuery, Registration,
    ResetPasswordRequest,
};
use crate::models::user::{ProfileUpdate, User};
use crate::services::locale;
use crate::session::navigation::{HOME_PATH, LOGIN_PATH};
use crate::session::tokens;
use crate::state::PortalState;

/// Signed-in user, cached under `["session"]`. `None` when the API has no
/// session for the stored token.
pub async fn current_user(state: &PortalState) -> Result<Option<User>, ClientError> {
    state
        .cache()
        .get_or_fetch(&session_key(), state.config().session_stale_time, || async {
            api::users::current_user(state.client())
                .await
                .inspect_err(|e| {
                    if e.is_terminal_for_session() {
                        debug!(error = %e, "session lookup rejected");
                    } else {
                        warn!(error = %e, "session lookup failed");
                    }
                })
        })
        .await
}

/// The derived auth context; guests when nobody is signed in.
pub async fn session(state: &PortalState) -> Result<AuthContext, ClientError> {
    let user = current_user(state).await?;
    Ok(AuthContext::from_session(user.as_ref()))
}

/// Signs in and stores both tokens. On failure the cookie jar is left as
/// it was.
pub async fn login(state: &PortalState, req: &LoginRequest) -> Result<(), ClientError> {
    req.validate()?;

    let response = api::auth::login(state.client(), req).await?;
    let pair = response
        .token_pair()
        .ok_or_else(|| ClientError::decode("login response carried no token pair"))?;

    tokens::store(state.cookies().as_ref(), &pair)?;
    state.cache().invalidate(&session_key()).await;
    info!(identity = %Redacted(&req.identity), "login succeeded");

    state.navigator().navigate(HOME_PATH);
    Ok(())
}

/// Ends the session locally even when the API call fails.
pub async fn logout(state: &PortalState) -> Result<(), ClientError> {
    if let Err(e) = api::auth::logout(state.client(), &LogoutRequest::default()).await {
        warn!(error = %e, "logout request failed, clearing local session anyway");
    }

    tokens::clear(state.cookies().as_ref())?;
    state.cache().set(session_key(), None::<User>).await;
    info!("logged out");

    state.navigator().navigate(LOGIN_PATH);
    Ok(())
}

pub async fn register(state: &PortalState, registration: Registration) -> Result<(), ClientError> {
    registration.validate()?;
    api::auth::register(state.client(), &registration).await?;

    let english = locale::current(state) == Locale::En;
    if registration.needs_email_verification() {
        let (title, description) = if english {
            ("Registration successful", "Please check your email to verify your account.")
        } else {
            ("Kayıt başarılı", "Hesabınızı doğrulamak için e-postanızı kontrol edin.")
        };
        state.notifier().success(title, Some(description));
        state.navigator().navigate(LOGIN_PATH);
    } else {
        let title = if english { "Registration successful" } else { "Kayıt başarılı" };
        state.notifier().success(title, None);
    }
    Ok(())
}

pub async fn update_profile(state: &PortalState, update: &ProfileUpdate) -> Result<(), ClientError> {
    if update.is_empty() {
        debug!("empty profile update skipped");
        return Ok(());
    }
    update.validate()?;

    api::users::update_user(state.client(), update).await?;
    state.cache().invalidate(&session_key()).await;
    Ok(())
}

pub async fn forgot_password(state: &PortalState, email: &str) -> Result<(), ClientError> {
    EmailRequest {
        email: email.to_string(),
    }
    .validate()?;
    api::auth::forgot_password(state.client(), email).await
}

pub async fn reset_password(
    state: &PortalState,
    req: &ResetPasswordRequest,
) -> Result<(), ClientError> {
    req.validate()?;
    api::auth::reset_password(state.client(), req).await
}

pub async fn resend_verification(state: &PortalState, email: &str) -> Result<(), ClientError> {
    EmailRequest {
        email: email.to_string(),
    }
    .validate()?;
    api::auth::resend_verification(state.client(), email).await
}

/// Carries out an OAuth callback and navigates to where it leads.
///
/// `Ok` holds the destination of a completed sign-in; `Err` holds the
/// failure after the user has been sent to its redirect path.
pub async fn complete_oauth(
    state: &PortalState,
    query: &OAuthCompleteQuery,
) -> Result<&'static str, OAuthFailure> {
    let action = oauth::resolve(query);
    let outcome = match &action {
        OAuthAction::StoreTokens(pair) => match tokens::store(state.cookies().as_ref(), pair) {
            Ok(()) => {
                state.cache().invalidate(&session_key()).await;
                Ok(action.success_path())
            }
            Err(e) => Err(OAuthFailure::SessionError {
                msg: Some(e.to_string()),
            }),
        },
        OAuthAction::Register(req) => {
            let registration = Registration::from(req.clone());
            let registered = match registration.validate() {
                Ok(()) => api::auth::register(state.client(), &registration).await,
                Err(e) => Err(e.into()),
            };
            match registered {
                Ok(()) => Ok(action.success_path()),
                Err(e) => Err(OAuthFailure::RegistrationFailed {
                    detail: e.to_string(),
                }),
            }
        }
        OAuthAction::Reject(failure) => Err(failure.clone()),
    };

    finish_oauth(state, outcome)
}

/// [`complete_oauth`] for a raw callback URL. Unparsable callbacks go to
/// `/login`.
pub async fn complete_oauth_url(
    state: &PortalState,
    url: &str,
) -> Result<&'static str, OAuthFailure> {
    match OAuthCompleteQuery::from_url(url) {
        Ok(query) => complete_oauth(state, &query).await,
        Err(e) => {
            debug!(error = %e, "unparsable OAuth callback");
            finish_oauth(state, Err(OAuthFailure::InvalidParams))
        }
    }
}

fn finish_oauth(
    state: &PortalState,
    outcome: Result<&'static str, OAuthFailure>,
) -> Result<&'static str, OAuthFailure> {
    match &outcome {
        Ok(path) => {
            info!(destination = path, "OAuth sign-in completed");
            state.navigator().navigate(path);
        }
        Err(failure) => {
            warn!(reason = %failure, "OAuth sign-in failed");
            state.notifier().error(&failure.to_string(), None);
            state.navigator().navigate(failure.redirect_path());
        }
    }
    outcome
}
