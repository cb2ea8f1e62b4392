//! Feature flags behind the moderation panel.

use tracing::{info, warn};

use crate::api;
use crate::auth::context::AuthContext;
use crate::auth::permissions::Permission;
use crate::cache::{features_key, DEFAULT_STALE_TIME};
use crate::error::ClientError;
use crate::models::admin::{ChangeFeaturePayload, FeatureList};
use crate::state::PortalState;

/// Administrators and moderators may manage flags.
pub fn require_admin(ctx: &AuthContext) -> Result<(), ClientError> {
    ctx.require_permission(Permission::UseModerationPanel)
}

pub async fn features(state: &PortalState) -> Result<FeatureList, ClientError> {
    state
        .cache()
        .get_or_fetch(&features_key(), DEFAULT_STALE_TIME, || {
            api::admin::features(state.client())
        })
        .await
}

/// Flips the flag in the cache right away; a failed request restores the
/// previous flags.
pub async fn change_feature(
    state: &PortalState,
    payload: &ChangeFeaturePayload,
) -> Result<(), ClientError> {
    let result = state
        .cache()
        .update_optimistically(
            &features_key(),
            |flags: Option<FeatureList>| {
                let mut flags = flags.unwrap_or_default();
                flags.insert(payload.key.clone(), payload.enabled);
                flags
            },
            api::admin::change_feature(state.client(), payload),
        )
        .await;

    match &result {
        Ok(()) => info!(key = %payload.key, enabled = payload.enabled, "feature changed"),
        Err(e) => warn!(key = %payload.key, error = %e, "failed to change feature"),
    }
    result
}

pub async fn clean_features(state: &PortalState) -> Result<(), ClientError> {
    match api::admin::clean_features(state.client()).await {
        Ok(()) => {
            info!("features cleaned");
            state.cache().invalidate(&features_key()).await;
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "failed to clean features");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::test_user;

    #[test]
    fn only_moderators_and_admins_pass_the_gate() {
        for role in ["Admin", "Moderator"] {
            let ctx = AuthContext::from_user(&test_user(1, role));
            assert!(require_admin(&ctx).is_ok(), "{role}");
        }
        for role in ["Standard", "ManagerCompany"] {
            let ctx = AuthContext::from_user(&test_user(1, role));
            assert!(matches!(
                require_admin(&ctx),
                Err(ClientError::PermissionDenied {
                    permission: Permission::UseModerationPanel
                })
            ));
        }
        assert!(require_admin(&AuthContext::guest()).is_err());
    }
}
