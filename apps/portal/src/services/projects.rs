//! Cached project queries and application mutations.

use tracing::{debug, info};

use crate::api;
use crate::cache::{projects_key, QueryKey, DEFAULT_STALE_TIME};
use crate::error::ClientError;
use crate::errors::Validate;
use crate::models::project::{
    ApplicationDraft, ProjectApplication, ProjectDetail, ProjectPage, ProjectQuery,
};
use crate::state::PortalState;

pub fn list_key(query: &ProjectQuery) -> QueryKey {
    projects_key().child("list").child(query.cache_segment())
}

pub fn detail_key(id: &str) -> QueryKey {
    projects_key().child("detail").child(id)
}

pub fn search_key(keyword: &str, query: &ProjectQuery) -> QueryKey {
    projects_key()
        .child("search")
        .child(keyword)
        .child(query.cache_segment())
}

pub async fn projects(
    state: &PortalState,
    query: &ProjectQuery,
) -> Result<Option<ProjectPage>, ClientError> {
    state
        .cache()
        .get_or_fetch(&list_key(query), state.config().session_stale_time, || {
            api::projects::list(state.client(), query)
        })
        .await
}

/// An empty id is not fetched.
pub async fn project(state: &PortalState, id: &str) -> Result<Option<ProjectDetail>, ClientError> {
    if id.is_empty() {
        debug!("project lookup skipped, no id");
        return Ok(None);
    }
    state
        .cache()
        .get_or_fetch(&detail_key(id), DEFAULT_STALE_TIME, || {
            api::projects::get(state.client(), id)
        })
        .await
}

/// An empty keyword is not searched.
pub async fn search(
    state: &PortalState,
    keyword: &str,
    query: &ProjectQuery,
) -> Result<Option<ProjectPage>, ClientError> {
    if keyword.is_empty() {
        debug!("project search skipped, empty keyword");
        return Ok(None);
    }
    state
        .cache()
        .get_or_fetch(&search_key(keyword, query), DEFAULT_STALE_TIME, || {
            api::projects::search(state.client(), keyword, query)
        })
        .await
}

pub async fn apply(
    state: &PortalState,
    project_id: &str,
    draft: &ApplicationDraft,
) -> Result<(), ClientError> {
    draft.validate()?;
    api::projects::apply(state.client(), project_id, draft).await?;
    info!(project_id, "application submitted");
    state.cache().invalidate(&detail_key(project_id)).await;
    Ok(())
}

pub async fn applications(
    state: &PortalState,
    project_id: &str,
) -> Result<Vec<ProjectApplication>, ClientError> {
    api::projects::applications(state.client(), project_id).await
}

pub async fn withdraw(state: &PortalState, application_id: &str) -> Result<(), ClientError> {
    api::projects::withdraw(state.client(), application_id).await?;
    info!(application_id, "application withdrawn");
    state.cache().invalidate(&projects_key().child("detail")).await;
    Ok(())
}
