//! Project marketplace endpoints.

use crate::error::ClientError;
use crate::http::client::ApiClient;
use crate::http::request::{encode_component, Method, QueryString};
use crate::models::api::BasicResponse;
use crate::models::project::{
    ApplicationDraft, ProjectApplication, ProjectDetail, ProjectPage, ProjectQuery,
};

/// `GET /projects?page=&size=&status=&sortBy=&sortDirection=`
pub async fn list(client: &ApiClient, query: &ProjectQuery) -> Result<Option<ProjectPage>, ClientError> {
    let mut qs = QueryString::new();
    query.append_to(&mut qs);
    client.fetch_with_retry(&qs.append_to("/projects")).await
}

/// `GET /projects/search?keyword=...`
pub async fn search(
    client: &ApiClient,
    keyword: &str,
    query: &ProjectQuery,
) -> Result<Option<ProjectPage>, ClientError> {
    let mut qs = QueryString::new();
    qs.push("keyword", keyword);
    query.append_to(&mut qs);
    client.fetch(&qs.append_to("/projects/search")).await
}

/// `GET /projects/{id}`
pub async fn get(client: &ApiClient, id: &str) -> Result<Option<ProjectDetail>, ClientError> {
    client
        .fetch_with_retry(&format!("/projects/{}", encode_component(id)))
        .await
}

/// `POST /projects/{id}/applications`
pub async fn apply(
    client: &ApiClient,
    project_id: &str,
    draft: &ApplicationDraft,
) -> Result<(), ClientError> {
    let endpoint = format!("/projects/{}/applications", encode_component(project_id));
    client
        .mutate::<_, BasicResponse>(Method::Post, &endpoint, draft)
        .await?;
    Ok(())
}

/// `GET /projects/{id}/applications`
pub async fn applications(
    client: &ApiClient,
    project_id: &str,
) -> Result<Vec<ProjectApplication>, ClientError> {
    let endpoint = format!("/projects/{}/applications", encode_component(project_id));
    Ok(client
        .fetch::<Vec<ProjectApplication>>(&endpoint)
        .await?
        .unwrap_or_default())
}

/// `DELETE /applications/{id}`
pub async fn withdraw(client: &ApiClient, application_id: &str) -> Result<(), ClientError> {
    let endpoint = format!("/applications/{}", encode_component(application_id));
    client
        .mutate_empty::<BasicResponse>(Method::Delete, &endpoint)
        .await?;
    Ok(())
}
