//! Feature-flag administration.

use crate::error::ClientError;
use crate::http::client::ApiClient;
use crate::http::request::{encode_component, Method};
use crate::models::admin::{ChangeFeaturePayload, FeatureList};
use crate::models::api::BasicResponse;

/// `GET /admin/feature/all`
pub async fn features(client: &ApiClient) -> Result<FeatureList, ClientError> {
    Ok(client
        .fetch::<FeatureList>("/admin/feature/all")
        .await?
        .unwrap_or_default())
}

/// `POST /admin/feature/change/{key}?enabled=`; the body is empty.
pub async fn change_feature(
    client: &ApiClient,
    payload: &ChangeFeaturePayload,
) -> Result<(), ClientError> {
    let endpoint = format!(
        "/admin/feature/change/{}?enabled={}",
        encode_component(&payload.key),
        payload.enabled
    );
    client
        .mutate_empty::<BasicResponse>(Method::Post, &endpoint)
        .await?;
    Ok(())
}

/// `POST /admin/feature/clean`
pub async fn clean_features(client: &ApiClient) -> Result<(), ClientError> {
    client
        .mutate_empty::<BasicResponse>(Method::Post, "/admin/feature/clean")
        .await?;
    Ok(())
}
