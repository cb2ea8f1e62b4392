//! `/user` endpoints.

use crate::error::ClientError;
use crate::http::client::ApiClient;
use crate::http::request::{encode_component, Method, QueryString};
use crate::i18n::Locale;
use crate::models::api::{BasicResponse, DataResponse};
use crate::models::user::{ProfileUpdate, User};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub fields: Vec<String>,
}

/// `GET /user/get`; the body is the user itself. 204 means no session.
pub async fn current_user(client: &ApiClient) -> Result<Option<User>, ClientError> {
    client.fetch_unwrapped("/user/get").await
}

/// `GET /user/{id}?fields=`
pub async fn user_by_id(
    client: &ApiClient,
    id: i64,
    fields: &[&str],
) -> Result<Option<User>, ClientError> {
    let mut qs = QueryString::new();
    qs.push("fields", fields.join(","));
    client.fetch(&qs.append_to(&format!("/user/{id}"))).await
}

/// `GET /user/list?page=&pageSize=&sby=&fields=`
pub async fn list_users(
    client: &ApiClient,
    params: &UserListParams,
) -> Result<Vec<User>, ClientError> {
    let mut qs = QueryString::new();
    qs.push_opt("page", params.page)
        .push_opt("pageSize", params.page_size)
        .push_opt("sby", params.sort_by.as_deref());
    if !params.fields.is_empty() {
        qs.push("fields", params.fields.join(","));
    }
    Ok(client
        .fetch::<Vec<User>>(&qs.append_to("/user/list"))
        .await?
        .unwrap_or_default())
}

/// `POST /user/create`; returns the new id.
pub async fn create_user(client: &ApiClient, user: &User) -> Result<Option<i64>, ClientError> {
    let res: Option<DataResponse<i64>> = client.mutate(Method::Post, "/user/create", user).await?;
    Ok(res.and_then(|r| r.data))
}

/// `PATCH /user/update`
pub async fn update_user(client: &ApiClient, update: &ProfileUpdate) -> Result<(), ClientError> {
    client
        .mutate::<_, BasicResponse>(Method::Patch, "/user/update", update)
        .await?;
    Ok(())
}

/// `POST /user/update/language?language=`
pub async fn update_language(client: &ApiClient, language: Locale) -> Result<(), ClientError> {
    let endpoint = format!("/user/update/language?language={language}");
    client
        .mutate_empty::<BasicResponse>(Method::Post, &endpoint)
        .await?;
    Ok(())
}

/// `DELETE /user/delete?id=`; no id deletes the caller's own account.
pub async fn delete_user(client: &ApiClient, id: Option<i64>) -> Result<(), ClientError> {
    let id = id.map(|i| i.to_string()).unwrap_or_default();
    let endpoint = format!("/user/delete?id={id}");
    client
        .mutate_empty::<BasicResponse>(Method::Delete, &endpoint)
        .await?;
    Ok(())
}

/// `POST /user/verify/phone?code=`
pub async fn verify_phone(client: &ApiClient, code: &str) -> Result<(), ClientError> {
    let endpoint = format!("/user/verify/phone?code={}", encode_component(code));
    client
        .mutate_empty::<BasicResponse>(Method::Post, &endpoint)
        .await?;
    Ok(())
}

/// `POST /user/verify/email?code=`
pub async fn verify_email(client: &ApiClient, code: &str) -> Result<(), ClientError> {
    let endpoint = format!("/user/verify/email?code={}", encode_component(code));
    client
        .mutate_empty::<BasicResponse>(Method::Post, &endpoint)
        .await?;
    Ok(())
}
