use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::context::AuthContext;
use crate::errors::validation::{max_chars, min_chars};
use crate::errors::{Validate, ValidationError};
use crate::http::request::QueryString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Draft,
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Draft,
            Self::Open,
            Self::InProgress,
            Self::Completed,
            Self::Cancelled,
        ]
        .into_iter()
        .find(|st| st.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| ValidationError::new("status", "unknown project status"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOwner {
    pub id: String,
    pub name: String,
    /// Absent avatars arrive as `null` or as an empty string.
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub email: String,
}

impl ProjectOwner {
    pub fn avatar(&self) -> Option<&str> {
        self.avatar_url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ProjectOwner>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectApplication {
    pub id: String,
    pub user: ProjectOwner,
    pub status: ApplicationStatus,
    pub message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub team_members: Vec<ProjectOwner>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub max_applicants: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<ProjectApplication>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl ProjectPage {
    pub fn has_next(&self) -> bool {
        self.current_page.saturating_add(1) < self.total_pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Listing filters. Every field is optional; unset ones are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProjectQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub status: Option<ProjectStatus>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl ProjectQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_direction = Some(direction);
        self
    }

    pub(crate) fn append_to(&self, qs: &mut QueryString) {
        qs.push_opt("page", self.page);
        qs.push_opt("size", self.size);
        qs.push_opt("status", self.status.map(|s| s.as_str()));
        qs.push_opt("sortBy", self.sort_by.as_deref());
        qs.push_opt("sortDirection", self.sort_direction.map(|d| d.as_str()));
    }

    /// Stable cache-key segment describing these filters.
    pub fn cache_segment(&self) -> String {
        let mut qs = QueryString::new();
        self.append_to(&mut qs);
        qs.into_string()
    }
}

/// Cover message for a project application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationDraft {
    pub message: String,
}

impl ApplicationDraft {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validate for ApplicationDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        let trimmed = self.message.trim();
        min_chars("message", trimmed, 50)?;
        max_chars("message", trimmed, 500)
    }
}

/// Whether the session may apply: signed in, project open, not the owner.
pub fn can_apply(ctx: &AuthContext, project: &Project) -> bool {
    if !ctx.is_authenticated || project.status != ProjectStatus::Open {
        return false;
    }
    match (ctx.user_id, &project.owner) {
        (Some(uid), Some(owner)) => owner.id != uid.to_string(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::user::test_user;

    fn project_json() -> serde_json::Value {
        json!({
            "id": "p-1",
            "title": "Campus Navigation App",
            "description": "Find classrooms",
            "status": "OPEN",
            "owner": {"id": "9", "name": "Advisor", "avatarUrl": "", "email": "adv@iyte.edu.tr"},
            "createdAt": "2025-03-01T10:00:00Z"
        })
    }

    #[test]
    fn project_parses_with_defaults() {
        let p: Project = serde_json::from_value(project_json()).unwrap();
        assert_eq!(p.status, ProjectStatus::Open);
        assert!(p.tags.is_empty());
        assert_eq!(p.owner.as_ref().and_then(|o| o.avatar()), None);
    }

    #[test]
    fn detail_flattens_project_and_defaults_team() {
        let mut v = project_json();
        v["requirements"] = json!(null);
        v["maxApplicants"] = json!(5);
        let d: ProjectDetail = serde_json::from_value(v).unwrap();
        assert_eq!(d.project.title, "Campus Navigation App");
        assert!(d.team_members.is_empty());
        assert_eq!(d.max_applicants, Some(5));
        assert!(d.applications.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut v = project_json();
        v["status"] = json!("ARCHIVED");
        assert!(serde_json::from_value::<Project>(v).is_err());
    }

    #[test]
    fn query_string_skips_unset_filters() {
        let q = ProjectQuery::page(0, 12)
            .with_status(ProjectStatus::InProgress)
            .sorted_by("createdAt", SortDirection::Desc);
        assert_eq!(
            q.cache_segment(),
            "page=0&size=12&status=IN_PROGRESS&sortBy=createdAt&sortDirection=DESC"
        );
        assert_eq!(ProjectQuery::default().cache_segment(), "");
    }

    #[test]
    fn application_length_bounds() {
        assert!(ApplicationDraft::new("x".repeat(49)).validate().is_err());
        assert!(ApplicationDraft::new("x".repeat(50)).validate().is_ok());
        assert!(ApplicationDraft::new("x".repeat(500)).validate().is_ok());
        assert!(ApplicationDraft::new("x".repeat(501)).validate().is_err());
    }

    #[test]
    fn owners_and_guests_cannot_apply() {
        let p: Project = serde_json::from_value(project_json()).unwrap();
        let member = AuthContext::from_user(&test_user(3, "Standard"));
        let owner = AuthContext::from_user(&test_user(9, "Standard"));
        assert!(can_apply(&member, &p));
        assert!(!can_apply(&owner, &p));
        assert!(!can_apply(&AuthContext::guest(), &p));
    }

    #[test]
    fn page_navigation() {
        let page = ProjectPage {
            projects: vec![],
            current_page: 0,
            total_pages: 2,
            total_elements: 13,
        };
        assert!(page.has_next());

        let last = ProjectPage {
            current_page: 1,
            ..page.clone()
        };
        assert!(!last.has_next());

        let runaway = ProjectPage {
            current_page: u32::MAX,
            total_pages: u32::MAX,
            ..page
        };
        assert!(!runaway.has_next());
    }
}
