pub mod admin;
pub mod api;
pub mod auth;
pub mod project;
pub mod user;

pub use admin::{ChangeFeaturePayload, FeatureList};
pub use api::{BasicResponse, DataResponse, PagedDataResponse, TokenResponse};
pub use auth::{
    EmailRequest, GStatus, LoginRequest, LogoutRequest, OAuthCompleteQuery, OAuthRegisterRequest,
    RefreshTokenRequest, RegisterCompleteStatus, RegisterForm, RegisterRequest, Registration,
    ResetPasswordRequest,
};
pub use project::{
    ApplicationDraft, ApplicationStatus, Project, ProjectApplication, ProjectDetail, ProjectOwner,
    ProjectPage, ProjectQuery, ProjectStatus, SortDirection,
};
pub use user::{ProfileUpdate, User};
