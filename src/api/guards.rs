use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::api::validation::parse_id;
use crate::core::{security, state::AppState};
use crate::db::models::{Class, User};
use crate::db::types::UserRole;
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);
/// Roster and user management.
pub(crate) struct CurrentAdmin(pub(crate) User);
/// Analytics readers: heads and admins.
pub(crate) struct CurrentHead(pub(crate) User);
pub(crate) struct CurrentTeacher(pub(crate) User);
pub(crate) struct CurrentStudent(pub(crate) User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        if !user.is_active || user.role != claims.role {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentUser(user))
    }
}

async fn require_role<F>(
    parts: &mut Parts,
    state: &AppState,
    allowed: F,
    denied: &'static str,
) -> Result<User, ApiError>
where
    F: FnOnce(UserRole) -> bool,
{
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    if allowed(user.role) {
        Ok(user)
    } else {
        Err(ApiError::Forbidden(denied))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::can_manage_roster, "Admin access required")
            .await
            .map(CurrentAdmin)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentHead {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::can_view_analytics, "Head access required")
            .await
            .map(CurrentHead)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentTeacher {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(
            parts,
            state,
            UserRole::can_author_content,
            "Only teachers can access this endpoint",
        )
        .await
        .map(CurrentTeacher)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::can_enroll, "Student access required")
            .await
            .map(CurrentStudent)
    }
}

/// Resolves `class_id` to a class the given teacher is assigned to.
pub(crate) async fn require_class_ownership(
    state: &AppState,
    teacher: &User,
    class_id: &str,
) -> Result<Class, ApiError> {
    let class_id = parse_id(class_id, "class id")?;
    let class = repositories::classes::find_by_id(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if class.teacher_id.as_deref() != Some(teacher.id.as_str()) {
        return Err(ApiError::Forbidden("You are not assigned to this class"));
    }

    Ok(class)
}
