use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_payload;
use crate::core::redis::login_rate_key;
use crate::core::security;
use crate::core::state::AppState;
use crate::db::models::User;
use crate::repositories;
use crate::schemas::auth::TokenResponse;
use crate::schemas::user::{UserLogin, UserResponse};

const INVALID_CREDENTIALS: &str = "Incorrect email or password";

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/login", post(login)).route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_payload(&payload)?;

    let security_settings = state.settings().security();
    let allowed = state
        .redis()
        .rate_limit(
            &login_rate_key(&payload.email),
            security_settings.login_rate_limit,
            security_settings.login_rate_window_seconds,
        )
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let user = fetch_user_by_email(&state, &payload.email).await?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS))?;
    if !verified {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let token = security::create_access_token(&user.id, user.role, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(TokenResponse {
        token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user),
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn fetch_user_by_email(state: &AppState, email: &str) -> Result<User, ApiError> {
    repositories::users::find_by_email(state.db(), email.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::types::UserRole;
    use crate::test_support;

    #[tokio::test]
    async fn login_returns_token_for_valid_credentials() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(
            ctx.state.db(),
            "Hana Head",
            "Hana@School.test",
            UserRole::Head,
            "head-password",
        )
        .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "hana@school.test", "password": "head-password"})),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["user"]["role"], "head");
        let token = body["token"].as_str().expect("token").to_string();

        let response = ctx
            .app
            .oneshot(test_support::json_request(Method::GET, "/api/auth/me", Some(&token), None))
            .await
            .expect("me");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["name"], "Hana Head");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let ctx = test_support::setup_test_context().await;
        test_support::insert_user(
            ctx.state.db(),
            "Tom Teacher",
            "tom@school.test",
            UserRole::Teacher,
            "teacher-password",
        )
        .await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({"email": "tom@school.test", "password": "nope-nope"})),
            ))
            .await
            .expect("login");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "response: {body}");
        assert_eq!(body["error"]["message"], "Incorrect email or password");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(Method::GET, "/api/auth/me", None, None))
            .await
            .expect("me");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
