use axum::{Json, extract::State};

use crate::{
    AppState,
    api::{
        extract::JsonBody,
        models::{
            auth::{AuthResponse, AuthSuccessResponse, LoginRequest, LoginResponse, LogoutResponse},
            cooks::CookResponse,
            users::CurrentUser,
        },
    },
    auth::{password, session},
    config::Config,
    errors::{Error, Result},
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login with username and password
#[utoipa::path(
    post,
    path = "/authentication/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful; the session cookie is set", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all, fields(username = %request.username))]
pub async fn login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<LoginResponse> {
    let invalid = || Error::Unauthenticated {
        message: Some(INVALID_CREDENTIALS.to_string()),
    };

    let cook = state.query.get_cook_by_username(&request.username).await?.ok_or_else(invalid)?;

    // Cooks without a credential cannot log in
    let hash = cook.password_hash.clone().ok_or_else(invalid)?;
    if !password::verify_blocking(request.password, hash).await? {
        return Err(invalid());
    }

    let current_user = CurrentUser::from(cook.clone());
    let token = session::create_session_token(&current_user, &state.config)?;
    let cookie = create_session_cookie(&token, &state.config);

    Ok(LoginResponse {
        auth_response: AuthResponse {
            user: CookResponse::from(cook),
            message: "Login successful".to_string(),
        },
        cookie,
    })
}

/// Logout (clear session)
#[utoipa::path(
    post,
    path = "/authentication/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse> {
    // Expired cookie overwrites the session
    let cookie = cookie_string("", 0, &state.config);

    Ok(LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Logout successful".to_string(),
        },
        cookie,
    })
}

/// The cook this session belongs to
#[utoipa::path(
    get,
    path = "/admin/api/v1/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Current cook", body = CookResponse),
        (status = 401, description = "Not logged in"),
    ),
    security(("CookieAuth" = []))
)]
#[tracing::instrument(skip_all, fields(cook_id = current_user.id))]
pub async fn get_current_user(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<CookResponse>> {
    let cook = state.query.get_cook(current_user.id).await?;
    Ok(Json(CookResponse::from(cook)))
}

fn cookie_string(value: &str, max_age: u64, config: &Config) -> String {
    let session = &config.auth.session;
    let secure = if session.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={}; Path=/; HttpOnly{}; SameSite={}; Max-Age={}",
        session.cookie_name, value, secure, session.cookie_same_site, max_age
    )
}

/// Session cookie living exactly as long as the token inside it
fn create_session_cookie(token: &str, config: &Config) -> String {
    cookie_string(token, config.auth.security.jwt_expiry.as_secs(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_ADMIN_PASSWORD, create_test_app, create_test_config};
    use axum::http::{StatusCode, header::SET_COOKIE};
    use serde_json::json;

    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[test]
    fn test_cookie_attributes() {
        let mut config = create_test_config();
        config.auth.session.cookie_secure = true;

        let cookie = create_session_cookie("abc", &config);
        assert!(cookie.starts_with(&format!("{}=abc; Path=/; HttpOnly; Secure;", config.auth.session.cookie_name)));
        assert!(cookie.ends_with(&format!("Max-Age={}", config.auth.security.jwt_expiry.as_secs())));

        config.auth.session.cookie_secure = false;
        assert!(!create_session_cookie("abc", &config).contains("Secure"));
    }

    #[test_log::test(tokio::test)]
    async fn test_login_then_me_then_logout() {
        let (server, state) = create_test_app().await;

        let response = server
            .post("/authentication/login")
            .json(&json!({"username": state.config.admin_username, "password": TEST_ADMIN_PASSWORD}))
            .await;
        response.assert_status_ok();
        let body: AuthResponse = response.json();
        assert_eq!(body.user.username, state.config.admin_username);

        let set_cookie = response.header(SET_COOKIE);
        let cookie = cookie_pair(set_cookie.to_str().unwrap());

        let me = server.get("/admin/api/v1/me").add_header("cookie", cookie.clone()).await;
        me.assert_status_ok();
        assert_eq!(me.json::<CookResponse>().id, body.user.id);

        let logout = server.post("/authentication/logout").await;
        logout.assert_status_ok();
        let cleared = logout.header(SET_COOKIE);
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
        assert_eq!(cookie_pair(cleared.to_str().unwrap()), format!("{}=", state.config.auth.session.cookie_name));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (server, state) = create_test_app().await;

        let wrong_password = server
            .post("/authentication/login")
            .json(&json!({"username": state.config.admin_username, "password": "not-the-password"}))
            .await;
        wrong_password.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.text(), INVALID_CREDENTIALS);

        let unknown = server
            .post("/authentication/login")
            .json(&json!({"username": "nobody", "password": TEST_ADMIN_PASSWORD}))
            .await;
        unknown.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.text(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_cook_without_password_cannot_login() {
        let (server, state) = create_test_app().await;
        state
            .mutation
            .create_cook(crate::api::models::cooks::CookCreate {
                username: "nopass".into(),
                first_name: None,
                last_name: None,
                years_of_experience: None,
                password: None,
            })
            .await
            .unwrap();

        server
            .post("/authentication/login")
            .json(&json!({"username": "nopass", "password": ""}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let (server, _state) = create_test_app().await;
        server.get("/admin/api/v1/me").await.assert_status(StatusCode::UNAUTHORIZED);
    }
}
