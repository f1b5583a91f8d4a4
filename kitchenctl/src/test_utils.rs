//! Test helpers: an in-memory application and logged-in sessions.

use crate::{
    AppState, Application,
    api::models::{cooks::CookCreate, users::CurrentUser},
    auth::session::create_session_token,
    config::{Config, DatabaseConfig, PasswordConfig, SessionConfig},
};
use axum_test::TestServer;

/// Password of the initial cook in [`create_test_config`]
pub const TEST_ADMIN_PASSWORD: &str = "kitchen-admin-password";

const SESSION_USERNAME: &str = "tester";

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        admin_username: "admin".to_string(),
        admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        auth: crate::config::AuthConfig {
            session: SessionConfig {
                cookie_secure: false,
                ..Default::default()
            },
            // Cheap hashing keeps the suite fast
            password: PasswordConfig {
                argon2_memory_kib: 1024,
                argon2_iterations: 1,
                argon2_parallelism: 1,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

pub async fn create_test_app() -> (TestServer, AppState) {
    let app = Application::new(create_test_config())
        .await
        .expect("Failed to create application");
    app.into_test_server()
}

/// A `Cookie` header value carrying a valid session for the cook `tester`, created on first use.
pub async fn session_cookie(state: &AppState) -> String {
    let cook = match state.query.get_cook_by_username(SESSION_USERNAME).await.unwrap() {
        Some(cook) => cook,
        None => state
            .mutation
            .create_cook(CookCreate {
                username: SESSION_USERNAME.to_string(),
                first_name: Some("Test".to_string()),
                last_name: Some("Cook".to_string()),
                years_of_experience: Some(1),
                password: None,
            })
            .await
            .unwrap(),
    };
    let token = create_session_token(&CurrentUser::from(cook), &state.config).unwrap();
    format!("{}={}", state.config.auth.session.cookie_name, token)
}
