use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use tracing::{debug, instrument, trace};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    config::Config,
    errors::{Error, Result},
};

/// Extract the cook from the session cookie, if present.
///
/// Returns:
/// - None: no session cookie present
/// - Some(Ok(user)): a valid session token was found
/// - Some(Err(error)): the cookie header was unreadable, or every session cookie was invalid
#[instrument(skip(parts, config))]
pub(crate) fn try_session_auth(parts: &Parts, config: &Config) -> Option<Result<CurrentUser>> {
    let cookie_header = parts.headers.get(COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    let mut last_error = None;
    for cookie in cookie_str.split(';') {
        let Some((name, value)) = cookie.trim().split_once('=') else {
            continue;
        };
        if name != cookie_name {
            continue;
        }
        match session::verify_session_token(value, config) {
            Ok(user) => return Some(Ok(user)),
            // Expired tokens are expected; keep looking in case a fresher cookie follows
            Err(e) => last_error = Some(e),
        }
    }
    last_error.map(Err)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // `require_login` has already resolved and re-checked the cook for this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            trace!("Using cook resolved by require_login: {}", user.id);
            return Ok(user.clone());
        }

        match try_session_auth(parts, &state.config) {
            Some(Ok(user)) => {
                debug!("Found session authenticated cook: {}", user.id);
                Ok(user)
            }
            Some(Err(e)) => {
                trace!("Session authentication failed: {:?}", e);
                Err(e)
            }
            None => Err(Error::Unauthenticated { message: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::session::create_session_token, test_utils::create_test_config};
    use axum::http::Request;

    fn ben() -> CurrentUser {
        CurrentUser {
            id: 2,
            username: "ben".to_string(),
            first_name: "Ben".to_string(),
            last_name: "Ford".to_string(),
        }
    }

    fn parts_with_cookie(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/admin/api/v1/me");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_no_cookie_header_is_not_attempted() {
        let config = create_test_config();
        assert!(try_session_auth(&parts_with_cookie(None), &config).is_none());
    }

    #[test]
    fn test_unrelated_cookies_are_ignored() {
        let config = create_test_config();
        let parts = parts_with_cookie(Some("theme=dark; lang=en"));
        assert!(try_session_auth(&parts, &config).is_none());
    }

    #[test]
    fn test_valid_session_cookie_among_others() {
        let config = create_test_config();
        let token = create_session_token(&ben(), &config).unwrap();
        let header = format!("theme=dark; {}={token}", config.auth.session.cookie_name);

        let user = try_session_auth(&parts_with_cookie(Some(&header)), &config).unwrap().unwrap();
        assert_eq!(user, ben());
    }

    #[test]
    fn test_stale_cookie_followed_by_valid_one() {
        let config = create_test_config();
        let token = create_session_token(&ben(), &config).unwrap();
        let name = &config.auth.session.cookie_name;
        let header = format!("{name}=garbage; {name}={token}");

        let user = try_session_auth(&parts_with_cookie(Some(&header)), &config).unwrap().unwrap();
        assert_eq!(user.username, "ben");
    }

    #[test]
    fn test_only_invalid_session_cookie_is_unauthenticated() {
        let config = create_test_config();
        let header = format!("{}=garbage", config.auth.session.cookie_name);

        let result = try_session_auth(&parts_with_cookie(Some(&header)), &config).unwrap();
        assert!(matches!(result, Err(Error::Unauthenticated { .. })));
    }
}
