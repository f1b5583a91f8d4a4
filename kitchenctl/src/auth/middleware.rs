use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument};

use crate::{AppState, api::models::users::CurrentUser, errors::Error};

/// Gate for every catalog route.
///
/// Resolves the session cookie to a [`CurrentUser`], then checks that the cook behind the
/// session still exists, so deleting a cook ends their sessions. The resolved user is stored in
/// the request extensions where the [`CurrentUser`] extractor picks it up again.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn require_login(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    let (mut parts, body) = request.into_parts();
    let current_user = CurrentUser::from_request_parts(&mut parts, &state).await?;

    match state.query.get_cook(current_user.id).await {
        Ok(_) => {}
        Err(Error::NotFound { .. }) => {
            debug!("Session refers to deleted cook {}", current_user.id);
            return Err(Error::Unauthenticated {
                message: Some("Session is no longer valid".to_string()),
            });
        }
        Err(e) => return Err(e),
    }

    parts.extensions.insert(current_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
