use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie::Cookie};

use crate::auth::{Authorizer, OAuthClient};
use crate::error::{AuthError, SubscribeError};
use crate::server::{
    AppState, SESSION_COOKIE, ServerError,
    models::CallbackParams,
    services::SessionCredentials,
    templates::{IndexTemplate, render_html},
};

/// GET /auth: send the browser to Google's consent screen
pub async fn initiate_auth(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Redirect) {
    let session_id = state
        .session_id(&jar)
        .unwrap_or_else(|| state.session_store.create_session());

    // Generate CSRF state token
    let csrf_state = OAuthClient::generate_state_token();
    state
        .session_store
        .set_oauth_state(&session_id, csrf_state.clone());

    let auth_url = state.oauth_client.build_authorization_url(&csrf_state);

    tracing::info!(session_id = %session_id, "Redirecting to consent screen");

    (
        jar.add(state.session_cookie(session_id)),
        Redirect::to(&auth_url),
    )
}

/// GET /auth/google/callback
pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ServerError> {
    match complete_callback(&state, &jar, params).await {
        Ok(()) => Ok(Redirect::to("/").into_response()),
        Err(e) => {
            tracing::warn!(error = %e, code = e.code(), "OAuth callback failed");
            let page = IndexTemplate::new(false).with_error(SubscribeError::Auth(e).to_string());
            Ok(render_html(&page)?.into_response())
        }
    }
}

async fn complete_callback(
    state: &AppState,
    jar: &SignedCookieJar,
    params: CallbackParams,
) -> Result<(), AuthError> {
    // Check for OAuth errors
    if let Some(error) = params.error {
        return Err(AuthError::Denied(error));
    }

    let code = params.code.ok_or(AuthError::MissingCode)?;

    let session_id = state.session_id(jar).ok_or(AuthError::StateMismatch)?;
    let expected_state = state.session_store.take_oauth_state(&session_id);
    if expected_state.is_none() || expected_state != params.state {
        return Err(AuthError::StateMismatch);
    }

    let authorizer = Authorizer::new(
        SessionCredentials::new(state.session_store.clone(), session_id.clone()),
        &state.oauth_client,
        &state.api_base_url,
    );
    authorizer.complete(&code).await?;

    tracing::info!(session_id = %session_id, "OAuth callback successful");

    Ok(())
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> impl IntoResponse {
    if let Some(session_id) = state.session_id(&jar) {
        state.session_store.delete_session(&session_id);
        tracing::info!(session_id = %session_id, "Signed out");
    }

    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to("/"),
    )
}
