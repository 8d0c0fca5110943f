use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;

use crate::auth::{Authorization, Authorizer};
use crate::channel;
use crate::error::SubscribeError;
use crate::server::{
    AppState, ServerError,
    models::SubscribeForm,
    services::SessionCredentials,
    templates::{IndexTemplate, render_html},
};

/// POST /subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SubscribeForm>,
) -> Result<Response, ServerError> {
    let Some(session_id) = state.session_id(&jar) else {
        return Ok(Redirect::to("/auth").into_response());
    };

    tracing::debug!(session_id = %session_id, "Subscribe requested");

    let authorizer = Authorizer::new(
        SessionCredentials::new(state.session_store.clone(), session_id),
        &state.oauth_client,
        &state.api_base_url,
    );

    let client = match authorizer.authorize().await {
        Ok(Authorization::Authorized(client)) => client,
        Ok(Authorization::Required) => return Ok(Redirect::to("/auth").into_response()),
        Err(e) => {
            tracing::warn!(error = %e, "Authorization failed");
            let page = IndexTemplate::new(false).with_error(SubscribeError::Auth(e).to_string());
            return Ok(render_html(&page)?.into_response());
        }
    };

    let page = match channel::subscribe_to_input(&state.resolver, &form.channel_input, &client)
        .await
    {
        Ok(result) => IndexTemplate::new(true)
            .with_message(format!("Subscribed to {}!", result.channel_title)),
        Err(e) => {
            tracing::warn!(error = %e, input = %form.channel_input, "Subscribe failed");
            IndexTemplate::new(true).with_error(e.to_string())
        }
    };

    Ok(render_html(&page)?.into_response())
}
