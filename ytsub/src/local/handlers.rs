use axum::{Form, extract::State, response::Html};

use crate::channel;
use crate::error::SubscribeError;
use crate::local::LocalState;
use crate::server::{
    ServerError,
    models::SubscribeForm,
    templates::{IndexTemplate, render_html},
};

pub async fn index() -> Result<Html<String>, ServerError> {
    render_html(&IndexTemplate::local())
}

/// POST /subscribe; authorization happens inline on first use
pub async fn subscribe(
    State(state): State<LocalState>,
    Form(form): Form<SubscribeForm>,
) -> Result<Html<String>, ServerError> {
    let result = match state.authorizer.authorize().await {
        Ok(client) => {
            channel::subscribe_to_input(&state.resolver, &form.channel_input, &client).await
        }
        Err(e) => Err(SubscribeError::Auth(e)),
    };

    let page = match result {
        Ok(result) => {
            IndexTemplate::local().with_message(format!("Subscribed to {}!", result.channel_title))
        }
        Err(e) => {
            tracing::warn!(error = %e, input = %form.channel_input, "Subscribe failed");
            IndexTemplate::local().with_error(e.to_string())
        }
    };

    render_html(&page)
}
