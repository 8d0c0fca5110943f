use axum::{extract::State, response::Html};
use axum_extra::extract::SignedCookieJar;

use crate::server::{
    AppState, ServerError,
    templates::{IndexTemplate, render_html},
};

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Html<String>, ServerError> {
    let is_authenticated = state
        .session_id(&jar)
        .and_then(|session_id| state.session_store.credential(&session_id))
        .is_some();

    render_html(&IndexTemplate::new(is_authenticated))
}
