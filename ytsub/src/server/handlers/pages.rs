use axum::response::Html;

use crate::server::{
    ServerError,
    templates::{PrivacyTemplate, TermsTemplate, render_html},
};

pub async fn privacy() -> Result<Html<String>, ServerError> {
    render_html(&PrivacyTemplate)
}

pub async fn terms() -> Result<Html<String>, ServerError> {
    render_html(&TermsTemplate)
}
