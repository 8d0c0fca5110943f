use askama::Template;
use axum::response::Html;

use crate::server::error::ServerError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub message: Option<String>,
    pub error: Option<String>,
    pub is_authenticated: bool,
    /// Sign-in/out and policy links; the local variant has no such routes.
    pub account_links: bool,
}

impl IndexTemplate {
    pub fn new(is_authenticated: bool) -> Self {
        Self {
            message: None,
            error: None,
            is_authenticated,
            account_links: true,
        }
    }

    pub fn local() -> Self {
        Self {
            account_links: false,
            ..Self::new(true)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Template)]
#[template(path = "privacy.html")]
pub struct PrivacyTemplate;

#[derive(Template)]
#[template(path = "terms.html")]
pub struct TermsTemplate;

pub fn render_html<T: Template>(template: &T) -> Result<Html<String>, ServerError> {
    Ok(Html(template.render()?))
}
