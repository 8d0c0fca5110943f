use std::{sync::Arc, time::Duration};

use axum::{Router, extract::Query, response::Html, routing::get};
use tokio::{net::TcpListener, sync::oneshot};

use crate::error::AuthError;
use crate::server::models::CallbackParams;

pub const CALLBACK_PATH: &str = "/auth/callback";

/// How long the operator has to finish the consent screen
pub const CONSENT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// One-shot HTTP listener on loopback that receives the consent redirect.
pub struct ConsentListener {
    listener: TcpListener,
    port: u16,
}

impl ConsentListener {
    /// Bind `127.0.0.1:{port}`; port 0 picks a free one.
    pub async fn bind(port: u16) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        let port = listener.local_addr()?.port();

        Ok(Self { listener, port })
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.port, CALLBACK_PATH)
    }

    /// Serve until the first callback arrives, returning its authorization code.
    pub async fn wait_for_code(
        self,
        expected_state: &str,
        timeout: Duration,
    ) -> Result<String, AuthError> {
        let (tx, rx) = oneshot::channel::<Result<String, AuthError>>();
        let tx = Arc::new(std::sync::Mutex::new(Some(tx)));
        let expected_state = expected_state.to_string();

        let app = Router::new().route(
            CALLBACK_PATH,
            get(move |Query(params): Query<CallbackParams>| {
                let tx = tx.lock().unwrap_or_else(|e| e.into_inner()).take();
                let result = check_callback(params, &expected_state);
                async move {
                    let page = match &result {
                        Ok(_) => Html(
                            "<h1>Authorization complete</h1><p>You can close this window and return to ytsub.</p>"
                                .to_string(),
                        ),
                        Err(e) => Html(format!(
                            "<h1>Authorization failed</h1><p>Error: {}</p>",
                            e.code()
                        )),
                    };
                    if let Some(tx) = tx {
                        let _ = tx.send(result);
                    }
                    page
                }
            }),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .into_future(),
        );

        let outcome = tokio::select! {
            result = rx => result.unwrap_or_else(|_| {
                Err(AuthError::Configuration("Consent listener stopped".to_string()))
            }),
            _ = tokio::time::sleep(timeout) => Err(AuthError::Timeout),
        };

        // Lets the browser receive the result page before the listener closes
        let _ = shutdown_tx.send(());

        outcome
    }
}

fn check_callback(params: CallbackParams, expected_state: &str) -> Result<String, AuthError> {
    if let Some(error) = params.error {
        return Err(AuthError::Denied(error));
    }

    let code = params.code.ok_or(AuthError::MissingCode)?;

    if params.state.as_deref() != Some(expected_state) {
        return Err(AuthError::StateMismatch);
    }

    Ok(code)
}
