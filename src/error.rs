use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("NIM_API_KEY environment variable is not set")]
    MissingCredential,

    #[error("Proxy request failed")]
    Upstream(#[from] reqwest::Error),
}

// All handler faults resolve here; the caller always gets a JSON body with a
// well-formed status, never a hung connection.
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = match &self {
            ProxyError::MissingCredential => json!({
                "error": self.to_string(),
            }),
            ProxyError::Upstream(source) => json!({
                "error": self.to_string(),
                "details": source.to_string(),
            }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
