//! Shared plumbing for Google Cloud REST endpoints.

use reqwest::RequestBuilder;
use serde::Deserialize;

/// How requests to Google Cloud are authenticated.
#[derive(Clone)]
pub enum GoogleAuth {
    /// API key passed as the `key` query parameter.
    ApiKey(String),
    /// Pre-minted OAuth access token, billed to `project_id`.
    AccessToken { token: String, project_id: String },
}

impl GoogleAuth {
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::ApiKey(key) => request.query(&[("key", key)]),
            Self::AccessToken { token, project_id } => request
                .bearer_auth(token)
                .header("x-goog-user-project", project_id),
        }
    }
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(***)"),
            Self::AccessToken { project_id, .. } => {
                write!(f, "AccessToken {{ project_id: {project_id:?} }}")
            }
        }
    }
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Status,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Status {
    #[serde(default)]
    pub message: String,
}

/// Best-effort message from a failed response body.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            format!("{} ({})", envelope.error.message, status)
        }
        _ => format!("HTTP {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secrets() {
        let auth = GoogleAuth::ApiKey("AIza-secret".into());
        assert!(!format!("{auth:?}").contains("secret"));
        let auth = GoogleAuth::AccessToken {
            token: "ya29.secret".into(),
            project_id: "demo".into(),
        };
        let shown = format!("{auth:?}");
        assert!(!shown.contains("ya29"));
        assert!(shown.contains("demo"));
    }

    #[test]
    fn error_message_prefers_google_status() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid"}}"#;
        let msg = error_message(reqwest::StatusCode::FORBIDDEN, body);
        assert!(msg.starts_with("API key not valid"));
        assert_eq!(error_message(reqwest::StatusCode::BAD_GATEWAY, "<html>"), "HTTP 502 Bad Gateway");
    }
}
