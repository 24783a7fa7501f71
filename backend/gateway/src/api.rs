//! TextGrab REST endpoints.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use textgrab_core::{TextDocument, TextGrabError};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub uuid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    pub source: String,
    pub target: String,
}

/// Body of `POST /process`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRequest {
    /// Base64 image, optionally as a `data:` URL.
    #[serde(rename = "imageData")]
    pub image_data: String,
    #[serde(default)]
    pub summarize: bool,
    #[serde(default)]
    pub translate: Option<TranslateRequest>,
}

/// Handler for `GET /`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to TextGrab API!".into(),
    })
}

/// Handler for `GET /health`
pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Status OK".into(),
    })
}

/// Handler for `GET /new_session`
pub async fn new_session() -> Json<SessionResponse> {
    let uuid = Uuid::new_v4().to_string();
    debug!(session = %uuid, "Issued session id");
    Json(SessionResponse { uuid })
}

/// Handler for `POST /process`.
///
/// Rate limits by client address, then recognizes the image, rebuilds its
/// layout and optionally summarizes and translates the recognized text.
/// Requested features that are not configured are rejected before any
/// provider is called.
#[instrument(skip_all, fields(client = %addr.ip()))]
pub async fn process(
    State(state): State<GatewayState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<TextDocument>, ApiError> {
    if !state.rate_limiter.check_limit(&addr.ip().to_string()).await {
        return Err(TextGrabError::RateLimited.into());
    }
    let Json(request) = payload.map_err(|e| TextGrabError::BadRequest(e.body_text()))?;

    let summarizer = match (request.summarize, &state.summarizer) {
        (false, _) => None,
        (true, Some(summarizer)) => Some(summarizer.clone()),
        (true, None) => return Err(TextGrabError::NotConfigured("summarization".into()).into()),
    };
    let translation = match (request.translate, &state.translator) {
        (None, _) => None,
        (Some(langs), Some(translator)) => {
            if langs.target.trim().is_empty() {
                return Err(TextGrabError::BadRequest("translate.target is required".into()).into());
            }
            Some((langs, translator.clone()))
        }
        (Some(_), None) => return Err(TextGrabError::NotConfigured("translation".into()).into()),
    };

    let page = state.annotator.annotate_base64(&request.image_data).await?;
    let mut document = page.into_document();

    if document.full_text.trim().is_empty() {
        info!("No text recognized");
        return Ok(Json(document));
    }

    if let Some(summarizer) = summarizer {
        let summary = summarizer
            .summarize(&document.full_text, &state.summary_options)
            .await?;
        debug!(provider = summarizer.name(), chars = summary.len(), "Summarized text");
        document.summary = Some(summary);
    }

    if let Some((langs, translator)) = translation {
        let translated = translator
            .translate(&document.full_text, &langs.source, &langs.target)
            .await?;
        debug!(provider = translator.name(), target = %langs.target, "Translated text");
        document.translation = Some(translated);
    }

    Ok(Json(document))
}
