//! Google Cloud Translation provider.
//!
//! With an access token the v3 `translateText` method is used under
//! `projects/{project}/locations/{location}`; with an API key the v2 REST
//! endpoint is used instead, since v3 does not accept keys.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use textgrab_core::{Result, TextGrabError, Translator};

use crate::google::{GoogleAuth, error_message};
use crate::http::client_with_timeout;

const PROVIDER: &str = "google-translate";
const BASE_URL: &str = "https://translation.googleapis.com";

pub struct GoogleTranslator {
    client: Client,
    auth: GoogleAuth,
    project_id: String,
    location: String,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(auth: GoogleAuth, project_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            auth,
            project_id: project_id.into(),
            location: "global".to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = client_with_timeout(timeout)?;
        Ok(self)
    }

    /// Parent resource for v3 requests.
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    fn url(&self) -> String {
        match self.auth {
            GoogleAuth::AccessToken { .. } => {
                format!("{}/v3/{}:translateText", self.base_url, self.parent())
            }
            GoogleAuth::ApiKey(_) => format!("{}/language/translate/v2", self.base_url),
        }
    }

    fn body(&self, text: &str, source_lang: &str, target_lang: &str) -> serde_json::Value {
        let body = match self.auth {
            GoogleAuth::AccessToken { .. } => serde_json::to_value(V3Request {
                contents: [text],
                mime_type: "text/plain",
                source_language_code: source_lang,
                target_language_code: target_lang,
            }),
            GoogleAuth::ApiKey(_) => serde_json::to_value(V2Request {
                q: [text],
                source: source_lang,
                target: target_lang,
                format: "text",
            }),
        };
        body.unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct V3Request<'a> {
    contents: [&'a str; 1],
    mime_type: &'static str,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

#[derive(Serialize)]
struct V2Request<'a> {
    q: [&'a str; 1],
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct V3Response {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Default, Deserialize)]
struct V2Response {
    #[serde(default)]
    data: V3Response,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Extract the first translation from either API version's response.
fn first_translation(value: serde_json::Value) -> Option<String> {
    let v3: V3Response = serde_json::from_value(value.clone()).unwrap_or_default();
    let translations = if v3.translations.is_empty() {
        serde_json::from_value::<V2Response>(value)
            .unwrap_or_default()
            .data
            .translations
    } else {
        v3.translations
    };
    translations.into_iter().next().map(|t| t.translated_text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        info!(
            source = source_lang,
            target = target_lang,
            chars = text.len(),
            "Translating text"
        );

        let request = self
            .auth
            .apply(self.client.post(self.url()))
            .json(&self.body(text, source_lang, target_lang));
        let response = request
            .send()
            .await
            .map_err(|e| TextGrabError::provider(PROVIDER, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TextGrabError::provider(PROVIDER, error_message(status, &body)));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TextGrabError::provider(PROVIDER, e.without_url()))?;
        first_translation(value)
            .ok_or_else(|| TextGrabError::provider(PROVIDER, "response had no translations"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token() -> GoogleAuth {
        GoogleAuth::AccessToken {
            token: "t".into(),
            project_id: "demo-project".into(),
        }
    }

    #[test]
    fn v3_url_uses_parent_resource() {
        let t = GoogleTranslator::new(token(), "demo-project");
        assert_eq!(t.parent(), "projects/demo-project/locations/global");
        assert_eq!(
            t.url(),
            "https://translation.googleapis.com/v3/projects/demo-project/locations/global:translateText"
        );
    }

    #[test]
    fn api_key_switches_to_v2() {
        let t = GoogleTranslator::new(GoogleAuth::ApiKey("k".into()), "demo-project");
        assert!(t.url().ends_with("/language/translate/v2"));
        let body = t.body("hola", "es", "en");
        assert_eq!(body, json!({"q": ["hola"], "source": "es", "target": "en", "format": "text"}));
    }

    #[test]
    fn v3_body_shape() {
        let t = GoogleTranslator::new(token(), "demo-project");
        let body = t.body("hola", "es", "en");
        assert_eq!(body["contents"][0], "hola");
        assert_eq!(body["mimeType"], "text/plain");
        assert_eq!(body["sourceLanguageCode"], "es");
        assert_eq!(body["targetLanguageCode"], "en");
    }

    #[test]
    fn reads_both_response_versions() {
        let v3 = json!({"translations": [{"translatedText": "hello"}]});
        let v2 = json!({"data": {"translations": [{"translatedText": "bonjour"}]}});
        assert_eq!(first_translation(v3).as_deref(), Some("hello"));
        assert_eq!(first_translation(v2).as_deref(), Some("bonjour"));
        assert_eq!(first_translation(json!({})), None);
    }
}
