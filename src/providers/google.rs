/*!
 * Google Cloud Translation (v2 REST) client.
 */

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Translator, http_client, non_empty, send_json};
use crate::errors::ProviderError;
use crate::transaction::TamilField;

const SOURCE_LANGUAGE: &str = "ta";
const TARGET_LANGUAGE: &str = "en";

/// Client for the managed translation API
#[derive(Debug)]
pub struct GoogleTranslate {
    client: Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

/// Translation request body
#[derive(Debug, Serialize)]
pub struct GoogleTranslateRequest {
    pub q: Vec<String>,
    pub source: String,
    pub target: String,
    pub format: String,
}

impl GoogleTranslateRequest {
    /// Tamil to English plain-text request for one string
    pub fn tamil_to_english(text: impl Into<String>) -> Self {
        Self {
            q: vec![text.into()],
            source: SOURCE_LANGUAGE.to_string(),
            target: TARGET_LANGUAGE.to_string(),
            format: "text".to_string(),
        }
    }
}

/// Translation response body
#[derive(Debug, Deserialize)]
pub struct GoogleTranslateResponse {
    pub data: GoogleTranslations,
}

#[derive(Debug, Deserialize)]
pub struct GoogleTranslations {
    #[serde(default)]
    pub translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTranslation {
    pub translated_text: String,
}

impl GoogleTranslate {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://translation.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/language/translate/v2", base)
    }

    /// Send a translation request
    pub async fn complete(&self, request: &GoogleTranslateRequest) -> Result<GoogleTranslateResponse, ProviderError> {
        let builder = self
            .client
            .post(self.api_url())
            .query(&[("key", self.api_key.as_str())])
            .json(request);
        send_json("Google Translate", builder, self.timeout).await
    }

    /// First translated text of a response
    pub fn extract_text_from_response(response: &GoogleTranslateResponse) -> Option<&str> {
        response
            .data
            .translations
            .first()
            .map(|translation| translation.translated_text.as_str())
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, field: TamilField) -> Result<String, ProviderError> {
        debug!("Requesting Google translation for {}", field);
        let response = self.complete(&GoogleTranslateRequest::tamil_to_english(text)).await?;
        let translated = Self::extract_text_from_response(&response).ok_or(ProviderError::EmptyResponse)?;
        non_empty(translated)
    }
}
