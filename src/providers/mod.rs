/*!
 * Translation provider implementations.
 *
 * Every provider exposes the same capability, translating one Tamil field
 * value to English, behind the [`Translator`] trait:
 * - Google: managed translation API (Cloud Translation v2)
 * - OpenAI: chat completions
 * - Anthropic: messages API
 * - Offline: local transliteration, no network
 * - Mock: scripted behavior for tests
 */

use async_trait::async_trait;
use log::error;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;
use crate::transaction::TamilField;

pub mod anthropic;
pub mod google;
pub mod mock;
pub mod offline;
pub mod openai;

pub use anthropic::Anthropic;
pub use google::GoogleTranslate;
pub use mock::{MockBehavior, MockTranslator};
pub use offline::OfflineTranslator;
pub use openai::OpenAI;

/// Common trait for all translation providers
///
/// Implementations must be safe to call concurrently; the augmenter may have
/// several requests in flight when batching.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// Translate a Tamil field value to English
    ///
    /// # Arguments
    /// * `text` - The Tamil source text
    /// * `field` - Which field the text came from, used as context
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The English text or an error
    async fn translate(&self, text: &str, field: TamilField) -> Result<String, ProviderError>;
}

/// Build the translator selected by the configuration
pub fn create_translator(config: &Config) -> anyhow::Result<Arc<dyn Translator>> {
    let translation = &config.translation;
    let timeout = translation.get_timeout();
    let common = &translation.common;

    let translator: Arc<dyn Translator> = match translation.provider {
        TranslationProvider::Google => Arc::new(GoogleTranslate::new(
            translation.get_api_key(),
            translation.get_endpoint(),
            timeout,
        )),
        TranslationProvider::OpenAI => Arc::new(
            OpenAI::new(translation.get_api_key(), translation.get_endpoint(), timeout)
                .with_model(translation.get_model())
                .with_prompt(common.system_prompt.clone(), common.temperature),
        ),
        TranslationProvider::Anthropic => Arc::new(
            Anthropic::new(translation.get_api_key(), translation.get_endpoint(), timeout)
                .with_model(translation.get_model())
                .with_prompt(common.system_prompt.clone(), common.temperature),
        ),
        TranslationProvider::Offline => Arc::new(OfflineTranslator),
    };

    Ok(translator)
}

/// Fill the `{field}` placeholder of a system prompt
pub fn render_prompt(template: &str, field: TamilField) -> String {
    template.replace("{field}", field.description())
}

/// Build an HTTP client with the given request timeout
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Send a JSON request and decode the JSON answer, mapping failures to
/// provider errors
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, ProviderError> {
    let timeout_ms = timeout.as_millis() as u64;
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_transport(e, timeout_ms))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("{} API error ({}): {}", provider, status, error_text);
        return Err(ProviderError::from_status(status.as_u16(), error_text));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::ParseError(format!("{} response: {}", provider, e)))
}

/// Trim a provider answer, rejecting empty ones
pub(crate) fn non_empty(text: &str) -> Result<String, ProviderError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ProviderError::EmptyResponse)
    } else {
        Ok(trimmed.to_string())
    }
}
