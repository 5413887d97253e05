/*!
 * Offline provider: answers with the local transliteration.
 *
 * Lets the pipeline run without network access or API keys. Names come out
 * romanized; place fields are returned unchanged.
 */

use async_trait::async_trait;

use super::Translator;
use crate::errors::ProviderError;
use crate::transaction::TamilField;
use crate::translation::transliteration::transliterate;

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTranslator;

#[async_trait]
impl Translator for OfflineTranslator {
    fn name(&self) -> &str {
        "offline"
    }

    async fn translate(&self, text: &str, field: TamilField) -> Result<String, ProviderError> {
        if !field.is_name() {
            // Place fields keep their Tamil source
            return Ok(text.to_string());
        }
        transliterate(text).ok_or(ProviderError::EmptyResponse)
    }
}
