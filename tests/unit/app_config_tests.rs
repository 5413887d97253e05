/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use ectrans::app_config::{Config, FallbackPolicy, LogLevel, PacingMode, TranslationProvider};
use crate::common;

fn offline_config() -> Config {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Offline;
    config
}

/// Test configuration validation
#[test]
fn test_validate_withVariousConfigs_shouldValidateCorrectly() {
    // Offline needs no key or endpoint
    let mut config = offline_config();
    assert!(config.validate().is_ok());

    config.translation.common.batch_size = 0;
    assert!(config.validate().is_err());
    config.translation.common.batch_size = 5;

    config.translation.common.temperature = 1.5;
    assert!(config.validate().is_err());
    config.translation.common.temperature = 0.3;

    config.extraction.min_block_chars = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withRemoteProviderAndKey_shouldCheckEndpoint() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    config.translation.active_provider_config_mut().api_key = "test-key".to_string();
    assert!(config.validate().is_ok());

    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_activeProviderConfigMut_withMissingEntry_shouldCreateIt() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::OpenAI;

    config.translation.active_provider_config_mut().model = "gpt-4o-mini".to_string();

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "gpt-4o-mini");
}

#[test]
fn test_getters_withoutProviderEntry_shouldUseDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Anthropic;

    assert!(config.translation.get_model().starts_with("claude"));
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.translation.get_timeout(), Duration::from_secs(30));
}

/// Test saving then loading preserves every section
#[test]
fn test_saveAndLoad_shouldPreserveValues() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = offline_config();
    config.translation.common.pacing = PacingMode::Batched;
    config.translation.common.fallback = FallbackPolicy::LeaveUnset;
    config.storage.database_path = Some(temp_dir.path().join("records.db"));
    config.log_level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::load_or_create(&path).unwrap();

    assert_eq!(loaded.translation.provider, TranslationProvider::Offline);
    assert_eq!(loaded.translation.common.pacing, PacingMode::Batched);
    assert_eq!(loaded.translation.common.fallback, FallbackPolicy::LeaveUnset);
    assert_eq!(loaded.storage.database_path, config.storage.database_path);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.extraction.known_villages, config.extraction.known_villages);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.translation.provider, TranslationProvider::Google);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::default(), LogLevel::Info);
}
