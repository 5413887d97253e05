/*!
 * Common test utilities for the ectrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use ectrans::Config;
use ectrans::pipeline::Pipeline;
use ectrans::providers::MockTranslator;

/// Two registration entries behind a short page header
pub const SAMPLE_CERTIFICATE: &str = "ENCUMBRANCE CERTIFICATE
Sub Registrar Office: Thiruvennainallur
Page 1 of 2

200/2013  05-Feb-2013  06-Feb-2013  Conveyance  House Site
Executant: முருகன்
Claimant: நித்யா
Survey No: 329/1  Plot No: 12  Extent: 1200 Sq.Ft
Village: Thiruvennainallur
Consideration Value: ரூ. 3,14,068/-  Market Value: ரூ. 4,00,000/-
Vol 1592 Page 45
Boundaries: North - Panchayat road

201/2013  10-Mar-2013  11-Mar-2013  Mortgage
Executant: நித்யா
Claimant: கண்ணன்
Survey No: 329/1  Extent: 2 Cents
Consideration Value: ரூ. 1,50,000/-
Vol 1593 Page 12
";

/// Route library logs to the test output; repeated calls are ignored
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Default configuration without request pacing delays
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.translation.common.delay_ms = 0;
    config
}

/// Mock translator that knows the names in the sample certificate
pub fn sample_translator() -> MockTranslator {
    MockTranslator::working()
        .with_translation("முருகன்", "Murugan")
        .with_translation("நித்யா", "Nithya")
        .with_translation("கண்ணன்", "Kannan")
}

/// Pipeline over the default configuration and the given mock
pub fn pipeline_with(translator: &MockTranslator) -> Pipeline {
    Pipeline::new(&fast_config(), Arc::new(translator.clone()))
}
