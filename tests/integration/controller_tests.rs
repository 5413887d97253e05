/*!
 * Controller tests: file and folder runs against an in-memory database
 */

use std::sync::Arc;

use ectrans::app_controller::Controller;
use ectrans::database::{Repository, SearchFilters};
use ectrans::providers::MockTranslator;
use crate::common::{self, SAMPLE_CERTIFICATE};

fn controller(translator: &MockTranslator) -> Controller {
    common::init_test_logging();
    Controller::with_parts(
        common::fast_config(),
        Arc::new(translator.clone()),
        Repository::new_in_memory().unwrap(),
    )
}

#[tokio::test]
async fn test_run_withSampleFile_shouldStoreAndFindRecords() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(temp_dir.path(), "ec-2013.txt", SAMPLE_CERTIFICATE).unwrap();
    let controller = controller(&common::sample_translator());

    let outcome = controller.run(file, false).await.unwrap();

    assert_eq!(outcome.stored_ids.len(), 2);
    assert_eq!(controller.repository().count().await.unwrap(), 2);

    let filters = SearchFilters {
        buyer_name: Some("nith".to_string()),
        ..Default::default()
    };
    let found = controller.search(&filters).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].record.document_number.as_deref(), Some("200"));
    assert_eq!(found[0].record.pdf_file_name, "ec-2013.txt");
}

#[tokio::test]
async fn test_run_withDryRun_shouldNotStore() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(temp_dir.path(), "ec-2013.txt", SAMPLE_CERTIFICATE).unwrap();
    let controller = controller(&common::sample_translator());

    let outcome = controller.run(file, true).await.unwrap();

    assert_eq!(outcome.report.record_count(), 2);
    assert!(outcome.stored_ids.is_empty());
    assert_eq!(controller.repository().count().await.unwrap(), 0);
}

#[test]
fn test_run_withMissingFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = controller(&MockTranslator::working());

    let result = tokio_test::block_on(controller.run(temp_dir.path().join("missing.txt"), false));

    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_withBinaryFile_shouldRejectAndStoreNothing() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file = temp_dir.path().join("scan.txt");
    std::fs::write(&file, [0x25, 0x50, 0x44, 0x46, 0x00, 0xff]).unwrap();
    let controller = controller(&MockTranslator::working());

    let error = controller.run(file, false).await.unwrap_err();

    assert!(format!("{:#}", error).contains("Malformed input"));
    assert_eq!(controller.repository().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_runFolder_withBadFile_shouldContinueWithOthers() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "a-ec.txt", SAMPLE_CERTIFICATE).unwrap();
    common::create_test_file(temp_dir.path(), "b-broken.txt", "200/2013\0\0\0").unwrap();
    common::create_test_file(temp_dir.path(), "notes.md", "not a certificate").unwrap();
    let controller = controller(&common::sample_translator());

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await.unwrap();

    assert_eq!(summary.outcomes.len(), 1);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.record_count(), 2);
    assert!(!summary.cancelled);
    assert_eq!(controller.repository().count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_runFolder_withoutTextFiles_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "scan.pdf", "%PDF").unwrap();
    let controller = controller(&MockTranslator::working());

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());
    assert!(controller.run_folder(temp_dir.path().join("missing"), false).await.is_err());
}

#[tokio::test]
async fn test_runFolder_withCancelledFlag_shouldStopBeforeFirstFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_test_file(temp_dir.path(), "ec.txt", SAMPLE_CERTIFICATE).unwrap();
    let controller = controller(&common::sample_translator());
    controller.cancellation_flag().cancel();

    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await.unwrap();

    assert!(summary.cancelled);
    assert!(summary.outcomes.is_empty());
    assert_eq!(controller.repository().count().await.unwrap(), 0);
}
