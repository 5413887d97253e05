/*!
 * Tests for translation augmentation: fallback, pacing and cancellation
 */

use std::sync::Arc;
use std::time::Duration;

use ectrans::RawTransaction;
use ectrans::app_config::FallbackPolicy;
use ectrans::providers::MockTranslator;
use ectrans::transaction::TamilField;
use ectrans::translation::{AugmentOptions, Augmenter, CancellationFlag, Pacing};

fn sequential() -> AugmentOptions {
    AugmentOptions::default().with_pacing(Pacing::Sequential { delay: Duration::ZERO })
}

fn augmenter(translator: &MockTranslator, options: AugmentOptions) -> Augmenter {
    Augmenter::new(Arc::new(translator.clone()), options)
}

fn record(number: &str, seller: Option<&str>, buyer: Option<&str>) -> RawTransaction {
    RawTransaction {
        seller_name_tamil: seller.map(str::to_string),
        buyer_name_tamil: buyer.map(str::to_string),
        ..RawTransaction::with_identity(number, "2013")
    }
}

#[tokio::test]
async fn test_augment_withWorkingProvider_shouldUseTranslations() {
    let translator = MockTranslator::working()
        .with_translation("முருகன்", "Murugan")
        .with_translation("நித்யா", "Nithya");

    let outcome = augmenter(&translator, sequential())
        .augment(vec![record("200", Some("முருகன்"), Some("நித்யா"))], &CancellationFlag::new())
        .await;

    let first = &outcome.records[0];
    assert_eq!(first.seller_name.as_deref(), Some("Murugan"));
    assert_eq!(first.buyer_name.as_deref(), Some("Nithya"));
    assert_eq!(first.raw.seller_name_tamil.as_deref(), Some("முருகன்"));
    assert_eq!(outcome.stats.provider_calls, 2);
    assert_eq!(outcome.stats.provider_failures, 0);
    assert!(!outcome.cancelled);
}

#[tokio::test]
async fn test_augment_withFailingProvider_shouldTransliterateNames() {
    let translator = MockTranslator::failing();

    let outcome = augmenter(&translator, sequential())
        .augment(vec![record("200", Some("முருகன்"), Some("நித்யா"))], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].seller_name.as_deref(), Some("Murukan"));
    assert_eq!(outcome.records[0].buyer_name.as_deref(), Some("Nithya"));
    assert_eq!(outcome.stats.provider_failures, 2);
    assert_eq!(outcome.stats.transliterated, 2);
}

#[tokio::test]
async fn test_augment_withLeaveUnsetPolicy_shouldLeaveNamesAbsent() {
    let translator = MockTranslator::failing();
    let options = sequential().with_fallback(FallbackPolicy::LeaveUnset);

    let outcome = augmenter(&translator, options)
        .augment(vec![record("200", Some("முருகன்"), None)], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].seller_name, None);
    assert_eq!(outcome.records[0].raw.seller_name_tamil.as_deref(), Some("முருகன்"));
    assert_eq!(outcome.stats.transliterated, 0);
}

#[tokio::test]
async fn test_augment_withEmptyAnswer_shouldFallBack() {
    let translator = MockTranslator::empty();

    let outcome = augmenter(&translator, sequential())
        .augment(vec![record("200", None, Some("கண்ணன்"))], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].buyer_name.as_deref(), Some("Kannan"));
    assert_eq!(outcome.stats.provider_failures, 1);
}

#[tokio::test]
async fn test_augment_withSlowProvider_shouldTimeOutAndFallBack() {
    let translator = MockTranslator::slow(500);
    let options = sequential().with_request_timeout(Duration::from_millis(20));

    let outcome = augmenter(&translator, options)
        .augment(vec![record("200", Some("நித்யா"), None)], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].seller_name.as_deref(), Some("Nithya"));
    assert_eq!(outcome.stats.provider_failures, 1);
}

#[tokio::test]
async fn test_augment_withIntermittentProvider_shouldOnlyAffectFailedField() {
    let translator = MockTranslator::intermittent(2)
        .with_translation("முருகன்", "Murugan")
        .with_translation("நித்யா", "Nithya");

    let outcome = augmenter(&translator, sequential())
        .augment(vec![record("200", Some("முருகன்"), Some("நித்யா"))], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].seller_name.as_deref(), Some("Murugan"));
    assert_eq!(outcome.records[0].buyer_name.as_deref(), Some("Nithya"));
    assert_eq!(outcome.stats.provider_failures, 1);
    assert_eq!(outcome.stats.transliterated, 1);
}

#[tokio::test]
async fn test_augment_withSequentialPacing_shouldKeepOneRequestInFlight() {
    let translator = MockTranslator::slow(5);
    let records = vec![
        record("200", Some("முருகன்"), None),
        record("201", Some("நித்யா"), None),
        record("202", Some("கண்ணன்"), None),
    ];

    augmenter(&translator, sequential()).augment(records, &CancellationFlag::new()).await;

    assert_eq!(translator.request_count(), 3);
    assert_eq!(translator.max_in_flight(), 1);
}

#[tokio::test]
async fn test_augment_withBatchedPacing_shouldRunBatchInParallelAndKeepOrder() {
    let translator = MockTranslator::slow(20)
        .with_translation("முருகன்", "Murugan")
        .with_translation("நித்யா", "Nithya")
        .with_translation("கண்ணன்", "Kannan");
    let options = sequential().with_pacing(Pacing::Batched {
        batch_size: 3,
        delay: Duration::ZERO,
    });
    let records = vec![
        record("200", Some("முருகன்"), None),
        record("201", Some("நித்யா"), None),
        record("202", Some("கண்ணன்"), None),
    ];

    let outcome = augmenter(&translator, options).augment(records, &CancellationFlag::new()).await;

    let sellers: Vec<_> = outcome.records.iter().map(|r| r.seller_name.clone().unwrap_or_default()).collect();
    let numbers: Vec<_> = outcome.records.iter().map(|r| r.raw.document_number.clone().unwrap_or_default()).collect();
    assert_eq!(sellers, vec!["Murugan", "Nithya", "Kannan"]);
    assert_eq!(numbers, vec!["200", "201", "202"]);
    assert!(translator.max_in_flight() > 1);
}

#[tokio::test]
async fn test_augment_withAbsentNames_shouldNotCallProvider() {
    let translator = MockTranslator::working();

    let outcome = augmenter(&translator, sequential())
        .augment(vec![record("200", None, None)], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].seller_name, None);
    assert_eq!(outcome.records[0].buyer_name, None);
    assert_eq!(translator.request_count(), 0);
}

#[tokio::test]
async fn test_augment_withFailingProvider_shouldKeepPlaceSource() {
    let translator = MockTranslator::failing();
    let raw = RawTransaction {
        village: Some("அரசூர்".to_string()),
        ..record("200", None, None)
    };

    let outcome = augmenter(&translator, sequential())
        .augment(vec![raw], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].resolved(TamilField::Village), Some("அரசூர்"));
    assert_eq!(outcome.stats.transliterated, 0);
}

#[tokio::test]
async fn test_augment_withPlaceFieldsDisabled_shouldOnlySendNames() {
    let translator = MockTranslator::working();
    let raw = RawTransaction {
        village: Some("அரசூர்".to_string()),
        ..record("200", Some("முருகன்"), None)
    };

    let outcome = augmenter(&translator, sequential().with_place_fields(false))
        .augment(vec![raw], &CancellationFlag::new())
        .await;

    assert_eq!(outcome.records[0].village.as_deref(), Some("அரசூர்"));
    assert_eq!(translator.requests(), vec![(TamilField::SellerName, "முருகன்".to_string())]);
}

#[tokio::test]
async fn test_augment_cancelledDuringRun_shouldReturnCompletedPrefix() {
    let translator = MockTranslator::working();
    let cancel = CancellationFlag::new();
    let trigger = cancel.clone();
    let records = vec![
        record("200", Some("முருகன்"), None),
        record("201", Some("நித்யா"), None),
        record("202", Some("கண்ணன்"), None),
    ];

    let outcome = augmenter(&translator, sequential())
        .augment_with_progress(records, &cancel, move |completed, _| {
            if completed == 1 {
                trigger.cancel();
            }
        })
        .await;

    assert!(outcome.cancelled);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].raw.document_number.as_deref(), Some("200"));
    assert_eq!(translator.request_count(), 1);
}
