/*!
 * Tests for transaction storage
 */

use ectrans::NewTransactionRecord;
use ectrans::database::{DatabaseConnection, Repository, SearchFilters};
use crate::common;

fn record(number: &str, buyer: &str, survey: &str, file: &str) -> NewTransactionRecord {
    NewTransactionRecord {
        document_number: Some(number.to_string()),
        document_year: Some("2013".to_string()),
        buyer_name: Some(buyer.to_string()),
        survey_number: Some(survey.to_string()),
        consideration_value: Some("314068".to_string()),
        pdf_file_name: file.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_insertAll_shouldReturnIdsInInputOrder() {
    let repository = Repository::new_in_memory().unwrap();

    let ids = repository
        .insert_all(vec![
            record("200", "Nithya", "329/1", "a.txt"),
            record("201", "Kannan", "329/1", "a.txt"),
        ])
        .await
        .unwrap();

    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);
    assert_eq!(repository.count().await.unwrap(), 2);

    let stored = repository.find_by_id(ids[1]).await.unwrap().unwrap();
    assert_eq!(stored.record.document_number.as_deref(), Some("201"));
    assert_eq!(stored.record.consideration_value.as_deref(), Some("314068"));
    assert!(!stored.created_at.is_empty());
}

#[tokio::test]
async fn test_insertAll_withEmptyBatch_shouldStoreNothing() {
    let repository = Repository::new_in_memory().unwrap();

    let ids = repository.insert_all(Vec::new()).await.unwrap();

    assert!(ids.is_empty());
    assert_eq!(repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_query_withSeveralFilters_shouldCombineThem() {
    let repository = Repository::new_in_memory().unwrap();
    repository
        .insert_all(vec![
            record("200", "Nithya", "329/1", "a.txt"),
            record("201", "Nithya", "412/3", "a.txt"),
            record("202", "Kannan", "329/1", "b.txt"),
        ])
        .await
        .unwrap();

    let filters = SearchFilters {
        buyer_name: Some("nith".to_string()),
        survey_number: Some("329".to_string()),
        ..Default::default()
    };
    let found = repository.query(&filters).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].record.document_number.as_deref(), Some("200"));
}

#[tokio::test]
async fn test_query_withNoMatch_shouldReturnEmpty() {
    let repository = Repository::new_in_memory().unwrap();
    repository.insert(&record("200", "Nithya", "329/1", "a.txt")).await.unwrap();

    let filters = SearchFilters {
        document_number: Some("999".to_string()),
        ..Default::default()
    };

    assert!(repository.query(&filters).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_query_withBlankFilter_shouldBeIgnored() {
    let repository = Repository::new_in_memory().unwrap();
    repository.insert(&record("200", "Nithya", "329/1", "a.txt")).await.unwrap();

    let filters = SearchFilters {
        seller_name: Some("   ".to_string()),
        ..Default::default()
    };

    assert_eq!(repository.query(&filters).await.unwrap().len(), 1);
}

/// Records must survive reopening the database file
#[tokio::test]
async fn test_fileDatabase_shouldPersistAcrossConnections() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("ectrans.db");

    {
        let repository = Repository::new(DatabaseConnection::new(&path).unwrap());
        repository.insert(&record("200", "Nithya", "329/1", "a.txt")).await.unwrap();
    }

    let reopened = Repository::new(DatabaseConnection::new(&path).unwrap());
    let stats = reopened.connection().stats().unwrap();

    assert_eq!(reopened.count().await.unwrap(), 1);
    assert_eq!(stats.transaction_count, 1);
    assert_eq!(stats.file_count, 1);
}
