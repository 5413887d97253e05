/*!
 * Tests for storage record assembly
 */

use ectrans::assembler::{assemble, assemble_all, format_amount};
use ectrans::{RawTransaction, TranslatedTransaction};

#[test]
fn test_formatAmount_shouldWriteWholeUnits() {
    assert_eq!(format_amount(314068), "314068");
    assert_eq!(format_amount(1), "1");
}

#[test]
fn test_assemble_withUntranslatedRecord_shouldLeaveNamesAbsent() {
    let raw = RawTransaction {
        seller_name_tamil: Some("முருகன்".to_string()),
        survey_number: Some("329/1".to_string()),
        market_value: Some(400000),
        ..RawTransaction::with_identity("200", "2013")
    };

    let record = assemble(TranslatedTransaction::untranslated(raw), "ec.txt");

    assert_eq!(record.seller_name, None);
    assert_eq!(record.seller_name_tamil.as_deref(), Some("முருகன்"));
    assert_eq!(record.survey_number.as_deref(), Some("329/1"));
    assert_eq!(record.market_value.as_deref(), Some("400000"));
    assert_eq!(record.consideration_value, None);
    assert_eq!(record.document_number.as_deref(), Some("200"));
    assert_eq!(record.document_year.as_deref(), Some("2013"));
}

#[test]
fn test_assembleAll_shouldKeepOrderAndFileName() {
    let records = vec![
        TranslatedTransaction::untranslated(RawTransaction::with_identity("201", "2013")),
        TranslatedTransaction::untranslated(RawTransaction::with_identity("200", "2013")),
    ];

    let assembled = assemble_all(records, "upload.txt");

    let numbers: Vec<_> = assembled.iter().filter_map(|r| r.document_number.clone()).collect();
    assert_eq!(numbers, vec!["201", "200"]);
    assert!(assembled.iter().all(|r| r.pdf_file_name == "upload.txt"));
}

#[test]
fn test_newTransactionRecord_shouldSerializeCamelCase() {
    let raw = RawTransaction {
        buyer_name_tamil: Some("நித்யா".to_string()),
        ..RawTransaction::with_identity("200", "2013")
    };
    let record = assemble(TranslatedTransaction::untranslated(raw), "ec.txt");

    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["documentNumber"], "200");
    assert_eq!(json["buyerNameTamil"], "நித்யா");
    assert_eq!(json["pdfFileName"], "ec.txt");
    assert!(json["buyerName"].is_null());
}
