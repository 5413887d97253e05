/*!
 * Tests for per-block field recognition
 */

use ectrans::RawTransaction;
use ectrans::extraction::segmenter::{Segmenter, WholeBlockSegmenter};
use ectrans::extraction::{FieldExtractor, KnownVillage, PartyResolverKind};
use crate::common::SAMPLE_CERTIFICATE;

fn sample_records(extractor: &FieldExtractor) -> Vec<RawTransaction> {
    WholeBlockSegmenter::new(80)
        .segment(SAMPLE_CERTIFICATE)
        .iter()
        .filter_map(|block| extractor.extract_block(block))
        .collect()
}

#[test]
fn test_extract_withSampleEntry_shouldFillRecognizedFields() {
    let records = sample_records(&FieldExtractor::default());
    let first = &records[0];

    assert_eq!(first.document_number.as_deref(), Some("200"));
    assert_eq!(first.document_year.as_deref(), Some("2013"));
    assert_eq!(first.document_date.as_deref(), Some("2013-02-05"));
    assert_eq!(first.execution_date.as_deref(), Some("2013-02-06"));
    assert_eq!(first.presentation_date, None);
    assert_eq!(first.nature_of_document.as_deref(), Some("Conveyance"));
    assert_eq!(first.property_type.as_deref(), Some("House Site"));
    assert_eq!(first.seller_name_tamil.as_deref(), Some("முருகன்"));
    assert_eq!(first.buyer_name_tamil.as_deref(), Some("நித்யா"));
    assert_eq!(first.survey_number.as_deref(), Some("329/1"));
    assert_eq!(first.plot_number.as_deref(), Some("12"));
    assert_eq!(first.property_extent.as_deref(), Some("1200 Sq.Ft"));
    assert_eq!(first.village.as_deref(), Some("Thiruvennainallur"));
    assert_eq!(first.consideration_value, Some(314068));
    assert_eq!(first.market_value, Some(400000));
    assert_eq!(first.volume_number.as_deref(), Some("1592"));
    assert_eq!(first.page_number.as_deref(), Some("45"));
    assert_eq!(first.boundary_details.as_deref(), Some("Boundaries: North - Panchayat road"));
    assert_eq!(first.house_number, None);
    assert_eq!(first.street, None);
}

#[test]
fn test_extract_withSecondEntry_shouldKeepMissingFieldsAbsent() {
    let records = sample_records(&FieldExtractor::default());
    let second = &records[1];

    assert_eq!(second.document_key().as_deref(), Some("201/2013"));
    assert_eq!(second.nature_of_document.as_deref(), Some("Mortgage"));
    assert_eq!(second.property_extent.as_deref(), Some("2 Cents"));
    assert_eq!(second.consideration_value, Some(150000));
    assert_eq!(second.market_value, None);
    assert_eq!(second.village, None);
    assert_eq!(second.property_type, None);
}

#[test]
fn test_extract_withConsiderationLabel_shouldParseGroupedAmount() {
    let record = FieldExtractor::default()
        .extract("200/2013 Conveyance\nConsideration Value as per deed ரூ. 3,14,068/- paid")
        .unwrap();
    assert_eq!(record.consideration_value, Some(314068));
}

#[test]
fn test_extract_withZeroAmount_shouldLeaveValueAbsent() {
    let record = FieldExtractor::default().extract("200/2013 Consideration Value: ரூ. 0/-").unwrap();
    assert_eq!(record.consideration_value, None);
}

#[test]
fn test_extract_withLakhs_shouldScaleAmount() {
    let record = FieldExtractor::default().extract("200/2013 sold for 3.5 Lakhs").unwrap();
    assert_eq!(record.consideration_value, Some(350000));
}

#[test]
fn test_extract_withCurrencyMarkedLakhs_shouldScaleAmount() {
    let record = FieldExtractor::default().extract("200/2013 Consideration Value: Rs. 3.14 Lakhs").unwrap();
    assert_eq!(record.consideration_value, Some(314000));
    assert_eq!(record.market_value, None);
}

#[test]
fn test_extract_withValueHeaderRow_shouldReadBothColumns() {
    let record = FieldExtractor::default()
        .extract("200/2013 Conveyance\nConsideration Value   Market Value\nரூ. 3,14,068/-   ரூ. 4,00,000/-")
        .unwrap();
    assert_eq!(record.consideration_value, Some(314068));
    assert_eq!(record.market_value, Some(400000));
}

#[test]
fn test_extract_withoutReference_shouldDropBlock() {
    assert!(FieldExtractor::default().extract("Conveyance House Site முருகன்").is_none());
}

#[test]
fn test_extract_calledTwice_shouldBeIdempotent() {
    let extractor = FieldExtractor::default();
    assert_eq!(sample_records(&extractor), sample_records(&extractor));
}

#[test]
fn test_extract_withDuplicateReferences_shouldExtractBothBlocks() {
    let text = format!(
        "200/2013 Conveyance முருகன் நித்யா {}\n200/2013 Mortgage கண்ணன் நித்யா {}",
        "-".repeat(80),
        "-".repeat(80)
    );
    let extractor = FieldExtractor::default();
    let records: Vec<RawTransaction> = WholeBlockSegmenter::new(80)
        .segment(&text)
        .iter()
        .filter_map(|block| extractor.extract_block(block))
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].document_key(), records[1].document_key());
    assert_ne!(records[0].nature_of_document, records[1].nature_of_document);
}

#[test]
fn test_extract_withLabelProximityResolver_shouldFollowLabels() {
    let block = "200/2013 Conveyance\nClaimant: நித்யா\nExecutant: முருகன்";
    let positional = FieldExtractor::new(PartyResolverKind::Positional, Vec::new())
        .extract(block)
        .unwrap();
    let labeled = FieldExtractor::new(PartyResolverKind::LabelProximity, Vec::new())
        .extract(block)
        .unwrap();

    assert_eq!(positional.seller_name_tamil.as_deref(), Some("நித்யா"));
    assert_eq!(labeled.seller_name_tamil.as_deref(), Some("முருகன்"));
    assert_eq!(labeled.buyer_name_tamil.as_deref(), Some("நித்யா"));
}

#[test]
fn test_extract_withConfiguredVillage_shouldMapLabelToEnglishName() {
    let villages = vec![KnownVillage::new("Arasur", &["அரசூர்"])];
    let record = FieldExtractor::new(PartyResolverKind::Positional, villages)
        .extract("200/2013 Village: அரசூர்")
        .unwrap();
    assert_eq!(record.village.as_deref(), Some("Arasur"));
}
