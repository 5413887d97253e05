/*!
 * Record assembly.
 *
 * Reshapes a translated transaction into the record handed to storage:
 * resolved English values take the place of the raw ones, amounts become
 * their textual form and the source file name is attached. No extraction or
 * translation happens here.
 */

use serde::{Deserialize, Serialize};

use crate::transaction::TranslatedTransaction;

/// A record ready to be inserted into storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionRecord {
    pub document_number: Option<String>,
    pub document_year: Option<String>,
    pub document_date: Option<String>,
    pub execution_date: Option<String>,
    pub presentation_date: Option<String>,
    pub nature_of_document: Option<String>,

    pub buyer_name: Option<String>,
    pub buyer_name_tamil: Option<String>,
    pub seller_name: Option<String>,
    pub seller_name_tamil: Option<String>,

    pub house_number: Option<String>,
    pub survey_number: Option<String>,
    pub plot_number: Option<String>,
    pub property_type: Option<String>,
    pub property_extent: Option<String>,
    pub village: Option<String>,
    pub street: Option<String>,

    pub consideration_value: Option<String>,
    pub market_value: Option<String>,

    pub volume_number: Option<String>,
    pub page_number: Option<String>,
    pub boundary_details: Option<String>,
    pub schedule_remarks: Option<String>,
    pub document_remarks: Option<String>,
    pub previous_document_number: Option<String>,

    /// Provenance: the uploaded file this record came from
    pub pdf_file_name: String,
}

/// Textual form of an amount in whole currency units
pub fn format_amount(value: u64) -> String {
    value.to_string()
}

/// Build the storage record for one translated transaction
pub fn assemble(translated: TranslatedTransaction, file_name: &str) -> NewTransactionRecord {
    let TranslatedTransaction {
        raw,
        seller_name,
        buyer_name,
        village,
        boundary_details,
        schedule_remarks,
    } = translated;

    NewTransactionRecord {
        document_number: raw.document_number,
        document_year: raw.document_year,
        document_date: raw.document_date,
        execution_date: raw.execution_date,
        presentation_date: raw.presentation_date,
        nature_of_document: raw.nature_of_document,
        buyer_name,
        buyer_name_tamil: raw.buyer_name_tamil,
        seller_name,
        seller_name_tamil: raw.seller_name_tamil,
        house_number: raw.house_number,
        survey_number: raw.survey_number,
        plot_number: raw.plot_number,
        property_type: raw.property_type,
        property_extent: raw.property_extent,
        village,
        street: raw.street,
        consideration_value: raw.consideration_value.map(format_amount),
        market_value: raw.market_value.map(format_amount),
        volume_number: raw.volume_number,
        page_number: raw.page_number,
        boundary_details,
        schedule_remarks,
        document_remarks: raw.document_remarks,
        previous_document_number: raw.previous_document_number,
        pdf_file_name: file_name.to_string(),
    }
}

/// Build storage records for a whole upload, keeping order
pub fn assemble_all(records: Vec<TranslatedTransaction>, file_name: &str) -> Vec<NewTransactionRecord> {
    records.into_iter().map(|record| assemble(record, file_name)).collect()
}
