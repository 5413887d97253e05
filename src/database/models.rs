/*!
 * Database entity models and query DTOs.
 */

use serde::{Deserialize, Serialize};

use crate::assembler::NewTransactionRecord;

/// A stored transaction row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Database-assigned identifier
    pub id: i64,
    #[serde(flatten)]
    pub record: NewTransactionRecord,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
}

/// Substring filters for listing stored transactions
///
/// Every populated filter must match; an empty filter set matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub buyer_name: Option<String>,
    pub seller_name: Option<String>,
    pub house_number: Option<String>,
    pub survey_number: Option<String>,
    pub document_number: Option<String>,
}

impl SearchFilters {
    /// Populated filters as `(column, needle)` pairs, blank values ignored
    pub fn active(&self) -> Vec<(&'static str, String)> {
        [
            ("buyer_name", &self.buyer_name),
            ("seller_name", &self.seller_name),
            ("house_number", &self.house_number),
            ("survey_number", &self.survey_number),
            ("document_number", &self.document_number),
        ]
        .into_iter()
        .filter_map(|(column, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (column, v.to_string()))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}
