/*!
 * Transaction records produced by the extraction pipeline.
 *
 * `RawTransaction` is what the field extractor recognizes in one block of
 * certificate text. `TranslatedTransaction` pairs it with the English values
 * the augmenter resolved for the Tamil-bearing fields.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields recognized in one registration entry, before translation.
///
/// Every field is optional; `None` means the recognizer did not find it in the
/// block. Nothing here is ever a placeholder value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub document_number: Option<String>,
    pub document_year: Option<String>,

    pub document_date: Option<String>,
    pub execution_date: Option<String>,
    pub presentation_date: Option<String>,

    pub nature_of_document: Option<String>,
    pub property_type: Option<String>,

    pub seller_name_tamil: Option<String>,
    pub buyer_name_tamil: Option<String>,

    pub house_number: Option<String>,
    pub survey_number: Option<String>,
    pub plot_number: Option<String>,
    pub property_extent: Option<String>,
    pub village: Option<String>,
    pub street: Option<String>,

    /// Whole currency units, always > 0 when present
    pub consideration_value: Option<u64>,
    pub market_value: Option<u64>,

    pub volume_number: Option<String>,
    pub page_number: Option<String>,
    pub boundary_details: Option<String>,
    pub schedule_remarks: Option<String>,
    pub document_remarks: Option<String>,
    pub previous_document_number: Option<String>,
}

impl RawTransaction {
    /// A record carrying only the identity fields
    pub fn with_identity(number: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            document_number: Some(number.into()),
            document_year: Some(year.into()),
            ..Default::default()
        }
    }

    /// Natural key `number/year`, when both parts were recognized
    pub fn document_key(&self) -> Option<String> {
        match (&self.document_number, &self.document_year) {
            (Some(number), Some(year)) => Some(format!("{}/{}", number, year)),
            _ => None,
        }
    }

    /// Source text of a Tamil-bearing field
    pub fn tamil_source(&self, field: TamilField) -> Option<&str> {
        match field {
            TamilField::SellerName => self.seller_name_tamil.as_deref(),
            TamilField::BuyerName => self.buyer_name_tamil.as_deref(),
            TamilField::Village => self.village.as_deref(),
            TamilField::BoundaryDetails => self.boundary_details.as_deref(),
            TamilField::ScheduleRemarks => self.schedule_remarks.as_deref(),
        }
    }
}

impl fmt::Display for RawTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.document_key() {
            Some(key) => write!(f, "document {}", key),
            None => write!(f, "document <unidentified>"),
        }
    }
}

/// The fields the augmenter may send to a translation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TamilField {
    SellerName,
    BuyerName,
    Village,
    BoundaryDetails,
    ScheduleRemarks,
}

impl TamilField {
    /// Party names, always attempted
    pub const NAMES: [TamilField; 2] = [TamilField::SellerName, TamilField::BuyerName];

    /// Place and remark fields, translated in place when enabled
    pub const PLACE_FIELDS: [TamilField; 3] = [
        TamilField::Village,
        TamilField::BoundaryDetails,
        TamilField::ScheduleRemarks,
    ];

    /// Short description handed to language-model providers as context
    pub fn description(&self) -> &'static str {
        match self {
            Self::SellerName => "seller name",
            Self::BuyerName => "buyer name",
            Self::Village => "village name",
            Self::BoundaryDetails => "property boundary details",
            Self::ScheduleRemarks => "property schedule remarks",
        }
    }

    /// Whether this field is a person's name
    pub fn is_name(&self) -> bool {
        matches!(self, Self::SellerName | Self::BuyerName)
    }
}

impl fmt::Display for TamilField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SellerName => "sellerName",
            Self::BuyerName => "buyerName",
            Self::Village => "village",
            Self::BoundaryDetails => "boundaryDetails",
            Self::ScheduleRemarks => "scheduleRemarks",
        };
        f.write_str(name)
    }
}

/// A raw transaction plus the English values resolved by the augmenter.
///
/// `raw` is kept untouched so the Tamil source stays available. The resolved
/// place fields start as copies of the raw ones and are replaced only when a
/// translation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedTransaction {
    #[serde(flatten)]
    pub raw: RawTransaction,
    pub seller_name: Option<String>,
    pub buyer_name: Option<String>,
    #[serde(rename = "villageResolved")]
    pub village: Option<String>,
    #[serde(rename = "boundaryDetailsResolved")]
    pub boundary_details: Option<String>,
    #[serde(rename = "scheduleRemarksResolved")]
    pub schedule_remarks: Option<String>,
}

impl TranslatedTransaction {
    /// Untranslated view: names unset, place fields passed through
    pub fn untranslated(raw: RawTransaction) -> Self {
        Self {
            seller_name: None,
            buyer_name: None,
            village: raw.village.clone(),
            boundary_details: raw.boundary_details.clone(),
            schedule_remarks: raw.schedule_remarks.clone(),
            raw,
        }
    }

    /// Resolved value of a Tamil-bearing field
    pub fn resolved(&self, field: TamilField) -> Option<&str> {
        match field {
            TamilField::SellerName => self.seller_name.as_deref(),
            TamilField::BuyerName => self.buyer_name.as_deref(),
            TamilField::Village => self.village.as_deref(),
            TamilField::BoundaryDetails => self.boundary_details.as_deref(),
            TamilField::ScheduleRemarks => self.schedule_remarks.as_deref(),
        }
    }

    pub(crate) fn set_resolved(&mut self, field: TamilField, value: Option<String>) {
        let slot = match field {
            TamilField::SellerName => &mut self.seller_name,
            TamilField::BuyerName => &mut self.buyer_name,
            TamilField::Village => &mut self.village,
            TamilField::BoundaryDetails => &mut self.boundary_details,
            TamilField::ScheduleRemarks => &mut self.schedule_remarks,
        };
        *slot = value;
    }
}
