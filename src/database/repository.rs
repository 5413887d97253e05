/*!
 * Repository layer for stored transactions.
 *
 * High-level async API over the `transactions` table, keeping SQL out of
 * the pipeline and controller.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use super::connection::DatabaseConnection;
use super::models::{SearchFilters, TransactionRecord};
use super::schema::TRANSACTION_COLUMNS;
use crate::assembler::NewTransactionRecord;

const SELECT_COLUMNS: &str = "id, document_number, document_year, document_date, execution_date, \
     presentation_date, nature_of_document, buyer_name, buyer_name_tamil, seller_name, \
     seller_name_tamil, house_number, survey_number, plot_number, property_type, property_extent, \
     village, street, consideration_value, market_value, volume_number, page_number, \
     boundary_details, schedule_remarks, document_remarks, previous_document_number, \
     pdf_file_name, created_at, updated_at";

/// Repository for transaction storage
#[derive(Debug, Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_default()?))
    }

    /// Create a repository with an in-memory database
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_in_memory()?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert one record, returning its id
    pub async fn insert(&self, record: &NewTransactionRecord) -> Result<i64> {
        let record = record.clone();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| Self::insert_sync(conn, &record, &now))
            .await
    }

    /// Insert all records of an upload atomically, returning their ids in order
    pub async fn insert_all(&self, records: Vec<NewTransactionRecord>) -> Result<Vec<i64>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let now = chrono::Utc::now().to_rfc3339();

        let ids = self
            .db
            .transaction_async(move |tx| {
                records
                    .iter()
                    .map(|record| Self::insert_sync(tx, record, &now))
                    .collect::<Result<Vec<_>>>()
            })
            .await?;

        debug!("Stored {} transaction records", ids.len());
        Ok(ids)
    }

    fn insert_sync(conn: &Connection, record: &NewTransactionRecord, now: &str) -> Result<i64> {
        let placeholders = (1..=TRANSACTION_COLUMNS.len() + 2)
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO transactions ({}, created_at, updated_at) VALUES ({})",
            TRANSACTION_COLUMNS.join(", "),
            placeholders
        );

        conn.execute(
            &sql,
            params![
                record.document_number,
                record.document_year,
                record.document_date,
                record.execution_date,
                record.presentation_date,
                record.nature_of_document,
                record.buyer_name,
                record.buyer_name_tamil,
                record.seller_name,
                record.seller_name_tamil,
                record.house_number,
                record.survey_number,
                record.plot_number,
                record.property_type,
                record.property_extent,
                record.village,
                record.street,
                record.consideration_value,
                record.market_value,
                record.volume_number,
                record.page_number,
                record.boundary_details,
                record.schedule_remarks,
                record.document_remarks,
                record.previous_document_number,
                record.pdf_file_name,
                now,
                now,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List records matching every populated filter, ordered by id
    ///
    /// Matching is substring-based. SQLite's `LIKE` folds ASCII letters only,
    /// so `nith` finds `Nithya` while non-ASCII letters such as `É` and `é`
    /// must match exactly. Tamil has no letter case and is unaffected.
    pub async fn query(&self, filters: &SearchFilters) -> Result<Vec<TransactionRecord>> {
        let active = filters.active();

        self.db
            .execute_async(move |conn| {
                let mut sql = format!("SELECT {} FROM transactions", SELECT_COLUMNS);
                if !active.is_empty() {
                    let conditions = active
                        .iter()
                        .enumerate()
                        .map(|(i, (column, _))| {
                            format!("{} LIKE '%' || ?{} || '%' ESCAPE '\\'", column, i + 1)
                        })
                        .collect::<Vec<_>>()
                        .join(" AND ");
                    sql.push_str(" WHERE ");
                    sql.push_str(&conditions);
                }
                sql.push_str(" ORDER BY id");

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(
                    params_from_iter(active.iter().map(|(_, needle)| escape_like(needle))),
                    parse_transaction_row,
                )?;

                Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
            })
            .await
    }

    /// Fetch one record
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TransactionRecord>> {
        self.db
            .execute_async(move |conn| {
                let sql = format!("SELECT {} FROM transactions WHERE id = ?1", SELECT_COLUMNS);
                let record = conn.query_row(&sql, [id], parse_transaction_row).optional()?;
                Ok(record)
            })
            .await
    }

    /// Delete every stored record, returning how many were removed
    pub async fn delete_all(&self) -> Result<usize> {
        self.db
            .execute_async(|conn| Ok(conn.execute("DELETE FROM transactions", [])?))
            .await
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
            })
            .await
    }
}

/// Escape LIKE wildcards so filters match literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_transaction_row(row: &rusqlite::Row) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        record: NewTransactionRecord {
            document_number: row.get(1)?,
            document_year: row.get(2)?,
            document_date: row.get(3)?,
            execution_date: row.get(4)?,
            presentation_date: row.get(5)?,
            nature_of_document: row.get(6)?,
            buyer_name: row.get(7)?,
            buyer_name_tamil: row.get(8)?,
            seller_name: row.get(9)?,
            seller_name_tamil: row.get(10)?,
            house_number: row.get(11)?,
            survey_number: row.get(12)?,
            plot_number: row.get(13)?,
            property_type: row.get(14)?,
            property_extent: row.get(15)?,
            village: row.get(16)?,
            street: row.get(17)?,
            consideration_value: row.get(18)?,
            market_value: row.get(19)?,
            volume_number: row.get(20)?,
            page_number: row.get(21)?,
            boundary_details: row.get(22)?,
            schedule_remarks: row.get(23)?,
            document_remarks: row.get(24)?,
            previous_document_number: row.get(25)?,
            pdf_file_name: row.get(26)?,
        },
        created_at: row.get(27)?,
        updated_at: row.get(28)?,
    })
}
