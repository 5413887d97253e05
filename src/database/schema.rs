/*!
 * Database schema definitions and migrations.
 *
 * One `transactions` table holds every assembled record, plus the usual
 * `schema_version` bookkeeping row.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Columns written on insert, in statement order
pub const TRANSACTION_COLUMNS: [&str; 26] = [
    "document_number",
    "document_year",
    "document_date",
    "execution_date",
    "presentation_date",
    "nature_of_document",
    "buyer_name",
    "buyer_name_tamil",
    "seller_name",
    "seller_name_tamil",
    "house_number",
    "survey_number",
    "plot_number",
    "property_type",
    "property_extent",
    "village",
    "street",
    "consideration_value",
    "market_value",
    "volume_number",
    "page_number",
    "boundary_details",
    "schedule_remarks",
    "document_remarks",
    "previous_document_number",
    "pdf_file_name",
];

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating database schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL keeps readers unblocked while an upload is being written
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_number TEXT,
            document_year TEXT,
            document_date TEXT,
            execution_date TEXT,
            presentation_date TEXT,
            nature_of_document TEXT,
            buyer_name TEXT,
            buyer_name_tamil TEXT,
            seller_name TEXT,
            seller_name_tamil TEXT,
            house_number TEXT,
            survey_number TEXT,
            plot_number TEXT,
            property_type TEXT,
            property_extent TEXT,
            village TEXT,
            street TEXT,
            consideration_value TEXT,
            market_value TEXT,
            volume_number TEXT,
            page_number TEXT,
            boundary_details TEXT,
            schedule_remarks TEXT,
            document_remarks TEXT,
            previous_document_number TEXT,
            pdf_file_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_document ON transactions(document_number, document_year);
        CREATE INDEX IF NOT EXISTS idx_transactions_survey ON transactions(survey_number);
        CREATE INDEX IF NOT EXISTS idx_transactions_file ON transactions(pdf_file_name);
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<()> {
    let current = from_version;

    if current < SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unknown schema version: {}. Cannot migrate.",
            current
        ));
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}
