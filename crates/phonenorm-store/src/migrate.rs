use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::debug;

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_init.sql",
    include_str!("../migrations/001_init.sql"),
)];

const SCHEMA_TABLE: &str = "phonenorm_schema";

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    ensure_schema_table(&tx)?;
    let current = current_version(&tx)?;

    if current > MIGRATIONS.len() as i64 {
        return Err(StoreError::Migration(format!(
            "db version {} newer than available migrations {}",
            current,
            MIGRATIONS.len()
        )));
    }

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate() {
        let version = (index + 1) as i64;
        if current >= version {
            continue;
        }
        debug!(migration = *name, version, "applying migration");
        tx.execute_batch(sql)?;
        set_version(&tx, version)?;
    }

    tx.commit()?;
    Ok(())
}

pub fn reset_schema(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let tables = user_tables(&tx)?;
    for table in &tables {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\";", table))?;
    }
    tx.commit()?;
    debug!(dropped = tables.len(), "schema dropped");
    run_migrations(conn)
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    let tables: i64 = conn.query_row(
        "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
        [SCHEMA_TABLE],
        |row| row.get(0),
    )?;
    if tables == 0 {
        return Ok(0);
    }
    let version: Option<i64> = conn
        .query_row(
            &format!("SELECT version FROM {} LIMIT 1;", SCHEMA_TABLE),
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn user_tables(tx: &Transaction<'_>) -> Result<Vec<String>> {
    let mut stmt = tx.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name;",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = Vec::new();
    while let Some(row) = rows.next()? {
        tables.push(row.get(0)?);
    }
    Ok(tables)
}

fn ensure_schema_table(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (version INTEGER NOT NULL);",
        SCHEMA_TABLE
    ))?;

    let existing: Option<i64> = tx
        .query_row(
            &format!("SELECT version FROM {} LIMIT 1;", SCHEMA_TABLE),
            [],
            |row| row.get(0),
        )
        .optional()?;

    if existing.is_none() {
        tx.execute(
            &format!("INSERT INTO {} (version) VALUES (0);", SCHEMA_TABLE),
            [],
        )?;
    }

    Ok(())
}

fn current_version(tx: &Transaction<'_>) -> Result<i64> {
    let version: i64 = tx.query_row(
        &format!("SELECT version FROM {} LIMIT 1;", SCHEMA_TABLE),
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_version(tx: &Transaction<'_>, version: i64) -> Result<()> {
    let updated = tx.execute(
        &format!("UPDATE {} SET version = ?1;", SCHEMA_TABLE),
        [version],
    )?;
    if updated != 1 {
        return Err(StoreError::Migration(format!(
            "expected single schema row, updated {}",
            updated
        )));
    }
    Ok(())
}
