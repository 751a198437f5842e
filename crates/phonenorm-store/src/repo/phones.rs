use crate::error::{Result, StoreError};
use phonenorm_core::{PhoneId, PhoneRecord, RecordStore};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct PhonesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> PhonesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, value: &str) -> Result<PhoneRecord> {
        self.conn
            .execute("INSERT INTO phone_numbers (value) VALUES (?1);", [value])?;
        let id = PhoneId(self.conn.last_insert_rowid());
        Ok(PhoneRecord::new(id, value))
    }

    pub fn get(&self, id: PhoneId) -> Result<Option<PhoneRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, value FROM phone_numbers WHERE id = ?1;",
                [id.as_i64()],
                phone_from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn list_all(&self) -> Result<Vec<PhoneRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, value FROM phone_numbers ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(phone_from_row(row)?);
        }
        Ok(records)
    }

    /// Lowest id holding exactly `value`, if any.
    pub fn find_by_value(&self, value: &str) -> Result<Option<PhoneRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, value FROM phone_numbers
                 WHERE value = ?1
                 ORDER BY id ASC
                 LIMIT 1;",
                [value],
                phone_from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn update_value(&self, id: PhoneId, value: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE phone_numbers SET value = ?2 WHERE id = ?1;",
            params![id.as_i64(), value],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("phone number {}", id)));
        }
        Ok(())
    }

    pub fn delete_by_id(&self, id: PhoneId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM phone_numbers WHERE id = ?1;", [id.as_i64()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("phone number {}", id)));
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(1) FROM phone_numbers;", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl RecordStore for PhonesRepo<'_> {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<PhoneRecord>> {
        PhonesRepo::list_all(self)
    }

    fn find_by_value(&self, value: &str) -> Result<Option<PhoneRecord>> {
        PhonesRepo::find_by_value(self, value)
    }

    fn update_value(&self, id: PhoneId, value: &str) -> Result<()> {
        PhonesRepo::update_value(self, id, value)
    }

    fn delete_by_id(&self, id: PhoneId) -> Result<()> {
        PhonesRepo::delete_by_id(self, id)
    }
}

fn phone_from_row(row: &Row<'_>) -> rusqlite::Result<PhoneRecord> {
    Ok(PhoneRecord {
        id: PhoneId(row.get(0)?),
        value: row.get(1)?,
    })
}
