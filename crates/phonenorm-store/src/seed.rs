use crate::error::Result;
use crate::repo::PhonesRepo;
use phonenorm_core::PhoneRecord;
use rusqlite::Connection;
use tracing::debug;

/// Mixed formatting, three of which collapse into duplicates once normalized.
pub const FIXTURE_VALUES: &[&str] = &[
    "1234567890",
    "123 456 7891",
    "(123) 456 7892",
    "(123) 456-7893",
    "123-456-7894",
    "123-456-7890",
    "1234567892",
    "(123)456-7892",
];

/// Inserts `values` in order, all or nothing.
pub fn seed<S: AsRef<str>>(conn: &Connection, values: &[S]) -> Result<Vec<PhoneRecord>> {
    let tx = conn.unchecked_transaction()?;
    let phones = PhonesRepo::new(&tx);
    let mut records = Vec::with_capacity(values.len());
    for value in values {
        records.push(phones.insert(value.as_ref())?);
    }
    tx.commit()?;
    debug!(count = records.len(), "seeded phone numbers");
    Ok(records)
}
