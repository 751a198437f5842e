pub mod backup;
pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;
pub mod seed;

use crate::error::Result;
use phonenorm_core::PhoneRecord;
use rusqlite::Connection;
use std::path::Path;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    /// Drops every table and re-runs the migrations from scratch.
    pub fn reset(&self) -> Result<()> {
        migrate::reset_schema(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    /// Copies the database to `path`; refuses the live file and its sidecars.
    pub fn backup_to(&self, path: &Path) -> Result<backup::BackupSnapshot> {
        backup::snapshot(&self.conn, path)
    }

    pub fn seed<S: AsRef<str>>(&self, values: &[S]) -> Result<Vec<PhoneRecord>> {
        seed::seed(&self.conn, values)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn phones(&self) -> repo::PhonesRepo<'_> {
        repo::PhonesRepo::new(&self.conn)
    }
}
