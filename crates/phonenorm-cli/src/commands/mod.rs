use anyhow::Result;
use phonenorm_config::AppConfig;
use phonenorm_store::Store;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

pub mod backup;
pub mod demo;
pub mod normalize;
pub mod phones;

pub struct Context<'a> {
    pub store: &'a Store,
    pub db_path: &'a Path,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
