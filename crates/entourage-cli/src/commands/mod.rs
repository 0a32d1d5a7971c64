use anyhow::{Context as _, Result};
use entourage_config::AppConfig;
use entourage_store::{paths, Store};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

pub mod entries;
pub mod serve;
pub mod submit;
pub mod theme;

pub struct Context<'a> {
    pub db_path: Option<PathBuf>,
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn db_path(&self) -> Result<PathBuf> {
        let path =
            paths::resolve_db_path(self.db_path.clone()).with_context(|| "resolve database path")?;
        debug!(path = %path.display(), "database path resolved");
        Ok(path)
    }

    pub fn open_store(&self) -> Result<Store> {
        let db_path = self.db_path()?;
        let store = Store::open(&db_path)
            .with_context(|| format!("open database {}", db_path.display()))?;
        store.migrate().with_context(|| "run migrations")?;
        Ok(store)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
