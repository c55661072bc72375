use std::{env, str::FromStr, sync::Arc};

use anyhow::{bail, Context};

use crate::{
    database::build_pool,
    store::{DbStore, MemoryStore, Store},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" => Ok(StorageKind::Memory),
            other => bail!("Unknown storage '{}', expected 'sqlite' or 'memory'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub storage: StorageKind,
    pub database_url: String,
    pub db_pool_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            storage: StorageKind::Sqlite,
            database_url: "booking.db".to_string(),
            db_pool_size: 8,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> anyhow::Result<Self> {
        let mut settings = Settings::default();
        if let Some(bind_address) = lookup("BIND_ADDRESS") {
            settings.bind_address = bind_address;
        }
        if let Some(storage) = lookup("STORAGE") {
            settings.storage = storage.parse()?;
        }
        if let Some(database_url) = lookup("DATABASE_URL") {
            settings.database_url = database_url;
        }
        if let Some(size) = lookup("DB_POOL_SIZE") {
            settings.db_pool_size = size
                .parse()
                .with_context(|| format!("Invalid DB_POOL_SIZE '{}'", size))?;
            if settings.db_pool_size == 0 {
                bail!("DB_POOL_SIZE must be positive");
            }
        }
        Ok(settings)
    }
}

/// Opens the store the settings ask for, running migrations for SQLite.
pub fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn Store>> {
    Ok(match settings.storage {
        StorageKind::Sqlite => {
            let pool = build_pool(&settings.database_url, settings.db_pool_size)?;
            Arc::new(DbStore::new(pool))
        }
        StorageKind::Memory => Arc::new(MemoryStore::new()),
    })
}
