use std::env;

use anyhow::{Context, Result};

use crate::convert::converter::DEFAULT_CHUNK_SIZE;
use crate::report::DEFAULT_SAMPLE_SIZE;

pub const DEFAULT_SOURCE_TABLE: &str = "legacy_donation";
pub const DEFAULT_WRITE_BATCH: usize = 1000;

/// Migration settings from `DONMIG_*` environment variables. Command line
/// flags override these per run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrationConfig {
    pub source_table: String,
    pub chunk_size: i64,
    pub write_batch: usize,
    pub sample_size: usize,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        MigrationConfig {
            source_table: DEFAULT_SOURCE_TABLE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            write_batch: DEFAULT_WRITE_BATCH,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl MigrationConfig {
    pub fn from_env() -> Result<Self> { Self::from_lookup(|key| env::var(key).ok()) }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = MigrationConfig::default();
        if let Some(table) = lookup("DONMIG_SOURCE_TABLE").filter(|t| !t.trim().is_empty()) {
            cfg.source_table = table.trim().to_string();
        }
        if let Some(v) = lookup("DONMIG_CHUNK_SIZE") {
            cfg.chunk_size = v.trim().parse().with_context(|| format!("DONMIG_CHUNK_SIZE={v:?}"))?;
        }
        if let Some(v) = lookup("DONMIG_WRITE_BATCH") {
            cfg.write_batch = v.trim().parse().with_context(|| format!("DONMIG_WRITE_BATCH={v:?}"))?;
        }
        if let Some(v) = lookup("DONMIG_SAMPLE_SIZE") {
            cfg.sample_size = v.trim().parse().with_context(|| format!("DONMIG_SAMPLE_SIZE={v:?}"))?;
        }
        Ok(cfg)
    }
}
