use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

use crate::telemetry::{self, emit};
use crate::telemetry::ops::init::Phase as InitPhase;

#[derive(Args, Debug)]
pub struct InitCmd {}

#[derive(Serialize)]
struct MigrationInfo { version: i64, description: String }

#[derive(Serialize)]
struct InitResult { migrations: Vec<MigrationInfo>, tables: Vec<String> }

/// Tables the converter writes to.
pub const PAYMENT_TABLES: [&str; 2] = ["payment", "donation_payment"];

/// Creates the payment tables and checks they are visible. Applying
/// migrations is idempotent.
pub async fn run(pool: &PgPool, _args: InitCmd) -> Result<()> {
    let log = telemetry::init();
    let _g = log.root_span().entered();
    let t0 = Instant::now();

    let migrator = sqlx::migrate!();
    let migrations: Vec<MigrationInfo> = {
        let _s = log.span(&InitPhase::ListMigrations).entered();
        migrator
            .iter()
            .map(|m| MigrationInfo { version: m.version, description: m.description.to_string() })
            .collect()
    };
    for m in &migrations { log.info(format!("  migration {} {}", m.version, m.description)); }

    {
        let _s = log.span(&InitPhase::CreatePaymentTables).entered();
        migrator.run(pool).await.context("apply migrations")?;
    }

    let tables = {
        let _s = log.span(&InitPhase::CheckPaymentTables).entered();
        let mut found = Vec::with_capacity(PAYMENT_TABLES.len());
        for table in PAYMENT_TABLES {
            let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
                .bind(table)
                .fetch_one(pool)
                .await
                .with_context(|| format!("check table {table}"))?;
            if !exists {
                bail!("table {table} missing after migrations");
            }
            found.push(table.to_string());
        }
        found
    };
    log.info(format!("✅ Payment tables ready: {}", tables.join(", ")));

    if telemetry::config::json_mode() {
        log.result(&InitResult { migrations, tables }, Some(emit::meta(t0.elapsed(), None)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::ctx::PhaseSpan;

    #[test]
    fn migrations_create_every_checked_table() {
        let sql = include_str!("../migrations/0001_payments.sql");
        for table in PAYMENT_TABLES {
            assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")), "{table}");
        }
    }

    #[test]
    fn phases_are_named_after_schema_steps() {
        let names: Vec<&str> = [InitPhase::ListMigrations, InitPhase::CreatePaymentTables, InitPhase::CheckPaymentTables]
            .iter()
            .map(PhaseSpan::name)
            .collect();
        assert_eq!(names, vec!["list_migrations", "create_payment_tables", "check_payment_tables"]);
    }
}
