use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use sqlx::PgPool;

use crate::config::MigrationConfig;
use crate::convert::db::PgDonationSource;
use crate::convert::DonationSource;
use crate::telemetry::{self, emit};
use crate::telemetry::ops::verify::Phase as VerifyPhase;

#[derive(Args, Debug)]
pub struct VerifyCmd {
    /// Only check donations with an id above this one
    #[arg(long, default_value_t = 0)] id_offset: i64,
    /// Maximum number of unconverted ids to list
    #[arg(long, default_value_t = 100)] limit: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct VerifyReport {
    pub id_offset: i64,
    pub checked_up_to: i64,
    pub unconverted: Vec<i64>,
}

/// Donations in `(id_offset, max id]` without a payment, manually booked
/// ones excluded.
pub async fn find_unconverted<S: DonationSource>(source: &S, id_offset: i64, limit: i64) -> Result<VerifyReport> {
    let checked_up_to = source.max_donation_id().await.context("resolve highest donation id")?;
    let unconverted = source.unconverted_donation_ids(id_offset, checked_up_to, limit).await?;
    Ok(VerifyReport { id_offset, checked_up_to, unconverted })
}

pub async fn run(pool: &PgPool, args: VerifyCmd) -> Result<()> {
    let cfg = MigrationConfig::from_env()?;
    let log = telemetry::verify();
    let _g = log.root_span_kv([
        ("source", cfg.source_table.clone()),
        ("id_offset", args.id_offset.to_string()),
        ("limit", args.limit.to_string()),
    ]).entered();
    let t0 = Instant::now();

    let source = PgDonationSource::for_table(pool.clone(), &cfg.source_table)?;
    let report = {
        let _s = log.span(&VerifyPhase::Scan).entered();
        find_unconverted(&source, args.id_offset, args.limit).await?
    };

    if report.unconverted.is_empty() {
        log.info(format!("✅ All donations in ({}, {}] have a payment", report.id_offset, report.checked_up_to));
    } else {
        log.warn(format!("⚠️  Donations without payment (first {}):", args.limit));
        for id in &report.unconverted { log.warn(format!("  donation_id={}", id)); }
    }
    if telemetry::config::json_mode() {
        log.result(&report, Some(emit::meta(t0.elapsed(), None)))?;
    }
    if !report.unconverted.is_empty() {
        bail!("{} or more donations were not converted", report.unconverted.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::converter::tests::MemorySource;
    use crate::legacy::row::tests::row_with_id;

    #[tokio::test]
    async fn lists_donations_missing_a_payment() {
        let mut mbk = row_with_id(4);
        mbk.payment_type = "MBK".into();
        let mut source = MemorySource::new(vec![row_with_id(1), row_with_id(2), row_with_id(3), mbk, row_with_id(5)]);
        source.converted = vec![1, 3];

        let report = find_unconverted(&source, 0, 10).await.unwrap();
        assert_eq!(report, VerifyReport { id_offset: 0, checked_up_to: 5, unconverted: vec![2, 5] });

        let report = find_unconverted(&source, 2, 10).await.unwrap();
        assert_eq!(report.unconverted, vec![5]);
    }

    #[tokio::test]
    async fn empty_source_is_fully_converted() {
        let report = find_unconverted(&MemorySource::new(vec![]), 0, 10).await.unwrap();
        assert_eq!(report.checked_up_to, 0);
        assert!(report.unconverted.is_empty());
    }
}
