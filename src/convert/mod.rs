pub mod builders;
pub mod categories;
pub mod converter;
pub mod db;
pub mod error;
pub mod heuristics;

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use sqlx::PgPool;

use crate::config::MigrationConfig;
use crate::identity::SequentialIdGenerator;
use crate::parent::RepositoryPaypalParentFinder;
use crate::report::render::ReportSummary;
use crate::sink::{BatchingPaymentWriter, NullPaymentWriter, PaymentWriter};
use crate::telemetry::{self, emit};
use crate::telemetry::ops::convert::Phase as ConvertPhase;

pub use converter::{ConversionLimit, DonationSource, DonationToPaymentConverter};
pub use error::ConversionError;

use self::db::{PgDonationSource, PgPaymentStore};

#[derive(Args, Debug)]
pub struct ConvertCmd {
    /// Convert donations with an id above this one
    #[arg(long, default_value_t = 0)] id_offset: i64,
    /// Convert at most the ids `id_offset + 1 ..= id_offset + max`
    #[arg(long)] max: Option<i64>,
    #[arg(long)] chunk_size: Option<i64>, // rows per source query (DONMIG_CHUNK_SIZE)
    #[arg(long)] write_batch: Option<usize>, // payments per insert transaction (DONMIG_WRITE_BATCH)
    #[arg(long)] sample_rows: Option<usize>, // sample rows kept per report category (DONMIG_SAMPLE_SIZE)
    #[arg(long, default_value_t = false)] apply: bool, // default is a dry run; use --apply to write payments
}

pub async fn run(pool: &PgPool, args: ConvertCmd) -> Result<()> {
    let cfg = MigrationConfig::from_env()?;
    let chunk_size = args.chunk_size.unwrap_or(cfg.chunk_size);
    let write_batch = args.write_batch.unwrap_or(cfg.write_batch);
    let sample_rows = args.sample_rows.unwrap_or(cfg.sample_size);

    let log = telemetry::convert();
    let _g = log.root_span_kv([
        ("source", cfg.source_table.clone()),
        ("id_offset", args.id_offset.to_string()),
        ("max", format!("{:?}", args.max)),
        ("chunk_size", chunk_size.to_string()),
        ("write_batch", write_batch.to_string()),
        ("sample_rows", sample_rows.to_string()),
        ("apply", args.apply.to_string()),
    ]).entered();
    let t0 = Instant::now();

    let _s = log.span(&ConvertPhase::Prepare).entered();
    let source = PgDonationSource::for_table(pool.clone(), &cfg.source_table)?;
    let store = PgPaymentStore::new(pool.clone());
    let next_id = store
        .next_payment_id()
        .await
        .context("read highest payment id (did you run `donmig init`?)")?;
    let writer: Box<dyn PaymentWriter> = if args.apply {
        Box::new(BatchingPaymentWriter::new(store.clone(), write_batch))
    } else {
        Box::new(NullPaymentWriter::default())
    };
    log.info(format!("📝 Convert — source={} first_payment_id={} apply={}", cfg.source_table, next_id, args.apply));
    drop(_s);

    let mut converter = DonationToPaymentConverter::new(
        source,
        Box::new(SequentialIdGenerator::starting_at(next_id)),
        Box::new(RepositoryPaypalParentFinder::new(store.clone(), store)),
        writer,
    )
    .with_chunk_size(chunk_size)
    .with_sample_size(sample_rows);

    let _s = log.span(&ConvertPhase::Convert).entered();
    let result = converter.convert_donations(args.id_offset, ConversionLimit::from_option(args.max)).await?;
    drop(_s);

    let _s = log.span(&ConvertPhase::Report).entered();
    let summary = ReportSummary::new(&result, converter.payments_written());
    log.report(&summary);
    let warnings = result.warnings().values().map(|o| o.item_count()).sum();
    log.totals(summary.donations, summary.payments, summary.rejected, warnings);
    if !args.apply { log.info("   Use --apply to write payments."); }
    if telemetry::config::json_mode() {
        let meta = Some(emit::meta(t0.elapsed(), None));
        if args.apply { log.result(&summary, meta)?; } else { log.plan(&summary, meta)?; }
    }
    drop(_s);

    if summary.has_errors() {
        bail!("{} of {} donations could not be converted", summary.rejected, summary.donations);
    }
    Ok(())
}
