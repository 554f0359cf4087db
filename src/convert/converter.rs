use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::chunked::{ChunkedQueryResultIterator, RangeQuery};
use crate::identity::{DonationPaymentIdCollection, IdGenerator};
use crate::legacy::{self, LegacyBlob, LegacyDonationRow};
use crate::parent::{ParentLookup, PaypalParentFinder};
use crate::payment::PaymentKind;
use crate::report::{Category, ConversionResult, DEFAULT_SAMPLE_SIZE};
use crate::sink::PaymentWriter;

use super::builders::{payment_kind, PaymentDraft};
use super::categories;
use super::error::ConversionError;

pub const DEFAULT_CHUNK_SIZE: i64 = 5000;
const PAGINATION_FIELD: &str = "id";

/// Legacy donation table as seen by the converter.
#[async_trait]
pub trait DonationSource: RangeQuery<Row = LegacyDonationRow> {
    /// Highest donation id currently stored, 0 for an empty table.
    async fn max_donation_id(&self) -> Result<i64>;

    /// Donation ids in `(after, up_to]` that have no payment mapping,
    /// ignoring manually booked rows. At most `limit` ids, ascending.
    async fn unconverted_donation_ids(&self, after: i64, up_to: i64, limit: i64) -> Result<Vec<i64>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionLimit {
    ConvertAll,
    /// Stop after the id `id_offset + n`.
    Max(i64),
}

impl ConversionLimit {
    pub fn from_option(max: Option<i64>) -> Self {
        max.map_or(ConversionLimit::ConvertAll, ConversionLimit::Max)
    }
}

/// Everything the converter needs per row besides the source.
struct RowPipeline {
    ids: Box<dyn IdGenerator>,
    parents: Box<dyn PaypalParentFinder>,
    writer: Box<dyn PaymentWriter>,
    payment_ids: DonationPaymentIdCollection,
}

/// Converts legacy donations into payments in one sequential pass.
pub struct DonationToPaymentConverter<S> {
    source: S,
    pipeline: RowPipeline,
    chunk_size: i64,
    sample_size: usize,
}

impl<S: DonationSource> DonationToPaymentConverter<S> {
    pub fn new(
        source: S,
        ids: Box<dyn IdGenerator>,
        parents: Box<dyn PaypalParentFinder>,
        writer: Box<dyn PaymentWriter>,
    ) -> Self {
        Self {
            source,
            pipeline: RowPipeline { ids, parents, writer, payment_ids: DonationPaymentIdCollection::new() },
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: i64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Donation -> payment ids minted by the last run.
    pub fn payment_ids(&self) -> &DonationPaymentIdCollection { &self.pipeline.payment_ids }

    pub fn payments_written(&self) -> u64 { self.pipeline.writer.written() }

    /// Converts every donation with id in `(id_offset, effective_max]`.
    ///
    /// For `ConvertAll` the upper bound is the highest donation id at the
    /// start of the call; donations inserted while the run is going are left
    /// for the next run. Row problems end up in the returned report; only
    /// source, id generation and write failures abort.
    pub async fn convert_donations(&mut self, id_offset: i64, limit: ConversionLimit) -> Result<ConversionResult> {
        let max_id = match limit {
            ConversionLimit::ConvertAll => self.source.max_donation_id().await.context("resolve highest donation id")?,
            ConversionLimit::Max(n) => id_offset.saturating_add(n),
        };
        tracing::info!(id_offset, max_id, chunk_size = self.chunk_size, "converting donations");

        let mut result = ConversionResult::new(self.sample_size);
        self.pipeline.payment_ids.clear();
        let mut rows = ChunkedQueryResultIterator::new(&self.source, PAGINATION_FIELD, self.chunk_size, max_id, id_offset)?;
        while let Some(row) = rows.next().await? {
            result.add_row();
            self.pipeline.convert_row(&row, &mut result).await?;
            if result.donation_count() % self.chunk_size.max(1) as u64 == 0 {
                tracing::info!(rows = result.donation_count(), last_id = row.id, "conversion progress");
            }
        }
        self.pipeline.writer.flush_remaining().await.context("flush remaining payments")?;

        tracing::info!(
            rows = result.donation_count(),
            errors = result.error_count(),
            written = self.pipeline.writer.written(),
            "conversion finished"
        );
        Ok(result)
    }
}

impl RowPipeline {
    async fn convert_row(&mut self, row: &LegacyDonationRow, result: &mut ConversionResult) -> Result<()> {
        let blob = LegacyBlob::decode(row.data.as_deref());

        if row.payment_type == legacy::TYPE_MANUALLY_BOOKED {
            result.add_warning(categories::MANUALLY_BOOKED, row);
            return Ok(());
        }
        let kind = match payment_kind(&row.payment_type) {
            Ok(kind) => kind,
            Err(e) => {
                reject(result, row, &e);
                return Ok(());
            }
        };

        let mut draft = PaymentDraft::new(row, &blob);
        let parent_payment_id = if kind == PaymentKind::PayPal {
            match self.parents.find_parent(&blob, &self.payment_ids).await? {
                ParentLookup::NoParent => None,
                ParentLookup::Found { payment_id } => Some(payment_id),
                ParentLookup::Unresolved { parent_donation_id, reason } => {
                    tracing::debug!(donation_id = row.id, parent_donation_id, %reason, "paypal parent not resolved");
                    draft.warn(categories::PAYPAL_PARENT_NOT_FOUND);
                    None
                }
                ParentLookup::NotPayPal { kind, .. } => {
                    record_warnings(result, row, draft.into_warnings());
                    reject(result, row, &ConversionError::ParentTypeMismatch(kind));
                    return Ok(());
                }
            }
        } else {
            None
        };

        let id = self.ids.new_id().with_context(|| format!("mint payment id for donation {}", row.id))?;
        let built = draft.build(kind, id, parent_payment_id);
        record_warnings(result, row, draft.into_warnings());
        match built {
            Ok(payment) => {
                self.payment_ids.add(row.id, payment.id(), payment.kind());
                self.writer
                    .handle_payment(row.id, payment)
                    .await
                    .with_context(|| format!("write payment for donation {}", row.id))?;
            }
            Err(e) => reject(result, row, &e),
        }
        Ok(())
    }
}

fn record_warnings(result: &mut ConversionResult, row: &LegacyDonationRow, warnings: Vec<Category>) {
    for w in warnings {
        tracing::debug!(donation_id = row.id, warning = %w, "repaired donation");
        result.add_warning(w, row);
    }
}

fn reject(result: &mut ConversionResult, row: &LegacyDonationRow, e: &ConversionError) {
    tracing::debug!(donation_id = row.id, error = %e, "donation not converted");
    result.add_error(e.category(), row);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::identity::tests::MemoryPayments;
    use crate::identity::{NullIdGenerator, SequentialIdGenerator};
    use crate::legacy::blob::{encode, BlobValue};
    use crate::legacy::row::tests::{date, row_with_id};
    use crate::parent::{NullPaypalParentFinder, RepositoryPaypalParentFinder};
    use crate::payment::{PayPalPayment, Payment, PaymentInterval, Euro};
    use crate::sink::batching::tests::RecordingStore;
    use crate::sink::{BatchingPaymentWriter, NullPaymentWriter};
    use indexmap::IndexMap;
    use std::sync::{Arc, Mutex};

    /// Vec-backed donation table.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        pub rows: Vec<LegacyDonationRow>,
        pub converted: Vec<i64>,
        pub windows: Mutex<Vec<(i64, i64)>>,
        pub max_queries: Mutex<u32>,
    }

    impl MemorySource {
        pub(crate) fn new(rows: Vec<LegacyDonationRow>) -> Self { Self { rows, ..Default::default() } }
    }

    #[async_trait]
    impl RangeQuery for MemorySource {
        type Row = LegacyDonationRow;

        fn is_read_only(&self) -> bool { true }

        async fn fetch_range(&self, _field: &str, after: i64, up_to: i64) -> Result<Vec<LegacyDonationRow>> {
            self.windows.lock().unwrap().push((after, up_to));
            let mut rows: Vec<_> = self.rows.iter().filter(|r| r.id > after && r.id <= up_to).cloned().collect();
            rows.sort_by_key(|r| r.id);
            Ok(rows)
        }
    }

    #[async_trait]
    impl DonationSource for MemorySource {
        async fn max_donation_id(&self) -> Result<i64> {
            *self.max_queries.lock().unwrap() += 1;
            Ok(self.rows.iter().map(|r| r.id).max().unwrap_or(0))
        }

        async fn unconverted_donation_ids(&self, after: i64, up_to: i64, limit: i64) -> Result<Vec<i64>> {
            let mut ids: Vec<i64> = self
                .rows
                .iter()
                .filter(|r| r.id > after && r.id <= up_to)
                .filter(|r| r.payment_type != legacy::TYPE_MANUALLY_BOOKED && !self.converted.contains(&r.id))
                .map(|r| r.id)
                .collect();
            ids.sort_unstable();
            ids.truncate(limit.max(0) as usize);
            Ok(ids)
        }
    }

    fn recording_converter(rows: Vec<LegacyDonationRow>) -> (DonationToPaymentConverter<MemorySource>, RecordingStore) {
        let store = RecordingStore::default();
        let converter = DonationToPaymentConverter::new(
            MemorySource::new(rows),
            Box::new(SequentialIdGenerator::starting_at(1000)),
            Box::new(NullPaypalParentFinder),
            Box::new(BatchingPaymentWriter::new(store.clone(), 2)),
        );
        (converter, store)
    }

    fn written(store: &RecordingStore) -> Vec<(i64, Payment)> {
        store.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    fn warning_count(result: &ConversionResult, category: &Category) -> u64 {
        result.warnings().get(category).map_or(0, |o| o.item_count())
    }

    fn blob(pairs: &[(&str, &str)]) -> Option<String> {
        let fields: IndexMap<String, BlobValue> =
            pairs.iter().map(|(k, v)| (k.to_string(), BlobValue::Str(v.to_string()))).collect();
        Some(encode(&fields))
    }

    #[tokio::test]
    async fn empty_source_gives_empty_report() {
        let (mut converter, store) = recording_converter(vec![]);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();
        assert_eq!(result.donation_count(), 0);
        assert!(result.errors().is_empty());
        assert!(result.warnings().is_empty());
        assert!(written(&store).is_empty());
    }

    #[tokio::test]
    async fn unknown_type_code_is_one_error_naming_the_code() {
        let mut row = row_with_id(1);
        row.payment_type = "XYZ".into();
        let (mut converter, store) = recording_converter(vec![row]);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(result.donation_count(), 1);
        assert_eq!(result.errors().len(), 1);
        let (category, obj) = result.errors().first().unwrap();
        assert!(category.as_str().contains("XYZ"));
        assert_eq!(obj.item_count(), 1);
        assert!(written(&store).is_empty());
    }

    #[tokio::test]
    async fn empty_amount_becomes_zero_with_one_warning() {
        let mut empty = row_with_id(1);
        empty.amount = Some(String::new());
        let mut null = row_with_id(2);
        null.amount = None;
        let (mut converter, store) = recording_converter(vec![empty, null]);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(warning_count(&result, &categories::EMPTY_AMOUNT), 2);
        assert_eq!(result.warnings().len(), 1);
        let payments = written(&store);
        assert_eq!(payments.len(), 2);
        assert!(payments.iter().all(|(_, p)| p.amount() == Euro::ZERO));
    }

    #[tokio::test]
    async fn paypal_in_error_period_gets_placeholder_payer() {
        let mut row = row_with_id(1);
        row.payment_type = "PPL".into();
        row.donation_date = date(2015, 10, 1);
        row.data = blob(&[("ext_payment_timestamp", "10:54:49 Oct 01, 2015 PDT")]);
        let (mut converter, store) = recording_converter(vec![row]);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert!(result.errors().is_empty());
        assert_eq!(warning_count(&result, &categories::PAYPAL_ERROR_PERIOD_PAYER_ID), 1);
        let payments = written(&store);
        let Payment::PayPal(p) = &payments[0].1 else { panic!("expected paypal") };
        assert_eq!(p.booking.as_ref().unwrap().payer_id, crate::convert::heuristics::PAYPAL_PLACEHOLDER_PAYER_ID);
    }

    #[tokio::test]
    async fn bank_transfer_reference_codes() {
        let kept = row_with_id(1);
        let mut bogus = row_with_id(2);
        bogus.transfer_code = Some("bogus".into());
        let (mut converter, store) = recording_converter(vec![kept, bogus]);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        let payments = written(&store);
        let Payment::BankTransfer(first) = &payments[0].1 else { panic!("expected bank transfer") };
        assert_eq!(first.payment_reference_code, "XW-DAR-E99-X");
        assert!(!first.anonymised);
        let Payment::BankTransfer(second) = &payments[1].1 else { panic!("expected bank transfer") };
        assert_eq!(second.payment_reference_code, "AN-ONY-MOU-S");
        assert!(second.anonymised);
        assert_eq!(warning_count(&result, &categories::LEGACY_TRANSFER_CODE), 1);
    }

    #[tokio::test]
    async fn manually_booked_rows_are_warned_and_skipped() {
        let mut a = row_with_id(1);
        a.payment_type = "MBK".into();
        let mut b = row_with_id(2);
        b.payment_type = "MBK".into();
        let (mut converter, store) = recording_converter(vec![a, b]);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(result.donation_count(), 2);
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(warning_count(&result, &categories::MANUALLY_BOOKED), 2);
        assert!(written(&store).is_empty());
        assert!(converter.payment_ids().is_empty());
    }

    #[tokio::test]
    async fn bad_rows_do_not_stop_the_run() {
        let mut bad = row_with_id(2);
        bad.amount = Some("twelve".into());
        let rows = vec![row_with_id(1), bad, row_with_id(3)];
        let (mut converter, store) = recording_converter(rows);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(result.donation_count(), 3);
        assert_eq!(result.error_count(), 1);
        let ids: Vec<i64> = written(&store).iter().map(|(d, p)| { assert!(p.id() >= 1000); *d }).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(converter.payments_written(), 2);
    }

    #[tokio::test]
    async fn mints_fresh_ids_and_records_mapping() {
        let (mut converter, store) = recording_converter((1..=5).map(row_with_id).collect());
        converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        let payments = written(&store);
        let minted: Vec<i64> = payments.iter().map(|(_, p)| p.id()).collect();
        assert_eq!(minted, vec![1000, 1001, 1002, 1003, 1004]);
        let mapping: Vec<(i64, i64)> = converter.payment_ids().iter().collect();
        assert_eq!(mapping, vec![(1, 1000), (2, 1001), (3, 1002), (4, 1003), (5, 1004)]);
    }

    #[tokio::test]
    async fn offset_and_limit_bound_the_run() {
        let (mut converter, store) = recording_converter((1..=10).map(row_with_id).collect());
        let result = converter.convert_donations(3, ConversionLimit::Max(4)).await.unwrap();

        assert_eq!(result.donation_count(), 4);
        let ids: Vec<i64> = written(&store).iter().map(|(d, _)| *d).collect();
        assert_eq!(ids, vec![4, 5, 6, 7]);
        assert_eq!(*converter.source.max_queries.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn convert_all_resolves_max_id_once_and_pages_in_chunks() {
        let (converter, _store) = recording_converter((1..=7).map(row_with_id).collect());
        let mut converter = converter.with_chunk_size(3);
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(result.donation_count(), 7);
        assert_eq!(*converter.source.max_queries.lock().unwrap(), 1);
        assert_eq!(*converter.source.windows.lock().unwrap(), vec![(0, 3), (3, 6), (6, 7)]);
    }

    #[tokio::test]
    async fn flushes_remaining_payments_once_at_the_end() {
        let (mut converter, store) = recording_converter((1..=3).map(row_with_id).collect());
        converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();
        let sizes: Vec<usize> = store.batches.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1]);
    }

    #[tokio::test]
    async fn id_generator_failure_aborts_the_run() {
        let mut converter = DonationToPaymentConverter::new(
            MemorySource::new(vec![row_with_id(1)]),
            Box::new(NullIdGenerator),
            Box::new(NullPaypalParentFinder),
            Box::new(NullPaymentWriter::default()),
        );
        assert!(converter.convert_donations(0, ConversionLimit::ConvertAll).await.is_err());
    }

    #[tokio::test]
    async fn dry_run_counts_without_writing() {
        let mut converter = DonationToPaymentConverter::new(
            MemorySource::new((1..=4).map(row_with_id).collect()),
            Box::new(SequentialIdGenerator::starting_at(1)),
            Box::new(NullPaypalParentFinder),
            Box::new(NullPaymentWriter::default()),
        );
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();
        assert_eq!(result.donation_count(), 4);
        assert_eq!(converter.payments_written(), 4);
    }

    #[tokio::test]
    async fn cancelled_transfer_is_cancelled_payment() {
        let mut row = row_with_id(1);
        row.status = legacy::STATUS_CANCELLED.into();
        let (mut converter, store) = recording_converter(vec![row]);
        converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();
        assert!(written(&store)[0].1.is_cancelled());
    }

    fn paypal_row(id: i64, parent: Option<i64>) -> LegacyDonationRow {
        let mut row = row_with_id(id);
        row.payment_type = "PPL".into();
        row.interval_months = 1;
        let mut fields = IndexMap::new();
        fields.insert("paypal_payer_id".to_string(), BlobValue::Str("PAYER".into()));
        fields.insert("ext_payment_timestamp".to_string(), BlobValue::Str("10:54:49 Dec 02, 2015 PST".into()));
        if let Some(parent) = parent {
            let mut log = IndexMap::new();
            log.insert(
                "2015-12-02 10:54:50".to_string(),
                BlobValue::Str(format!("paypal_handler: new transaction id to corresponding parent donation: {parent}")),
            );
            fields.insert("log".to_string(), BlobValue::Map(log));
        }
        row.data = Some(encode(&fields));
        row
    }

    fn repository_converter(
        rows: Vec<LegacyDonationRow>,
        store: MemoryPayments,
    ) -> (DonationToPaymentConverter<MemorySource>, RecordingStore) {
        let store = Arc::new(store);
        let recording = RecordingStore::default();
        let converter = DonationToPaymentConverter::new(
            MemorySource::new(rows),
            Box::new(SequentialIdGenerator::starting_at(500)),
            Box::new(RepositoryPaypalParentFinder::new(store.clone(), store)),
            Box::new(BatchingPaymentWriter::new(recording.clone(), 10)),
        );
        (converter, recording)
    }

    #[tokio::test]
    async fn follow_up_links_persisted_parent() {
        let mut store = MemoryPayments::default();
        store.ids.insert(1, 77);
        store.payments.insert(77, Payment::PayPal(PayPalPayment {
            id: 77,
            amount: Euro::from_cents(500),
            interval: PaymentInterval::Monthly,
            booking: None,
            parent_payment_id: None,
        }));
        let (mut converter, recording) = repository_converter(vec![paypal_row(2, Some(1))], store);
        let result = converter.convert_donations(1, ConversionLimit::ConvertAll).await.unwrap();

        assert!(result.errors().is_empty());
        assert!(result.warnings().is_empty());
        assert_eq!(written(&recording)[0].1.parent_payment_id(), Some(77));
    }

    #[tokio::test]
    async fn follow_up_links_parent_from_the_same_batch() {
        let rows = vec![paypal_row(1, None), paypal_row(2, Some(1))];
        let (mut converter, recording) = repository_converter(rows, MemoryPayments::default());
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert!(result.warnings().is_empty());
        assert!(result.errors().is_empty());
        let payments = written(&recording);
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].1.id(), 500);
        assert_eq!(payments[1].1.parent_payment_id(), Some(500));
    }

    #[tokio::test]
    async fn dry_run_links_parent_from_the_same_run() {
        let store = Arc::new(MemoryPayments::default());
        let mut converter = DonationToPaymentConverter::new(
            MemorySource::new(vec![paypal_row(1, None), paypal_row(2, Some(1))]),
            Box::new(SequentialIdGenerator::starting_at(500)),
            Box::new(RepositoryPaypalParentFinder::new(store.clone(), store)),
            Box::new(NullPaymentWriter::default()),
        );
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();
        assert_eq!(warning_count(&result, &categories::PAYPAL_PARENT_NOT_FOUND), 0);
        assert!(result.errors().is_empty());
    }

    #[tokio::test]
    async fn follow_up_of_transfer_from_the_same_run_is_an_error() {
        let rows = vec![row_with_id(1), paypal_row(2, Some(1))];
        let (mut converter, recording) = repository_converter(rows, MemoryPayments::default());
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        let (category, obj) = result.errors().first().unwrap();
        assert_eq!(category, &ConversionError::ParentTypeMismatch(PaymentKind::BankTransfer).category());
        assert_eq!(obj.item_count(), 1);
        assert_eq!(written(&recording).len(), 1);
    }

    #[tokio::test]
    async fn unresolved_parent_is_a_warning() {
        let (mut converter, recording) = repository_converter(vec![paypal_row(2, Some(1))], MemoryPayments::default());
        let result = converter.convert_donations(0, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(warning_count(&result, &categories::PAYPAL_PARENT_NOT_FOUND), 1);
        assert_eq!(written(&recording)[0].1.parent_payment_id(), None);
    }

    #[tokio::test]
    async fn non_paypal_parent_is_an_error() {
        let mut store = MemoryPayments::default();
        store.ids.insert(1, 77);
        store.payments.insert(77, Payment::BankTransfer(crate::payment::BankTransferPayment {
            id: 77,
            amount: Euro::from_cents(500),
            interval: PaymentInterval::OneTime,
            payment_reference_code: "XW-DAR-E99-X".into(),
            anonymised: false,
            cancelled: false,
        }));
        let (mut converter, recording) = repository_converter(vec![paypal_row(2, Some(1))], store);
        let result = converter.convert_donations(1, ConversionLimit::ConvertAll).await.unwrap();

        assert_eq!(result.error_count(), 1);
        let (category, _) = result.errors().first().unwrap();
        assert_eq!(category, &ConversionError::ParentTypeMismatch(PaymentKind::BankTransfer).category());
        assert!(written(&recording).is_empty());
    }

    #[tokio::test]
    async fn source_lists_unconverted_ids() {
        let mut mbk = row_with_id(3);
        mbk.payment_type = "MBK".into();
        let mut source = MemorySource::new(vec![row_with_id(1), row_with_id(2), mbk, row_with_id(4)]);
        source.converted = vec![2];
        assert_eq!(source.unconverted_donation_ids(0, 10, 10).await.unwrap(), vec![1, 4]);
        assert_eq!(source.unconverted_donation_ids(0, 10, 1).await.unwrap(), vec![1]);
    }
}
