use anyhow::Result;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{info, warn, info_span, Span};

use super::emit;
use crate::output::types::Meta;
use crate::report::render::ReportSummary;

pub trait PhaseSpan {
    fn name(&self) -> &'static str;
    fn span(&self) -> Span;
}

pub trait OpMarker {
    const NAME: &'static str;
    type Phase: PhaseSpan;
    fn root_span() -> Span;
}

/// Logging handle typed by operation, so phases of one command cannot be
/// used with another.
pub struct LogCtx<O: OpMarker> {
    pub(crate) json: bool,
    pub(crate) _marker: PhantomData<O>,
}

impl<O: OpMarker> LogCtx<O> {
    fn op_name(&self) -> &'static str { O::NAME }

    pub fn root_span(&self) -> Span { O::root_span() }

    /// Root span plus a `start` event carrying the run parameters.
    pub fn root_span_kv<'a, T>(&self, fields: T) -> Span
    where
        T: IntoIterator<Item = (&'a str, String)>,
    {
        let span = self.root_span();
        let details = kv_to_string(fields);
        if details.is_empty() {
            info!(op = %self.op_name(), "start");
        } else {
            info!(op = %self.op_name(), details = %details, "start");
        }
        span
    }

    pub fn span(&self, ph: &O::Phase) -> Span {
        if self.json { info!(op = %self.op_name(), phase = ph.name(), "span_start"); }
        ph.span()
    }

    pub fn info(&self, msg: impl AsRef<str>) { if self.json { info!(op = %self.op_name(), "{}", msg.as_ref()); } else { info!("{}", msg.as_ref()); } }
    pub fn warn(&self, msg: impl AsRef<str>) { if self.json { warn!(op = %self.op_name(), "{}", msg.as_ref()); } else { warn!("{}", msg.as_ref()); } }

    pub fn plan<T: Serialize>(&self, plan: &T, meta: Option<Meta>) -> Result<()> { emit::print_plan(self.op_name(), plan, meta) }
    pub fn result<T: Serialize>(&self, result: &T, meta: Option<Meta>) -> Result<()> { emit::print_result(self.op_name(), result, meta) }
}

impl LogCtx<crate::telemetry::ops::convert::Convert> {
    /// Report lines; warnings for error sections so they stand out.
    pub fn report(&self, summary: &ReportSummary) {
        let _s = info_span!("report_lines").entered();
        for line in summary.lines() {
            self.info(line);
        }
        if summary.has_errors() {
            self.warn(format!("{} donations could not be converted", summary.rejected));
        }
    }

    pub fn totals(&self, donations: u64, payments: u64, rejected: u64, warnings: u64) {
        if self.json { info!(op = %self.op_name(), donations, payments, rejected, warnings, "convert_totals"); }
        else { info!("📊 Convert totals — donations={} payments={} rejected={} warnings={}", donations, payments, rejected, warnings); }
    }
}

fn kv_to_string<'a, T>(kv: T) -> String
where
    T: IntoIterator<Item = (&'a str, String)>,
{
    kv.into_iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_space_separated_pairs() {
        assert_eq!(kv_to_string([("apply", "true".to_string()), ("max", "None".to_string())]), "apply=true max=None");
        assert_eq!(kv_to_string(std::iter::empty::<(&str, String)>()), "");
    }
}
