use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Convert;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Prepare, Convert, Report }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Prepare => "prepare",
        Phase::Convert => "convert",
        Phase::Report => "report",
    }}
    fn span(&self) -> Span { match self {
        Phase::Prepare => info_span!("prepare"),
        Phase::Convert => info_span!("convert"),
        Phase::Report => info_span!("report"),
    }}
}

impl OpMarker for Convert {
    const NAME: &'static str = "convert";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("convert") }
}
