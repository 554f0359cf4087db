use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Verify;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Scan }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self { Phase::Scan => "scan" } }
    fn span(&self) -> Span { match self { Phase::Scan => info_span!("scan") } }
}

impl OpMarker for Verify {
    const NAME: &'static str = "verify";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("verify") }
}
