use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Init;

/// Steps of creating the payment schema.
#[derive(Copy, Clone, Debug)]
pub enum Phase { ListMigrations, CreatePaymentTables, CheckPaymentTables }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::ListMigrations => "list_migrations",
        Phase::CreatePaymentTables => "create_payment_tables",
        Phase::CheckPaymentTables => "check_payment_tables",
    }}
    fn span(&self) -> Span { match self {
        Phase::ListMigrations => info_span!("list_migrations"),
        Phase::CreatePaymentTables => info_span!("create_payment_tables"),
        Phase::CheckPaymentTables => info_span!("check_payment_tables"),
    }}
}

impl OpMarker for Init {
    const NAME: &'static str = "init";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("init") }
}
