use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::env;

mod chunked;
mod config;
mod convert;
mod identity;
mod init;
mod legacy;
mod output;
mod parent;
mod payment;
mod report;
mod sink;
mod telemetry;
mod verify;

#[derive(Parser)]
#[command(name = "donmig", about = "Migrate legacy donations into payments")]
struct Cli {
    #[arg(global = true, short, long)]
    dsn: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the payment tables
    Init(init::InitCmd),
    /// Convert legacy donations into payments (dry run unless --apply)
    Convert(convert::ConvertCmd),
    /// List donations that still have no payment
    Verify(verify::VerifyCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // logs on stderr; RUST_LOG and DONMIG_LOG_FORMAT
    telemetry::config::init_tracing();
    let dsn = cli
        .dsn
        .or_else(|| env::var("DATABASE_URL").ok())
        .context("Please provide --dsn or set DATABASE_URL in .env")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&dsn)
        .await
        .context("connect to database")?;

    match cli.command {
        Commands::Init(args) => init::run(&pool, args).await?,
        Commands::Convert(args) => convert::run(&pool, args).await?,
        Commands::Verify(args) => verify::run(&pool, args).await?,
    }

    Ok(())
}
