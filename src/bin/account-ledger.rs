use std::fs::File;

use account_ledger::{bin_utils::Service, ledger::ContractError};
use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // stdout carries the CSV output, logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;
    info!(%filename, "Replaying invocations");

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| {
            match err {
                ContractError::CommandErr(err) => {
                    eprintln!("Error at line {line}: {err}")
                }
                ContractError::LedgerErr(err) => {
                    // rejected by the ledger, not a malformed input
                    warn!(line, %err, "Invocation rejected")
                }
            }
        }),
    };
    service.run()
}
