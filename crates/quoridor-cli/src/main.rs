//! Quoridor replay tool.
//!
//! Reads a JSON script of actions, plays it against the rule engine and
//! prints a JSON report with the outcome of every step and the final state.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod script;

use script::Script;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Script path from the first argument or the environment
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("QUORIDOR_SCRIPT").ok())
        .context("usage: quoridor-replay <script.json> (or set QUORIDOR_SCRIPT)")?;

    info!(path = %path, "Loading script...");
    let script = Script::load(&path)?;
    let report = script.run()?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
