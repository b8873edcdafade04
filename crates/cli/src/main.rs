use anyhow::Context;

use splitledger_infra::LedgerConfig;

fn main() -> anyhow::Result<()> {
    let config = LedgerConfig::from_env().context("invalid configuration")?;
    splitledger_observability::init_with(config.log_format);

    let path = std::env::args()
        .nth(1)
        .context("usage: splitledger <script.json>")?;
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let script = splitledger_cli::Script::from_json(&json)
        .with_context(|| format!("parsing {path}"))?;

    tracing::info!(%path, steps = script.steps.len(), "running script");
    let outcome = splitledger_cli::run(&script, &config).context("creating group")?;
    if !outcome.rejected.is_empty() {
        tracing::warn!(rejected = outcome.rejected.len(), "some steps were rejected");
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
