//! balance-worker binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and runs the three pipeline workers until SIGINT.

use std::path::PathBuf;

use anyhow::Context as _;
use balance_gateway::{ChatCategorizer, HttpMailbox, HttpNotifier};
use balance_store_sqlite::SqliteStore;
use balance_worker::{
  config::WorkerConfig,
  debounce::{ActivityDebouncer, activity_channel},
  enrich::EnrichmentWorker,
  ingress::IngressWorker,
};
use clap::Parser;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Balance expense pipeline worker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration. Validation failures here are the only fatal error
  // class; once the workers are running, nothing kills the process but
  // SIGINT.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BALANCE").separator("__"))
    .build()
    .context("failed to read config file")?;

  let cfg: WorkerConfig = settings
    .try_deserialize()
    .context("failed to deserialise WorkerConfig")?;
  cfg.validate().context("invalid configuration")?;

  // Open SQLite store.
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  // Collaborator clients.
  let mailbox = HttpMailbox::new(&cfg.mailbox.base_url, &cfg.mailbox.token);
  let oracle = ChatCategorizer::new(
    &cfg.oracle.base_url,
    &cfg.oracle.api_key,
    &cfg.oracle.model,
  );
  let notifier = HttpNotifier::new(
    &cfg.notify.base_url,
    &cfg.notify.token,
    &cfg.notify.from,
  );

  // Wiring: ingress → handoff channel → enrichment, ingress → activity
  // signals → debouncer.
  let (handoff_tx, handoff_rx) = mpsc::unbounded_channel();
  let (activity, activity_rx) = activity_channel();

  let ingress = IngressWorker::new(
    mailbox,
    store.clone(),
    handoff_tx,
    activity,
    cfg.poll_interval(),
    cfg.lookback(),
    cfg.dedup_ttl(),
  );
  let enrichment = EnrichmentWorker::new(handoff_rx, oracle, store.clone());
  let debouncer = ActivityDebouncer::new(
    activity_rx,
    cfg.quiet_period(),
    store,
    notifier,
    cfg.notify.recipients.clone(),
    cfg.spend_limit,
  );

  let cancel = CancellationToken::new();
  {
    let cancel = cancel.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
        cancel.cancel();
      }
    });
  }

  let ingress_task = tokio::spawn(ingress.run(cancel.clone()));
  let enrichment_task = tokio::spawn(enrichment.run(cancel.clone()));
  let debounce_task = tokio::spawn(debouncer.run(cancel.clone()));

  ingress_task.await.context("ingress task panicked")?;
  enrichment_task.await.context("enrichment task panicked")?;
  debounce_task.await.context("debounce task panicked")?;

  tracing::info!("all workers stopped");
  Ok(())
}
