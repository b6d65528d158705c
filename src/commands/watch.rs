//! Re-ingest on file changes

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::time::Duration;

use crate::{Quire, CONFIG_FILE};

/// Quiet period before a burst of events triggers a rebuild
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Watch the content directory and rebuild the registry on every change
pub async fn run(quire: &Quire) -> Result<()> {
    ingest_and_report(quire);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut debouncer = new_debouncer(DEBOUNCE, move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    debouncer
        .watcher()
        .watch(&quire.content_dir, RecursiveMode::Recursive)?;

    let config_path = quire.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching {:?}. Press Ctrl+C to stop.", quire.content_dir);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(Ok(events)) => {
                    tracing::debug!("{} paths changed", events.len());
                    if events.iter().any(|e| e.path == config_path) {
                        tracing::warn!("{} changed; restart to apply it", CONFIG_FILE);
                    }
                    ingest_and_report(quire);
                }
                Some(Err(e)) => tracing::error!("Watch error: {}", e),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopped watching");
                break;
            }
        }
    }

    Ok(())
}

/// Each pass builds a fresh registry; nothing carries over between passes
fn ingest_and_report(quire: &Quire) {
    match quire.ingest() {
        Ok(ingestion) => {
            for failure in &ingestion.failures {
                tracing::warn!("{}", failure);
            }
            tracing::info!(
                "{} documents, {} failures",
                ingestion.registry.len(),
                ingestion.failures.len()
            );
        }
        Err(e) => tracing::error!("Ingestion failed: {:#}", e),
    }
}
