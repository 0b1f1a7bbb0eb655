use std::time::Duration;

use color_eyre::eyre;
use tokio::time as tokio_time;

use crate::Args;
use ptg_service::{IndexRequest, PlacesService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOptions {
	pub once: bool,
	pub force: bool,
	pub poll_interval: Duration,
}
impl WorkerOptions {
	pub fn from_args(args: &Args, cfg: &ptg_config::Indexer) -> Self {
		Self {
			once: args.once,
			force: args.force,
			poll_interval: Duration::from_secs(cfg.poll_interval_seconds),
		}
	}
}

/// Syncs events into Qdrant every poll interval. Only `--force` applies to the first pass.
///
/// In `--once` mode a failed pass is returned as an error; otherwise it is logged and retried.
pub async fn run_worker(service: &PlacesService, options: WorkerOptions) -> color_eyre::Result<()> {
	let mut force = options.force;

	loop {
		match service.index_events(IndexRequest { force }).await {
			Ok(report) => {
				if report.error_count > 0 {
					tracing::warn!(error_count = report.error_count, "Some events failed to index.");
				}
				if options.once {
					return if report.error_count == 0 {
						Ok(())
					} else {
						Err(eyre::eyre!("{} events failed to index.", report.error_count))
					};
				}
			},
			Err(err) => {
				if options.once {
					return Err(err.into());
				}

				tracing::error!(error = %err, "Indexing pass failed.");
			},
		}

		force = false;

		tokio_time::sleep(options.poll_interval).await;
	}
}
