pub mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ptg_cli::ConfigArgs;
use ptg_service::PlacesService;
use ptg_storage::{db::Db, qdrant::QdrantStore};

#[derive(Debug, Parser)]
#[command(
	version = ptg_cli::VERSION,
	rename_all = "kebab",
	styles = ptg_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: ConfigArgs,
	/// Run a single indexing pass and exit.
	#[arg(long)]
	pub once: bool,
	/// Re-embed every event, ignoring stored content hashes.
	#[arg(long)]
	pub force: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = ptg_config::load(&args.config.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let qdrant = QdrantStore::new(&config.storage.qdrant)?;
	let service = PlacesService::new(config, db, qdrant);
	let options = worker::WorkerOptions::from_args(&args, &service.cfg.indexer);

	worker::run_worker(&service, options).await
}
