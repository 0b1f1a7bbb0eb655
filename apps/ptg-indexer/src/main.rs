use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ptg_indexer::Args::parse();

	ptg_indexer::run(args).await
}
