use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = ptg_api::Args::parse();

	ptg_api::run(args).await
}
