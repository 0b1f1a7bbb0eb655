use std::sync::Arc;

use ptg_service::PlacesService;
use ptg_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PlacesService>,
}
impl AppState {
	pub async fn new(config: ptg_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		if qdrant.ensure_collection().await? {
			tracing::info!(
				collection = %qdrant.collection,
				"Created an empty collection. Run the indexer to fill it."
			);
		}

		Ok(Self::from_service(PlacesService::new(config, db, qdrant)))
	}

	pub fn from_service(service: PlacesService) -> Self {
		Self { service: Arc::new(service) }
	}
}
