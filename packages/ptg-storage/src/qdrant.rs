use qdrant_client::qdrant::{
	CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
	VectorParamsBuilder, VectorsConfigBuilder,
};

use crate::Result;

pub const DENSE_VECTOR_NAME: &str = "dense";
pub const CITY_FIELD: &str = "city";

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &ptg_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection and its `city` keyword index when missing.
	pub async fn ensure_collection(&self) -> Result<bool> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(false);
		}

		let mut vectors_config = VectorsConfigBuilder::default();

		vectors_config.add_named_vector_params(
			DENSE_VECTOR_NAME,
			VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine),
		);

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(vectors_config),
			)
			.await?;
		self.client
			.create_field_index(
				CreateFieldIndexCollectionBuilder::new(
					self.collection.clone(),
					CITY_FIELD,
					FieldType::Keyword,
				)
				.wait(true),
			)
			.await?;

		tracing::info!(collection = %self.collection, "Created Qdrant collection.");

		Ok(true)
	}
}
