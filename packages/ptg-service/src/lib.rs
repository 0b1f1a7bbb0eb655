pub mod events;
pub mod recommend;
pub mod retrieval;
pub mod sessions;
pub mod suggest;

mod error;

pub use error::{Error, Result};
pub use events::{EventInput, IndexReport, IndexRequest, UpsertEventsRequest, UpsertEventsResponse};
pub use ptg_providers::chat::ChatMessage;
pub use retrieval::Candidate;
pub use sessions::{Claim, SessionStore};
pub use suggest::{
	ChatRequest, LikeResponse, RateRequest, StartRequest, StartResponse, SuggestionResponse,
};

use std::{future::Future, pin::Pin, sync::Arc};

use ptg_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use ptg_providers::{chat, embedding};
use ptg_storage::{db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, chat: Arc<dyn ChatProvider>) -> Self {
		Self { embedding, chat }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), chat: provider }
	}
}

pub struct PlacesService {
	pub cfg: Config,
	pub db: Db,
	pub qdrant: QdrantStore,
	pub providers: Providers,
	pub sessions: SessionStore,
}
impl PlacesService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self::with_providers(cfg, db, qdrant, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, qdrant: QdrantStore, providers: Providers) -> Self {
		let sessions = SessionStore::new(&cfg.search.sessions);

		Self { cfg, db, qdrant, providers, sessions }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(chat::complete(cfg, messages).await?) })
	}
}
