use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	#[serde(default)]
	pub recommend: Recommend,
	#[serde(default)]
	pub indexer: Indexer,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Suggestions kept per query; a dislike walks through them in order.
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	/// Nearest neighbours fetched from Qdrant before lexical re-ranking.
	pub candidate_k: u32,
	#[serde(default)]
	pub lexical: SearchLexical,
	#[serde(default)]
	pub sessions: SearchSessions,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchLexical {
	pub enabled: bool,
	/// Share of the final score taken from the vector rank. The rest comes from BM25.
	pub retrieval_weight: f32,
	pub k1: f32,
	pub b: f32,
	pub max_query_terms: u32,
}
impl Default for SearchLexical {
	fn default() -> Self {
		Self { enabled: false, retrieval_weight: 0.7, k1: 1.5, b: 0.75, max_query_terms: 16 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchSessions {
	pub ttl_seconds: u64,
	pub max_sessions: u32,
}
impl Default for SearchSessions {
	fn default() -> Self {
		Self { ttl_seconds: 3_600, max_sessions: 10_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Recommend {
	/// Overrides the built-in guide prompt. The candidate description is appended to it.
	pub system_prompt: Option<String>,
	pub max_context_chars: u32,
}
impl Default for Recommend {
	fn default() -> Self {
		Self { system_prompt: None, max_context_chars: 4_000 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Indexer {
	pub batch_size: u32,
	pub poll_interval_seconds: u64,
}
impl Default for Indexer {
	fn default() -> Self {
		Self { batch_size: 32, poll_interval_seconds: 300 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}

fn default_top_k() -> u32 {
	5
}
