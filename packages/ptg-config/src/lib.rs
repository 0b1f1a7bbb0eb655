mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Indexer, LlmProviderConfig, Postgres, Providers, Qdrant,
	Recommend, Search, SearchLexical, SearchSessions, Security, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in
		[("service.http_bind", &cfg.service.http_bind), ("service.admin_bind", &cfg.service.admin_bind)]
	{
		if value.trim().is_empty() {
			return Err(Error::validation(format!("{label} must be non-empty.")));
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::validation("storage.qdrant.collection must be non-empty."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::validation("providers.embedding.dimensions must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::validation(
			"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
		));
	}

	let temperature = cfg.providers.llm.temperature;

	if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
		return Err(Error::validation("providers.llm.temperature must be in the range 0.0-2.0."));
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("llm", &cfg.providers.llm.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::validation(format!("Provider {label} api_key must be non-empty.")));
		}
	}

	validate_search(cfg)?;

	if cfg.recommend.max_context_chars == 0 {
		return Err(Error::validation("recommend.max_context_chars must be greater than zero."));
	}
	if cfg.indexer.batch_size == 0 {
		return Err(Error::validation("indexer.batch_size must be greater than zero."));
	}
	if cfg.indexer.poll_interval_seconds == 0 {
		return Err(Error::validation("indexer.poll_interval_seconds must be greater than zero."));
	}

	Ok(())
}

fn validate_search(cfg: &Config) -> Result<()> {
	let search = &cfg.search;

	if search.top_k == 0 {
		return Err(Error::validation("search.top_k must be greater than zero."));
	}
	if search.candidate_k < search.top_k {
		return Err(Error::validation("search.candidate_k must be at least search.top_k."));
	}

	let lexical = &search.lexical;

	if !lexical.retrieval_weight.is_finite() {
		return Err(Error::validation("search.lexical.retrieval_weight must be a finite number."));
	}
	if !(0.0..=1.0).contains(&lexical.retrieval_weight) {
		return Err(Error::validation(
			"search.lexical.retrieval_weight must be in the range 0.0-1.0.",
		));
	}
	if !lexical.k1.is_finite() || lexical.k1 < 0.0 {
		return Err(Error::validation("search.lexical.k1 must be zero or greater."));
	}
	if !lexical.b.is_finite() || !(0.0..=1.0).contains(&lexical.b) {
		return Err(Error::validation("search.lexical.b must be in the range 0.0-1.0."));
	}
	if lexical.max_query_terms == 0 {
		return Err(Error::validation("search.lexical.max_query_terms must be greater than zero."));
	}
	if search.sessions.ttl_seconds == 0 {
		return Err(Error::validation("search.sessions.ttl_seconds must be greater than zero."));
	}
	if search.sessions.max_sessions == 0 {
		return Err(Error::validation("search.sessions.max_sessions must be greater than zero."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.recommend.system_prompt.as_deref().map(|prompt| prompt.trim().is_empty()).unwrap_or(false)
	{
		cfg.recommend.system_prompt = None;
	}

	cfg.storage.qdrant.url = cfg.storage.qdrant.url.trim_end_matches('/').to_string();
	cfg.providers.embedding.api_base =
		cfg.providers.embedding.api_base.trim_end_matches('/').to_string();
	cfg.providers.llm.api_base = cfg.providers.llm.api_base.trim_end_matches('/').to_string();
}
