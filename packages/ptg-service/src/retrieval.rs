use std::{cmp::Ordering, collections::HashMap};

use qdrant_client::qdrant::{
	Condition, Filter, Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, PlacesService, Result};
use ptg_config::SearchLexical;
use ptg_domain::{bm25::Bm25, text};
use ptg_storage::qdrant::{CITY_FIELD, DENSE_VECTOR_NAME};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
	pub event_id: Uuid,
	pub name: String,
	pub kind: Option<String>,
	pub document: String,
	pub image_path: Option<String>,
	pub retrieval_score: f32,
	/// 1-based position in the vector search result.
	pub retrieval_rank: u32,
	pub lexical_score: Option<f32>,
	pub final_score: f32,
}
#[cfg(test)]
impl Candidate {
	pub(crate) fn for_test(name: &str) -> Self {
		Self {
			event_id: ptg_domain::event::event_id(name),
			name: name.to_string(),
			kind: None,
			document: name.to_string(),
			image_path: None,
			retrieval_score: 0.0,
			retrieval_rank: 1,
			lexical_score: None,
			final_score: 0.0,
		}
	}
}

impl PlacesService {
	/// Embeds the query, searches the city's points, and returns at most `search.top_k`
	/// candidates in suggestion order.
	pub async fn retrieve(&self, query: &str, city: &str) -> Result<Vec<Candidate>> {
		let texts = [query.to_string()];
		let vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;
		let vector = vectors
			.into_iter()
			.next()
			.ok_or_else(|| Error::provider("Embedding provider returned no vectors."))?;

		if vector.len() != self.qdrant.vector_dim as usize {
			return Err(Error::provider(format!(
				"Embedding dimension mismatch: expected {}, got {}.",
				self.qdrant.vector_dim,
				vector.len()
			)));
		}

		let points = self.search_city(vector, city, self.cfg.search.candidate_k).await?;
		let candidates = collect_candidates(&points);
		let mut ranked = rerank_lexical(candidates, query, &self.cfg.search.lexical);

		ranked.truncate(self.cfg.search.top_k as usize);

		tracing::debug!(
			city,
			hits = points.len(),
			kept = ranked.len(),
			lexical = self.cfg.search.lexical.enabled,
			"Retrieved candidates."
		);

		Ok(ranked)
	}

	async fn search_city(
		&self,
		vector: Vec<f32>,
		city: &str,
		limit: u32,
	) -> Result<Vec<ScoredPoint>> {
		let search = QueryPointsBuilder::new(self.qdrant.collection.clone())
			.query(Query::new_nearest(vector))
			.using(DENSE_VECTOR_NAME)
			.filter(Filter::must([Condition::matches(CITY_FIELD, city.to_string())]))
			.limit(u64::from(limit))
			.with_payload(true);
		let response = self.qdrant.client.query(search).await?;

		Ok(response.result)
	}
}

/// Re-orders candidates by blending the vector rank with a BM25 rank over the candidate
/// documents.
///
/// Leaves the vector order untouched when lexical scoring is disabled, the query has no
/// usable terms, or no candidate matches any term.
pub fn rerank_lexical(
	mut candidates: Vec<Candidate>,
	query: &str,
	cfg: &SearchLexical,
) -> Vec<Candidate> {
	if !cfg.enabled || candidates.len() < 2 {
		return candidates;
	}

	let terms = text::tokenize(query, cfg.max_query_terms as usize);

	if terms.is_empty() {
		return candidates;
	}

	let docs: Vec<&str> = candidates.iter().map(|candidate| candidate.document.as_str()).collect();
	let scores = Bm25::new(&docs, cfg.k1, cfg.b).scores(&terms);

	if scores.iter().all(|score| *score <= 0.0) {
		return candidates;
	}

	let mut order: Vec<usize> = (0..candidates.len()).collect();

	order.sort_by(|&a, &b| {
		cmp_f32_desc(scores[a], scores[b])
			.then(candidates[a].retrieval_rank.cmp(&candidates[b].retrieval_rank))
	});

	let mut lexical_rank = vec![0_u32; candidates.len()];

	for (pos, idx) in order.into_iter().enumerate() {
		lexical_rank[idx] = pos as u32 + 1;
	}

	let total = candidates.len() as u32;
	let weight = cfg.retrieval_weight;

	for (idx, candidate) in candidates.iter_mut().enumerate() {
		candidate.lexical_score = Some(scores[idx]);
		candidate.final_score = weight * rank_normalize(candidate.retrieval_rank, total)
			+ (1.0 - weight) * rank_normalize(lexical_rank[idx], total);
	}

	candidates.sort_by(|a, b| {
		cmp_f32_desc(a.final_score, b.final_score).then(a.retrieval_rank.cmp(&b.retrieval_rank))
	});

	candidates
}

pub fn rank_normalize(rank: u32, total: u32) -> f32 {
	if total <= 1 {
		return 1.0;
	}
	if rank == 0 {
		return 0.0;
	}

	let denom = (total - 1) as f32;
	let pos = (rank.saturating_sub(1)) as f32;

	(1.0 - pos / denom).clamp(0.0, 1.0)
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn collect_candidates(points: &[ScoredPoint]) -> Vec<Candidate> {
	let mut out = Vec::with_capacity(points.len());

	for point in points {
		let Some(name) = payload_string(&point.payload, "name") else {
			tracing::warn!("Event point missing name.");

			continue;
		};
		let event_id = payload_string(&point.payload, "event_id")
			.and_then(|raw| Uuid::parse_str(&raw).ok())
			.unwrap_or_else(|| ptg_domain::event::event_id(&name));
		let document = payload_string(&point.payload, "document").unwrap_or_else(|| name.clone());

		out.push(Candidate {
			event_id,
			kind: payload_string(&point.payload, "kind"),
			image_path: payload_string(&point.payload, "image_path")
				.filter(|path| !path.trim().is_empty()),
			name,
			document,
			retrieval_score: point.score,
			retrieval_rank: out.len() as u32 + 1,
			lexical_score: None,
			final_score: point.score,
		});
	}

	out
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}
