//! Okapi BM25 over a small in-memory corpus.
//!
//! The corpus is the candidate set returned by vector search, so statistics are recomputed per
//! query and never persisted.

use std::collections::HashMap;

use crate::text;

pub struct Bm25 {
	docs: Vec<DocStats>,
	doc_freq: HashMap<String, u32>,
	avg_len: f32,
	k1: f32,
	b: f32,
}

struct DocStats {
	counts: HashMap<String, u32>,
	len: u32,
}

impl Bm25 {
	pub fn new<S>(docs: &[S], k1: f32, b: f32) -> Self
	where
		S: AsRef<str>,
	{
		let mut stats = Vec::with_capacity(docs.len());
		let mut doc_freq: HashMap<String, u32> = HashMap::new();
		let mut total_len = 0_u64;

		for doc in docs {
			let (counts, len) = text::term_counts(doc.as_ref());

			for term in counts.keys() {
				*doc_freq.entry(term.clone()).or_insert(0) += 1;
			}

			total_len += u64::from(len);

			stats.push(DocStats { counts, len });
		}

		let avg_len = if stats.is_empty() { 0.0 } else { total_len as f32 / stats.len() as f32 };

		Self { docs: stats, doc_freq, avg_len, k1, b }
	}

	pub fn len(&self) -> usize {
		self.docs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.docs.is_empty()
	}

	/// Smoothed IDF. Stays positive even for a term found in every candidate.
	pub fn idf(&self, term: &str) -> f32 {
		let n = self.docs.len() as f32;
		let df = self.doc_freq.get(term).copied().unwrap_or(0) as f32;

		(1.0 + (n - df + 0.5) / (df + 0.5)).ln()
	}

	pub fn score(&self, query_terms: &[String], doc_index: usize) -> f32 {
		let Some(doc) = self.docs.get(doc_index) else { return 0.0 };

		if doc.len == 0 || query_terms.is_empty() {
			return 0.0;
		}

		let norm = if self.avg_len > 0.0 {
			1.0 - self.b + self.b * doc.len as f32 / self.avg_len
		} else {
			1.0
		};
		let mut score = 0.0_f32;

		for term in query_terms {
			let Some(&tf) = doc.counts.get(term.as_str()) else { continue };
			let tf = tf as f32;

			score += self.idf(term) * tf * (self.k1 + 1.0) / (tf + self.k1 * norm);
		}

		score
	}

	pub fn scores(&self, query_terms: &[String]) -> Vec<f32> {
		(0..self.docs.len()).map(|idx| self.score(query_terms, idx)).collect()
	}
}
