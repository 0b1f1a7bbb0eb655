use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{PointStruct, UpsertPointsBuilder, Vector},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, PlacesService, Result};
use ptg_domain::{city, event};
use ptg_storage::{
	models::{EventRow, NewEvent},
	qdrant::{CITY_FIELD, DENSE_VECTOR_NAME},
	queries,
};

const DEFAULT_KIND: &str = "other";
/// Width of the `town` and `type` columns.
const MAX_LABEL_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInput {
	pub name: String,
	pub description: String,
	pub city: String,
	#[serde(default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub image_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertEventsRequest {
	pub events: Vec<EventInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertEventsResponse {
	pub inserted: u32,
	pub updated: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexRequest {
	/// Re-embed every event, even those whose content did not change.
	#[serde(default)]
	pub force: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
	pub collection_created: bool,
	pub indexed: u32,
	pub skipped: u32,
	pub error_count: u32,
}

struct PendingEvent {
	row: EventRow,
	city: String,
	document: String,
	hash: String,
}

impl PlacesService {
	/// Validates and stores events. The whole batch is written in one transaction.
	pub async fn upsert_events(&self, req: UpsertEventsRequest) -> Result<UpsertEventsResponse> {
		if req.events.is_empty() {
			return Err(Error::invalid("events must be non-empty."));
		}

		let events = req
			.events
			.into_iter()
			.enumerate()
			.map(|(idx, input)| validate_event(idx, input))
			.collect::<Result<Vec<_>>>()?;
		let mut tx = self.db.pool.begin().await?;
		let mut response = UpsertEventsResponse { inserted: 0, updated: 0 };

		for event in &events {
			if queries::upsert_event(&mut *tx, event).await? {
				response.inserted += 1;
			} else {
				response.updated += 1;
			}
		}

		tx.commit().await?;

		tracing::info!(
			inserted = response.inserted,
			updated = response.updated,
			"Stored events."
		);

		Ok(response)
	}

	/// Syncs the `events` table into Qdrant, embedding only rows whose content changed since
	/// they were last indexed.
	pub async fn index_events(&self, req: IndexRequest) -> Result<IndexReport> {
		let mut report = IndexReport {
			collection_created: self.qdrant.ensure_collection().await?,
			..IndexReport::default()
		};
		let batch_size = self.cfg.indexer.batch_size;
		let mut after: Option<String> = None;

		loop {
			let page = queries::list_events_page(&self.db, after.as_deref(), batch_size).await?;
			let Some(last) = page.last() else {
				break;
			};

			after = Some(last.name.clone());

			let mut pending = Vec::with_capacity(page.len());

			for row in page {
				let entry = pending_event(row);

				if !req.force && entry.row.indexed_hash.as_deref() == Some(entry.hash.as_str()) {
					report.skipped += 1;

					continue;
				}

				pending.push(entry);
			}

			if pending.is_empty() {
				continue;
			}

			let count = pending.len() as u32;

			match self.index_batch(&pending).await {
				Ok(()) => report.indexed += count,
				Err(err) => {
					tracing::warn!(error = %err, events = count, "Failed to index event batch.");

					report.error_count += count;
				},
			}
		}

		tracing::info!(
			indexed = report.indexed,
			skipped = report.skipped,
			error_count = report.error_count,
			force = req.force,
			"Event indexing finished."
		);

		Ok(report)
	}

	async fn index_batch(&self, pending: &[PendingEvent]) -> Result<()> {
		let documents: Vec<String> = pending.iter().map(|entry| entry.document.clone()).collect();
		let vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &documents).await?;

		if vectors.len() != pending.len() {
			return Err(Error::provider(format!(
				"Embedding count mismatch: expected {}, got {}.",
				pending.len(),
				vectors.len()
			)));
		}

		let mut points = Vec::with_capacity(pending.len());

		for (entry, vec) in pending.iter().zip(vectors) {
			if vec.len() != self.qdrant.vector_dim as usize {
				return Err(Error::provider(format!(
					"Embedding dimension mismatch for {}: expected {}, got {}.",
					entry.row.name,
					self.qdrant.vector_dim,
					vec.len()
				)));
			}

			points.push(build_point(entry, vec));
		}

		self.qdrant
			.client
			.upsert_points(
				UpsertPointsBuilder::new(self.qdrant.collection.clone(), points).wait(true),
			)
			.await?;

		for entry in pending {
			queries::mark_event_indexed(&self.db, &entry.row.name, &entry.hash).await?;
		}

		Ok(())
	}
}

fn validate_event(idx: usize, input: EventInput) -> Result<NewEvent> {
	let name = input.name.trim();
	let description = input.description.trim();

	if name.is_empty() {
		return Err(Error::invalid(format!("$.events[{idx}].name must be non-empty.")));
	}
	if description.is_empty() {
		return Err(Error::invalid(format!("$.events[{idx}].description must be non-empty.")));
	}

	let Some(town) = city::normalize_city(&input.city) else {
		return Err(Error::invalid(format!("$.events[{idx}].city must be non-empty.")));
	};

	if town.chars().count() > MAX_LABEL_CHARS {
		return Err(Error::invalid(format!(
			"$.events[{idx}].city must be at most {MAX_LABEL_CHARS} characters."
		)));
	}

	let kind = input
		.kind
		.as_deref()
		.map(str::trim)
		.filter(|kind| !kind.is_empty())
		.unwrap_or(DEFAULT_KIND);

	if kind.chars().count() > MAX_LABEL_CHARS {
		return Err(Error::invalid(format!(
			"$.events[{idx}].kind must be at most {MAX_LABEL_CHARS} characters."
		)));
	}

	let path = input
		.image_path
		.as_deref()
		.map(str::trim)
		.filter(|path| !path.is_empty())
		.map(str::to_string);

	Ok(NewEvent {
		name: name.to_string(),
		description: description.to_string(),
		town,
		kind: kind.to_string(),
		path,
	})
}

fn pending_event(row: EventRow) -> PendingEvent {
	// Rows written by external loaders may carry raw town spelling.
	let city = city::normalize_city(&row.town).unwrap_or_else(|| row.town.clone());
	let document = event::compose_document(&row.name, &row.description);
	let hash =
		event::content_hash(&row.name, &row.description, &city, &row.kind, row.path.as_deref());

	PendingEvent { row, city, document, hash }
}

fn build_point(entry: &PendingEvent, vec: Vec<f32>) -> PointStruct {
	let event_id = event::event_id(&entry.row.name);
	let mut payload = Payload::new();

	payload.insert("event_id", event_id.to_string());
	payload.insert("name", entry.row.name.clone());
	payload.insert(CITY_FIELD, entry.city.clone());
	payload.insert("kind", entry.row.kind.clone());
	payload.insert(
		"image_path",
		entry.row.path.clone().map(Value::String).unwrap_or(Value::Null),
	);
	payload.insert("document", entry.document.clone());

	let mut vectors = HashMap::new();

	vectors.insert(DENSE_VECTOR_NAME.to_string(), Vector::from(vec));

	PointStruct::new(event_id.to_string(), vectors, payload)
}
