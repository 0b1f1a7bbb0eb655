use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use ptg_service::{IndexRequest, UpsertEventsRequest};
use ptg_storage::queries;

use super::event;

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set PTG_PG_DSN and PTG_QDRANT_URL to run."]
async fn reindex_embeds_only_changed_events() {
	let Some(test_db) = super::test_db().await else {
		eprintln!("Skipping reindex_embeds_only_changed_events; set PTG_PG_DSN to run this test.");

		return;
	};
	let Some(qdrant_url) = ptg_testkit::env_qdrant_url() else {
		eprintln!(
			"Skipping reindex_embeds_only_changed_events; set PTG_QDRANT_URL to run this test."
		);

		return;
	};
	let embed_calls = Arc::new(AtomicUsize::new(0));
	let collection = test_db.collection_name("ptg_acceptance");
	let cfg = super::test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let service = super::build_service(cfg, super::providers(embed_calls.clone()))
		.await
		.expect("Failed to build service.");
	let stored = service
		.upsert_events(UpsertEventsRequest {
			events: vec![
				event("Эрмитаж", "Музей", "Санкт-Петербург", Some("img/hermitage.jpg")),
				event("Кунсткамера", "Музей антропологии", "Санкт-Петербург", None),
				event("Новая Голландия", "Остров и парк", "Санкт-Петербург", None),
			],
		})
		.await
		.expect("Failed to store events.");

	assert_eq!((stored.inserted, stored.updated), (3, 0));
	assert_eq!(queries::count_events(&service.db).await.expect("Failed to count events."), 3);

	let first = service.index_events(IndexRequest::default()).await.expect("Failed to index.");

	assert!(first.collection_created);
	assert_eq!((first.indexed, first.skipped, first.error_count), (3, 0, 0));
	// batch_size = 2
	assert_eq!(embed_calls.load(Ordering::SeqCst), 2);

	let again = service.index_events(IndexRequest::default()).await.expect("Failed to index.");

	assert!(!again.collection_created);
	assert_eq!((again.indexed, again.skipped), (0, 3));

	let updated = service
		.upsert_events(UpsertEventsRequest {
			events: vec![event("Эрмитаж", "Главный музей города", "Санкт-Петербург", None)],
		})
		.await
		.expect("Failed to update event.");

	assert_eq!((updated.inserted, updated.updated), (0, 1));

	let changed = service.index_events(IndexRequest::default()).await.expect("Failed to index.");

	assert_eq!((changed.indexed, changed.skipped), (1, 2));

	let forced =
		service.index_events(IndexRequest { force: true }).await.expect("Failed to index.");

	assert_eq!((forced.indexed, forced.skipped), (3, 0));

	let count = service
		.qdrant
		.client
		.count(
			qdrant_client::qdrant::CountPointsBuilder::new(service.qdrant.collection.clone())
				.exact(true),
		)
		.await
		.expect("Failed to count points.");

	assert_eq!(count.result.map(|result| result.count), Some(3));

	drop(service);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
