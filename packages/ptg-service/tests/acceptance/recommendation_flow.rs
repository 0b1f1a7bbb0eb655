use std::sync::{Arc, atomic::AtomicUsize};

use ptg_domain::reply::ReplyLayout;
use ptg_service::{ChatRequest, Error, IndexRequest, RateRequest, StartRequest, UpsertEventsRequest};

use super::event;

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set PTG_PG_DSN and PTG_QDRANT_URL to run."]
async fn start_chat_and_dislike_walk_city_events() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping start_chat_and_dislike_walk_city_events; set PTG_PG_DSN to run this test."
		);

		return;
	};
	let Some(qdrant_url) = ptg_testkit::env_qdrant_url() else {
		eprintln!(
			"Skipping start_chat_and_dislike_walk_city_events; set PTG_QDRANT_URL to run this test."
		);

		return;
	};
	let collection = test_db.collection_name("ptg_acceptance");
	let cfg = super::test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let service = super::build_service(cfg, super::providers(Arc::new(AtomicUsize::new(0))))
		.await
		.expect("Failed to build service.");

	service
		.upsert_events(UpsertEventsRequest {
			events: vec![
				event(
					"Джаз в саду",
					"Джазовый концерт под открытым небом",
					"москва",
					Some("img/jazz.jpg"),
				),
				event("Третьяковка", "Картинная галерея русского искусства", "Москва", None),
				event("Органный вечер", "Концерт органной музыки в соборе", "Москва", None),
				event("Казанский кремль", "Прогулка по кремлю", "Казань", None),
			],
		})
		.await
		.expect("Failed to store events.");
	service.index_events(IndexRequest::default()).await.expect("Failed to index events.");

	let rejected = service
		.start(StartRequest { user_id: 2, city: "Тверь".to_string() })
		.await
		.expect("Start should not fail for unknown cities.");

	assert!(!rejected.success);
	assert_eq!(rejected.supported_cities, vec!["Казань".to_string(), "Москва".to_string()]);

	let err = service
		.chat(ChatRequest { user_id: 2, text: "концерт".to_string() })
		.await
		.expect_err("Unregistered users cannot chat.");

	assert!(matches!(err, Error::NotFound { .. }));

	let started = service
		.start(StartRequest { user_id: 1, city: "  москва ".to_string() })
		.await
		.expect("Failed to register user.");

	assert!(started.success);
	assert_eq!(started.city.as_deref(), Some("Москва"));

	let first = service
		.chat(ChatRequest { user_id: 1, text: "джазовый концерт".to_string() })
		.await
		.expect("Failed to chat.");

	assert_eq!(first.position, 1);
	assert_eq!(first.remaining, 2);
	assert!(first.text.contains("джазовый концерт"));

	let mut seen = vec![first.event_name.clone().expect("Expected an event name.")];

	for _ in 0..2 {
		let next = service.dislike(RateRequest { user_id: 1 }).await.expect("Failed to dislike.");

		assert!(!next.exhausted);

		seen.push(next.event_name.expect("Expected an event name."));
	}

	seen.sort();

	assert_eq!(seen, vec!["Джаз в саду", "Органный вечер", "Третьяковка"]);

	let done = service.dislike(RateRequest { user_id: 1 }).await.expect("Failed to dislike.");

	assert!(done.exhausted);
	assert_eq!(done.layout, ReplyLayout::Empty);

	drop(service);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
