use std::sync::{Arc, atomic::AtomicUsize};

use ptg_service::StartRequest;

#[tokio::test]
#[ignore = "Requires external Postgres. Set PTG_PG_DSN to run."]
async fn start_accepts_towns_stored_in_raw_spelling() {
	let Some(test_db) = super::test_db().await else {
		eprintln!(
			"Skipping start_accepts_towns_stored_in_raw_spelling; set PTG_PG_DSN to run this test."
		);

		return;
	};
	let cfg = super::test_config(
		test_db.dsn().to_string(),
		"http://127.0.0.1:1".to_string(),
		"ptg_unused".to_string(),
	);
	let service = super::build_service(cfg, super::providers(Arc::new(AtomicUsize::new(0))))
		.await
		.expect("Failed to build service.");

	// Rows written by a scraper, bypassing admin ingestion.
	for (name, town) in [("Третьяковка", "москва"), ("Кремль", "казань")] {
		sqlx::query(
			"INSERT INTO events (name, description, town, type) VALUES ($1, 'Описание', $2, 'museum')",
		)
		.bind(name)
		.bind(town)
		.execute(&service.db.pool)
		.await
		.expect("Failed to insert raw event.");
	}

	let rejected = service
		.start(StartRequest { user_id: 2, city: "Тверь".to_string() })
		.await
		.expect("Start should not fail for unknown cities.");

	assert!(!rejected.success);
	assert_eq!(rejected.supported_cities, vec!["Казань".to_string(), "Москва".to_string()]);

	let started = service
		.start(StartRequest { user_id: 1, city: "МОСКВА".to_string() })
		.await
		.expect("Failed to register user.");

	assert!(started.success);
	assert_eq!(started.city.as_deref(), Some("Москва"));

	drop(service);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
