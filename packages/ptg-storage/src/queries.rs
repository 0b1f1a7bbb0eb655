use sqlx::{Executor, Postgres};

use crate::{
	Error, Result,
	db::Db,
	models::{EventRow, NewEvent, User},
};

pub async fn city_exists(db: &Db, town: &str) -> Result<bool> {
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE town = $1)")
			.bind(town)
			.fetch_one(&db.pool)
			.await?;

	Ok(exists)
}

pub async fn list_cities(db: &Db) -> Result<Vec<String>> {
	let cities: Vec<String> = sqlx::query_scalar("SELECT DISTINCT town FROM events ORDER BY town")
		.fetch_all(&db.pool)
		.await?;

	Ok(cities)
}

pub async fn upsert_user(db: &Db, id: i64, city: &str) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO users (id, city)
VALUES ($1, $2)
ON CONFLICT (id) DO UPDATE
SET city = EXCLUDED.city, updated_at = now()",
	)
	.bind(id)
	.bind(city)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_user(db: &Db, id: i64) -> Result<Option<User>> {
	let user = sqlx::query_as::<_, User>(
		"SELECT id, city, created_at, updated_at FROM users WHERE id = $1",
	)
	.bind(id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(user)
}

pub async fn user_city(db: &Db, id: i64) -> Result<Option<String>> {
	Ok(fetch_user(db, id).await?.map(|user| user.city))
}

/// Returns `true` when the event was new, `false` when an existing row was replaced.
pub async fn upsert_event<'e, E>(executor: E, event: &NewEvent) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	if event.name.trim().is_empty() {
		return Err(Error::InvalidArgument("Event name must be non-empty.".to_string()));
	}

	let inserted: bool = sqlx::query_scalar(
		"\
INSERT INTO events (name, description, town, type, path)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (name) DO UPDATE
SET
	description = EXCLUDED.description,
	town = EXCLUDED.town,
	type = EXCLUDED.type,
	path = EXCLUDED.path,
	updated_at = now()
RETURNING (xmax = 0)",
	)
	.bind(event.name.as_str())
	.bind(event.description.as_str())
	.bind(event.town.as_str())
	.bind(event.kind.as_str())
	.bind(event.path.as_deref())
	.fetch_one(executor)
	.await?;

	Ok(inserted)
}

/// Keyset page over events ordered by name. Pass the last name of the previous page to continue.
pub async fn list_events_page(
	db: &Db,
	after_name: Option<&str>,
	limit: u32,
) -> Result<Vec<EventRow>> {
	let rows = sqlx::query_as::<_, EventRow>(
		"\
SELECT name, description, town, type, path, indexed_hash
FROM events
WHERE $1::text IS NULL OR name > $1
ORDER BY name
LIMIT $2",
	)
	.bind(after_name)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn mark_event_indexed(db: &Db, name: &str, content_hash: &str) -> Result<()> {
	sqlx::query("UPDATE events SET indexed_hash = $1 WHERE name = $2")
		.bind(content_hash)
		.bind(name)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn count_events(db: &Db) -> Result<i64> {
	let count: i64 = sqlx::query_scalar("SELECT count(*) FROM events").fetch_one(&db.pool).await?;

	Ok(count)
}
