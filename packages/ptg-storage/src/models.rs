use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct User {
	pub id: i64,
	pub city: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
	pub name: String,
	pub description: String,
	pub town: String,
	#[sqlx(rename = "type")]
	pub kind: String,
	pub path: Option<String>,
	pub indexed_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
	pub name: String,
	pub description: String,
	pub town: String,
	pub kind: String,
	pub path: Option<String>,
}
