use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

const SCHEMA_LOCK_ID: i64 = 5_005_152;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &ptg_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;
		let version: String = sqlx::query_scalar("SELECT version()").fetch_one(&pool).await?;

		tracing::info!(%version, "PostgreSQL connection established.");

		Ok(Self { pool })
	}

	/// Pool that connects on first use. Handy when a caller may never touch the database.
	pub fn connect_lazy(cfg: &ptg_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect_lazy(&cfg.dsn)?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		// Advisory locks are held per connection, so keep the lock inside one transaction.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(SCHEMA_LOCK_ID).execute(&mut *tx).await?;

		for statement in schema::statements(&sql) {
			sqlx::query(statement).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
