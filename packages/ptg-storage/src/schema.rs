pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// Split into single statements; the schema files never put `;` inside a statement.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		match line.trim().strip_prefix("\\ir ").map(str::trim) {
			Some("tables/001_users.sql") =>
				out.push_str(include_str!("../../../sql/tables/001_users.sql")),
			Some("tables/002_events.sql") =>
				out.push_str(include_str!("../../../sql/tables/002_events.sql")),
			_ => out.push_str(line),
		}

		out.push('\n');
	}

	out
}
