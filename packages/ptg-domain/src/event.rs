use uuid::Uuid;

const EVENT_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_4f3e_8a2c_4d0b_9e57_3c1a_0f6d_2e91);

/// Text that gets embedded and handed to the LLM as context: the name followed by the
/// description.
pub fn compose_document(name: &str, description: &str) -> String {
	let name = name.trim();
	let description = description.trim();

	match (name.is_empty(), description.is_empty()) {
		(true, _) => description.to_string(),
		(false, true) => name.to_string(),
		(false, false) => format!("{name} {description}"),
	}
}

/// Event names are unique, so the point id is derived from the name alone.
pub fn event_id(name: &str) -> Uuid {
	Uuid::new_v5(&EVENT_NAMESPACE, name.trim().as_bytes())
}

/// Fingerprint of everything that ends up in a Qdrant point.
pub fn content_hash(
	name: &str,
	description: &str,
	city: &str,
	kind: &str,
	image_path: Option<&str>,
) -> String {
	let mut hasher = blake3::Hasher::new();

	for part in [name, description, city, kind, image_path.unwrap_or_default()] {
		hasher.update(&(part.len() as u64).to_le_bytes());
		hasher.update(part.as_bytes());
	}

	hasher.finalize().to_hex().to_string()
}
