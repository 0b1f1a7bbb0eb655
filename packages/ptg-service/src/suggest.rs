use serde::{Deserialize, Serialize};

use crate::{Error, PlacesService, Result, sessions::Claim};
use ptg_domain::{
	city,
	reply::{self, ReplyLayout},
};
use ptg_storage::queries;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
	pub user_id: i64,
	pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
	pub success: bool,
	/// Normalised city name, present when the user was registered.
	pub city: Option<String>,
	/// Cities that have events. Filled only when registration failed.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub supported_cities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
	pub user_id: i64,
	pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
	pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
	pub text: String,
	pub image_path: Option<String>,
	pub layout: ReplyLayout,
	pub event_name: Option<String>,
	/// 1-based position of this suggestion in the session, 0 when there is none.
	pub position: u32,
	pub remaining: u32,
	pub exhausted: bool,
}
impl SuggestionResponse {
	pub fn exhausted() -> Self {
		Self {
			text: String::new(),
			image_path: None,
			layout: ReplyLayout::Empty,
			event_name: None,
			position: 0,
			remaining: 0,
			exhausted: true,
		}
	}

	fn from_claim(text: String, claim: &Claim) -> Self {
		let image_path = claim.candidate.image_path.clone();
		let layout = reply::layout(&text, image_path.is_some());

		Self {
			text,
			image_path,
			layout,
			event_name: Some(claim.candidate.name.clone()),
			position: claim.position as u32 + 1,
			remaining: claim.remaining() as u32,
			exhausted: false,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
	pub acknowledged: bool,
}

impl PlacesService {
	/// Registers the user's city. Unknown or blank cities are reported with `success = false`.
	pub async fn start(&self, req: StartRequest) -> Result<StartResponse> {
		tracing::info!(user_id = req.user_id, city = %req.city, "Registering user city.");

		let Some(city) = city::normalize_city(&req.city) else {
			tracing::warn!(user_id = req.user_id, "Rejected blank city.");

			return Ok(StartResponse { success: false, city: None, supported_cities: Vec::new() });
		};

		// Exact match first; other loaders may store towns in raw spelling.
		if !queries::city_exists(&self.db, &city).await? {
			let supported_cities = normalized_cities(queries::list_cities(&self.db).await?);

			if !supported_cities.contains(&city) {
				tracing::warn!(user_id = req.user_id, city = %city, "City has no events.");

				return Ok(StartResponse { success: false, city: None, supported_cities });
			}
		}

		queries::upsert_user(&self.db, req.user_id, &city).await?;

		tracing::info!(user_id = req.user_id, city = %city, "User registered.");

		Ok(StartResponse { success: true, city: Some(city), supported_cities: Vec::new() })
	}

	/// Runs a fresh search for the user's city and returns the first suggestion.
	pub async fn chat(&self, req: ChatRequest) -> Result<SuggestionResponse> {
		let query = req.text.trim();

		if query.is_empty() {
			return Err(Error::invalid("text must be non-empty."));
		}

		let city = queries::user_city(&self.db, req.user_id).await?.ok_or_else(|| {
			Error::NotFound { message: format!("User {} has not chosen a city.", req.user_id) }
		})?;

		tracing::info!(user_id = req.user_id, city = %city, "Searching suggestions.");

		let candidates = self.retrieve(query, &city).await?;
		let Some(claim) = self.sessions.replace(req.user_id, query.to_string(), candidates) else {
			tracing::info!(user_id = req.user_id, city = %city, "No events matched the query.");

			return Ok(SuggestionResponse::exhausted());
		};

		self.suggest(req.user_id, claim).await
	}

	/// Moves on to the next candidate of the user's last search.
	pub async fn dislike(&self, req: RateRequest) -> Result<SuggestionResponse> {
		let Some(claim) = self.sessions.claim_next(req.user_id) else {
			tracing::info!(user_id = req.user_id, "No suggestions left.");

			return Ok(SuggestionResponse::exhausted());
		};

		self.suggest(req.user_id, claim).await
	}

	pub async fn like(&self, req: RateRequest) -> Result<LikeResponse> {
		tracing::info!(user_id = req.user_id, "User liked the suggestion.");

		Ok(LikeResponse { acknowledged: true })
	}

	async fn suggest(&self, user_id: i64, claim: Claim) -> Result<SuggestionResponse> {
		match self.draft_recommendation(&claim.query, &claim.candidate).await {
			Ok(text) => {
				tracing::info!(
					user_id,
					event = %claim.candidate.name,
					position = claim.position + 1,
					total = claim.total,
					"Suggestion drafted."
				);

				Ok(SuggestionResponse::from_claim(text, &claim))
			},
			Err(err) => {
				self.sessions.release(user_id, &claim);

				tracing::warn!(user_id, error = %err, "Drafting failed. Candidate released.");

				Err(err)
			},
		}
	}
}

/// Town names as users register them: normalised, sorted, deduplicated.
fn normalized_cities(towns: Vec<String>) -> Vec<String> {
	let mut cities: Vec<String> =
		towns.iter().filter_map(|town| city::normalize_city(town)).collect();

	cities.sort();
	cities.dedup();

	cities
}
