use crate::{ChatMessage, PlacesService, Result, retrieval::Candidate};
use ptg_config::Recommend;
use ptg_domain::text;

pub const DEFAULT_SYSTEM_PROMPT: &str = "Ты русскоязычный туристический гид. Тебе нужно посоветовать гостю, какие места из предложенного контекста можно посетить. Нужно советовать места только из предложенного контекста и никакие больше. Ответ должен полностью охватывать запрос пользователя. Контекст:\n";

impl PlacesService {
	/// Asks the LLM to recommend one candidate in response to the user's query.
	pub async fn draft_recommendation(&self, query: &str, candidate: &Candidate) -> Result<String> {
		let messages = build_messages(&self.cfg.recommend, query, &candidate.document);
		let text = self.providers.chat.complete(&self.cfg.providers.llm, &messages).await?;

		tracing::debug!(
			event = %candidate.name,
			chars = text.chars().count(),
			"Drafted recommendation."
		);

		Ok(text)
	}
}

/// System message carries the prompt followed by the context, the user message carries the
/// query.
pub fn build_messages(cfg: &Recommend, query: &str, context: &str) -> Vec<ChatMessage> {
	let prompt = cfg.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT);
	let context = text::truncate_chars(context, cfg.max_context_chars as usize);

	vec![ChatMessage::system(format!("{prompt}{context}")), ChatMessage::user(query)]
}
