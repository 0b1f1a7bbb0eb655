use serde::{Deserialize, Serialize};

/// Telegram rejects photo captions of 1024 characters or more.
pub const MAX_CAPTION_CHARS: usize = 1_024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyLayout {
	/// One photo message with the recommendation as its caption.
	PhotoWithCaption,
	/// The photo alone, then the recommendation as a separate text message.
	PhotoThenText,
	TextOnly,
	/// Nothing left to suggest.
	Empty,
}

pub fn layout(text: &str, has_image: bool) -> ReplyLayout {
	if text.is_empty() {
		return ReplyLayout::Empty;
	}
	if !has_image {
		return ReplyLayout::TextOnly;
	}

	if text.chars().count() < MAX_CAPTION_CHARS {
		ReplyLayout::PhotoWithCaption
	} else {
		ReplyLayout::PhotoThenText
	}
}
