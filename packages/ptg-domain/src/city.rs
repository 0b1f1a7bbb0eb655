use unicode_normalization::UnicodeNormalization;

/// Canonical city spelling used for both user registration and event towns.
///
/// Every whitespace-separated word is title-cased, and so is every hyphen-separated part, so
/// `"  санкт-петербург "` becomes `"Санкт-Петербург"`.
pub fn normalize_city(raw: &str) -> Option<String> {
	let composed: String = raw.nfc().collect();
	let words: Vec<String> = composed.split_whitespace().map(title_case_word).collect();

	if words.is_empty() {
		return None;
	}

	Some(words.join(" "))
}

fn title_case_word(word: &str) -> String {
	let mut out = String::with_capacity(word.len());
	let mut at_boundary = true;

	for ch in word.chars() {
		if ch.is_alphabetic() {
			if at_boundary {
				out.extend(ch.to_uppercase());
			} else {
				out.extend(ch.to_lowercase());
			}

			at_boundary = false;
		} else {
			out.push(ch);

			at_boundary = true;
		}
	}

	out
}
