use std::collections::{HashMap, HashSet};

use unicode_segmentation::UnicodeSegmentation;

const MIN_TERM_CHARS: usize = 2;

/// Query terms: lower-cased Unicode words, deduplicated in first-seen order.
pub fn tokenize(text: &str, max_terms: usize) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	if max_terms == 0 {
		return out;
	}

	for term in terms(text) {
		if seen.insert(term.clone()) {
			out.push(term);
		}
		if out.len() >= max_terms {
			break;
		}
	}

	out
}

/// Term frequencies of a document, along with its length in terms.
pub fn term_counts(text: &str) -> (HashMap<String, u32>, u32) {
	let mut counts = HashMap::new();
	let mut len = 0_u32;

	for term in terms(text) {
		*counts.entry(term).or_insert(0) += 1;

		len += 1;
	}

	(counts, len)
}

/// Cuts `text` to at most `max_chars` characters without splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}

fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
	text.unicode_words().filter_map(|word| {
		let folded = fold_term(word);

		(folded.chars().count() >= MIN_TERM_CHARS).then_some(folded)
	})
}

fn fold_term(word: &str) -> String {
	word.chars()
		.flat_map(char::to_lowercase)
		.map(|ch| if ch == 'ё' { 'е' } else { ch })
		.collect()
}
