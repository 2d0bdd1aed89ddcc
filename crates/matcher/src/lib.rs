//! Candidate name matching for interactive completion.
//!
//! Completion sources run a cheap prefix pass first and fall back to fuzzy
//! subsequence matching when the prefix pass yields nothing. The subsequence
//! variants also report the matched character positions so menus can
//! highlight them (see `match_indices` on completion items).
//!
//! All matching is `char`-based and case-sensitive; callers that want
//! case-insensitive behavior normalize before matching.

/// Returns true if `candidate` starts with `pattern`.
///
/// An empty pattern matches every candidate.
pub fn prefix_match(candidate: &str, pattern: &str) -> bool {
	candidate.starts_with(pattern)
}

/// Returns true if the characters of `pattern` appear in `candidate` in
/// order, not necessarily contiguously.
pub fn subsequence_match(candidate: &str, pattern: &str) -> bool {
	subsequence_indices(candidate, pattern).is_some()
}

/// Matches `pattern` as a subsequence of `candidate`, returning the char
/// indices of the matched positions.
///
/// The match is greedy from the left: each pattern character binds to the
/// earliest remaining candidate character. Returns `None` when the pattern
/// is not a subsequence; an empty pattern yields `Some(vec![])`.
pub fn subsequence_indices(candidate: &str, pattern: &str) -> Option<Vec<usize>> {
	let mut indices = Vec::new();
	let mut pattern_chars = pattern.chars().peekable();

	for (idx, ch) in candidate.chars().enumerate() {
		let Some(&wanted) = pattern_chars.peek() else {
			break;
		};
		if ch == wanted {
			indices.push(idx);
			pattern_chars.next();
		}
	}

	pattern_chars.peek().is_none().then_some(indices)
}
