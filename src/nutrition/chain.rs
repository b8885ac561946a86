//! Ordered fallback chains
//!
//! A field strategy is a list of pure rules tried in order; the first rule
//! that returns a value wins.

/// A single extraction rule
pub type Rule<I, T> = fn(&I) -> Option<T>;

/// Run `rules` in order; the first present value and the index of its rule
pub fn first_match_indexed<I: ?Sized, T>(rules: &[Rule<I, T>], input: &I) -> Option<(usize, T)> {
    rules
        .iter()
        .enumerate()
        .find_map(|(idx, rule)| rule(input).map(|v| (idx, v)))
}
