//! Repetition search
//!
//! Greedy longest-match search over the hash chains. Among candidates of
//! equal length the nearest one wins, since the chain is walked nearest first
//! and only a strictly longer match replaces the current best.

use super::hash::MatchFinder;
use crate::window::SlidingWindow;
use crate::{MAX_REP_LENGTH, MAX_SHORT_REP_DISTANCE, MIN_REP_LENGTH};

/// Upper bound on chain links followed per position
pub const MAX_CHAIN_LENGTH: usize = 0x400;

/// Result of pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Length of the found match (0 if no match)
    pub length: usize,
    /// Backward distance to the match (0 if no match)
    pub distance: usize,
}

impl MatchResult {
    /// Create a new match result
    pub fn new(length: usize, distance: usize) -> Self {
        Self { length, distance }
    }

    /// Create a "no match" result
    pub fn no_match() -> Self {
        Self::new(0, 0)
    }

    /// Check if this represents a valid match
    pub fn is_match(&self) -> bool {
        self.length >= MIN_REP_LENGTH
    }
}

/// Find the longest repetition for the bytes at `pos`
///
/// Only bytes already in the window are compared, so the match never extends
/// past [`SlidingWindow::end`].
pub fn find_repetition(window: &SlidingWindow, finder: &MatchFinder, pos: usize) -> MatchResult {
    let max_length = (window.end() - pos).min(MAX_REP_LENGTH);
    if max_length < MIN_REP_LENGTH {
        return MatchResult::no_match();
    }

    let reach = window.reach(pos);
    let mut best = MatchResult::no_match();

    for candidate in finder.candidates(window, pos).take(MAX_CHAIN_LENGTH) {
        let distance = pos - candidate;
        if distance > reach {
            break;
        }

        let length = common_length(window, candidate, pos, max_length);
        if length < MIN_REP_LENGTH {
            // Hash collision
            continue;
        }
        if length == MIN_REP_LENGTH && distance > MAX_SHORT_REP_DISTANCE {
            continue;
        }

        if length > best.length {
            best = MatchResult::new(length, distance);
            if length == max_length {
                break;
            }
        }
    }

    best
}

/// Number of equal bytes at `earlier` and `pos`, up to `max_length`
///
/// The ranges may overlap, which is how runs are matched.
fn common_length(window: &SlidingWindow, earlier: usize, pos: usize, max_length: usize) -> usize {
    let current = &window.slice_from(pos)[..max_length];
    let previous = window.slice_from(earlier);
    current
        .iter()
        .zip(previous)
        .take_while(|(a, b)| a == b)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(data: &[u8], size: usize, upto: usize) -> (SlidingWindow, MatchFinder) {
        let mut window = SlidingWindow::new(size);
        window.extend(data);
        let mut finder = MatchFinder::new();
        for pos in 0..upto {
            finder.insert(&window, pos);
        }
        (window, finder)
    }

    #[test]
    fn test_no_match() {
        let (window, finder) = indexed(b"ABCDEFGHIJ", 1024, 5);
        assert!(!find_repetition(&window, &finder, 5).is_match());
    }

    #[test]
    fn test_simple_match() {
        let (window, finder) = indexed(b"hello hello", 1024, 6);
        assert_eq!(find_repetition(&window, &finder, 6), MatchResult::new(5, 6));
    }

    #[test]
    fn test_run_overlaps_itself() {
        let (window, finder) = indexed(b"aaaaaaaaaa", 4096, 1);
        assert_eq!(find_repetition(&window, &finder, 1), MatchResult::new(9, 1));
    }

    #[test]
    fn test_nearest_wins_ties() {
        let (window, finder) = indexed(b"abcXabcYabc", 1024, 8);
        assert_eq!(find_repetition(&window, &finder, 8), MatchResult::new(3, 4));
    }

    #[test]
    fn test_longer_match_further_back() {
        let (window, finder) = indexed(b"abcdXabcYabcd", 1024, 9);
        assert_eq!(find_repetition(&window, &finder, 9), MatchResult::new(4, 9));
    }

    #[test]
    fn test_short_match_distance_limit() {
        let mut data = b"xy".to_vec();
        data.extend(std::iter::repeat(0u8).take(300));
        data.extend_from_slice(b"xy");
        let pos = data.len() - 2;
        let (window, finder) = indexed(&data, 1024, pos);
        assert!(!find_repetition(&window, &finder, pos).is_match());

        let mut data = b"xy".to_vec();
        data.extend(std::iter::repeat(0u8).take(200));
        data.extend_from_slice(b"xy");
        let pos = data.len() - 2;
        let (window, finder) = indexed(&data, 1024, pos);
        assert_eq!(
            find_repetition(&window, &finder, pos),
            MatchResult::new(2, 202)
        );
    }

    #[test]
    fn test_respects_dictionary_reach() {
        let mut data = b"abcdef".to_vec();
        data.extend((0..1100).map(|i| (i % 40) as u8 + 150));
        data.extend_from_slice(b"abcdef");
        let pos = data.len() - 6;

        let (window, finder) = indexed(&data, 1024, pos);
        assert!(!find_repetition(&window, &finder, pos).is_match());

        let (window, finder) = indexed(&data, 2048, pos);
        assert_eq!(
            find_repetition(&window, &finder, pos),
            MatchResult::new(6, pos)
        );
    }

    #[test]
    fn test_length_capped() {
        let data = vec![7u8; 2000];
        let (window, finder) = indexed(&data, 4096, 1);
        assert_eq!(
            find_repetition(&window, &finder, 1),
            MatchResult::new(MAX_REP_LENGTH, 1)
        );
    }
}
