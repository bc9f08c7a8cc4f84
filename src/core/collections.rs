//! List helpers shared by the providers: dedup, shuffle and text formatting.

use std::collections::HashSet;
use std::hash::Hash;

use rand::seq::SliceRandom;

/// Remove duplicates by key, keeping the first occurrence and input order
pub fn dedup_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Hash + Eq,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

/// Fisher-Yates shuffle into a new vector
pub fn shuffled<T>(mut items: Vec<T>) -> Vec<T> {
    items.shuffle(&mut rand::thread_rng());
    items
}

/// Shuffle then keep the first `limit` items
pub fn shuffle_take<T>(items: Vec<T>, limit: usize) -> Vec<T> {
    let mut items = shuffled(items);
    items.truncate(limit);
    items
}

/// Truncate to `max_chars` characters, trimming and appending `...` when cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim())
}

/// Format seconds as `m:ss`, `0:00` when unknown
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        Some(s) if s > 0 => format!("{}:{:02}", s / 60, s % 60),
        _ => "0:00".to_string(),
    }
}

/// `ceil(total / parts)`, never less than one
pub fn per_part(total: usize, parts: usize) -> usize {
    if parts == 0 {
        return total.max(1);
    }
    total.div_ceil(parts).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let items = vec![("track", 1, "a"), ("album", 1, "b"), ("track", 1, "c"), ("track", 2, "d")];
        let out = dedup_by_key(items, |(t, id, _)| (*t, *id));
        let labels: Vec<_> = out.iter().map(|(_, _, l)| *l).collect();
        assert_eq!(labels, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let input: Vec<u32> = (0..50).collect();
        let mut out = shuffled(input.clone());
        assert_eq!(out.len(), input.len());
        out.sort();
        assert_eq!(out, input);
    }

    #[test]
    fn test_shuffle_take_limits() {
        assert_eq!(shuffle_take(vec![1, 2, 3, 4], 2).len(), 2);
        assert_eq!(shuffle_take(vec![1], 5).len(), 1);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("hello world again", 6), "hello...");
        assert_eq!(truncate_text("", 5), "");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(225)), "3:45");
        assert_eq!(format_duration(Some(61)), "1:01");
        assert_eq!(format_duration(None), "0:00");
        assert_eq!(format_duration(Some(0)), "0:00");
    }

    #[test]
    fn test_per_part() {
        assert_eq!(per_part(12, 3), 4);
        assert_eq!(per_part(8, 3), 3);
        assert_eq!(per_part(12, 2), 6);
        assert_eq!(per_part(0, 3), 1);
    }
}
