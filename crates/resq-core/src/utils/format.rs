use std::cmp::Ordering;

/// Case-insensitive substring test.
/// `needle_lower` must already be lowercased; callers lowercase the query once per search.
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(needle_lower)
}

/// Order record ids naturally: numeric ids by value, then everything else lexically.
/// Keeps "2" ahead of "10" so cached and bundled data list in the same order.
pub fn cmp_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Police Control Room", "polic"));
        assert!(contains_ignore_case("Police Control Room", "room"));
        assert!(!contains_ignore_case("Police Control Room", "ambulance"));
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_cmp_ids_numeric() {
        assert_eq!(cmp_ids("2", "10"), Ordering::Less);
        assert_eq!(cmp_ids("10", "10"), Ordering::Equal);
        assert_eq!(cmp_ids("20", "3"), Ordering::Greater);
    }

    #[test]
    fn test_cmp_ids_mixed() {
        assert_eq!(cmp_ids("5", "abc"), Ordering::Less);
        assert_eq!(cmp_ids("abc", "5"), Ordering::Greater);
        assert_eq!(cmp_ids("abc", "abd"), Ordering::Less);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Crèche facilities", 6), "Crè...");
    }
}
