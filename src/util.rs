//! Shared utility functions

/// Shorten `s` to at most `max_chars` characters for log and console display,
/// ending with "..." when anything was cut.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_are_unchanged() {
        assert_eq!(truncate_str("How do I pay?", 80), "How do I pay?");
    }

    #[test]
    fn long_strings_end_with_ellipsis() {
        assert_eq!(truncate_str("How long does a transfer take?", 10), "How lon...");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(truncate_str("Überweisung dauert", 8), "Überw...");
    }
}
