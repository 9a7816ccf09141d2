//! Potential symbol normalization.

/// Symbol shown before the user edits it.
pub const DEFAULT_SYMBOL: &str = "J";

const MAX_SYMBOL_CHARS: usize = 2;

/// Trim, keep the first two characters, uppercase.
///
/// Returns `None` for blank input; the caller keeps its previous symbol.
/// Uppercasing can expand a character ("ß" -> "SS"), so the result is cut
/// back to two characters afterwards.
pub fn normalize_symbol(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let head: String = trimmed.chars().take(MAX_SYMBOL_CHARS).collect();
    Some(head.to_uppercase().chars().take(MAX_SYMBOL_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_and_uppercases() {
        assert_eq!(normalize_symbol("abc").as_deref(), Some("AB"));
        assert_eq!(normalize_symbol("  x ").as_deref(), Some("X"));
        assert_eq!(normalize_symbol("é1").as_deref(), Some("É1"));
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(normalize_symbol(""), None);
        assert_eq!(normalize_symbol("   "), None);
        assert_eq!(normalize_symbol("\t\n"), None);
    }

    #[test]
    fn test_expanding_uppercase_stays_two_chars() {
        assert_eq!(normalize_symbol("ßß").as_deref(), Some("SS"));
    }
}
