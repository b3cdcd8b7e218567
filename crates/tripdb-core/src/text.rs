// crates/tripdb-core/src/text.rs

//! Text folding shared by every backend.
//!
//! The in-memory catalog calls these helpers directly, and the SQLite
//! adapter registers [`fold_key`] as the `casefold()` scalar function, so a
//! comparison folds the same way no matter which backend answers it.

/// Folds a string into its case-insensitive comparison key.
///
/// Folding is Unicode lowercasing; accents are kept.
///
/// # Examples
///
/// ```rust
/// use tripdb_core::text::fold_key;
///
/// assert_eq!(fold_key("PARIS"), "paris");
/// assert_eq!(fold_key("Zürich"), "zürich");
/// ```
pub fn fold_key(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive equality.
///
/// ```rust
/// use tripdb_core::text::equals_folded;
///
/// assert!(equals_folded("Paris", "paris"));
/// assert!(!equals_folded("Paris", "Par"));
/// ```
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Case-insensitive substring test: does `haystack` contain `needle`?
///
/// An empty needle matches everything.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold_key(haystack).contains(&fold_key(needle))
}

/// Escapes `%`, `_` and `\` so `term` is matched literally by
/// `LIKE ... ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Builds a folded `%term%` pattern for substring matching with `LIKE`.
pub fn like_pattern(term: &str) -> String {
    format!("%{}%", escape_like(&fold_key(term)))
}

/// Normalizes an optional text filter: blank means "not given".
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Name-based matching for records that expose a canonical display name.
///
/// # Examples
/// ```rust
/// use tripdb_core::text::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Kyoto").is_named("KYOTO"));
/// assert!(Place("Reykjavík").name_contains("REYKJ"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    /// Case-insensitive exact name comparison.
    #[inline]
    fn is_named(&self, q: &str) -> bool {
        equals_folded(self.name_str(), q)
    }

    /// Case-insensitive substring match on the name.
    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        contains_folded(self.name_str(), q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("C:\\"), "%c:\\\\%");
        assert_eq!(like_pattern("Rome"), "%rome%");
    }

    #[test]
    fn blank_filters_collapse_to_none() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" Italy ")), Some("Italy"));
    }

    #[test]
    fn empty_needle_matches_anything() {
        assert!(contains_folded("Lisbon", ""));
        assert!(contains_folded("", ""));
    }

    #[test]
    fn folding_handles_non_ascii_case() {
        assert!(equals_folded("ÖSTERREICH", "österreich"));
        assert!(contains_folded("São Paulo", "SÃO"));
    }
}
