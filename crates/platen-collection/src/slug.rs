//! URL slugs for machine pages.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Generate a filesystem- and URL-safe slug.
///
/// Lowercases the text, strips everything that is not a word character,
/// whitespace or hyphen, trims the ends, and turns spaces and underscores
/// into hyphens.
///
/// # Examples
///
/// ```
/// use platen_collection::slugify;
///
/// assert_eq!(slugify("Smith Corona"), "smith-corona");
/// assert_eq!(slugify("No. 5"), "no-5");
/// assert_eq!(slugify("SM_3"), "sm-3");
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    NON_WORD
        .replace_all(&lowered, "")
        .trim()
        .replace(' ', "-")
        .replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Royal"), "royal");
        assert_eq!(slugify("Quiet De Luxe"), "quiet-de-luxe");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("No. 5"), "no-5");
        assert_eq!(slugify("Esquire/Bruxelles"), "esquirebruxelles");
        assert_eq!(slugify("#1,234"), "1234");
    }

    #[test]
    fn test_slugify_keeps_hyphens_and_maps_underscores() {
        assert_eq!(slugify("A-77"), "a-77");
        assert_eq!(slugify("model_x"), "model-x");
    }

    #[test]
    fn test_slugify_only_punctuation_is_empty() {
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_slugify_unicode_word_characters() {
        assert_eq!(slugify("Olympia Plana"), "olympia-plana");
        assert_eq!(slugify("Mignon Modell 4"), "mignon-modell-4");
        assert_eq!(slugify("Erika Größe"), "erika-größe");
    }
}
