use crate::models::PersonName;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

pub const MIN_NAME_TOKENS: usize = 2;
// More than four words is usually an address or a sentence, not a name.
pub const MAX_NAME_TOKENS: usize = 4;

lazy_static! {
    static ref MULTI_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
    static ref NON_NAME_CHARS: Regex = Regex::new(r"[^A-ZÇĞİÖŞÜa-zçğıöşü\s\-']").unwrap();
}

/// Turns a raw candidate into a canonical person name, or `None` when fewer
/// than two tokens survive.
pub fn clean(raw: &str) -> Option<PersonName> {
    if raw.trim().is_empty() {
        return None;
    }

    let collapsed = MULTI_SPACE.replace_all(raw.trim(), " ");
    let stripped = NON_NAME_CHARS.replace_all(&collapsed, "");
    let upper = stripped.to_uppercase();

    let mut tokens: Vec<&str> = upper.split_whitespace().collect();
    if tokens.len() > MAX_NAME_TOKENS {
        debug!("Name has more than {} words, truncating: {}", MAX_NAME_TOKENS, upper);
        tokens.truncate(MAX_NAME_TOKENS);
    }

    if tokens.len() < MIN_NAME_TOKENS {
        debug!("Name too short after cleaning: {:?}", upper);
        return None;
    }

    Some(PersonName::from_tokens(&tokens))
}

/// `clean` for an optional candidate.
pub fn clean_person_name(raw: Option<&str>) -> Option<PersonName> {
    raw.and_then(clean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_name_char(c: char) -> bool {
        c.is_ascii_uppercase() || "ÇĞİÖŞÜ-' ".contains(c)
    }

    #[test]
    fn test_cleans_and_uppercases() {
        let name = clean("  Ali   Karaca ").unwrap();
        assert_eq!(name.as_str(), "ALI KARACA");
    }

    #[test]
    fn test_keeps_turkish_letters() {
        let name = clean("şükrü öztürk").unwrap();
        assert_eq!(name.as_str(), "ŞÜKRÜ ÖZTÜRK");
    }

    #[test]
    fn test_strips_punctuation_and_digits() {
        let name = clean("MEHMET, YILMAZ. 1990").unwrap();
        assert_eq!(name.as_str(), "MEHMET YILMAZ");
    }

    #[test]
    fn test_keeps_hyphen_and_apostrophe() {
        let name = clean("ayşe nur o'neil-kaya").unwrap();
        assert_eq!(name.as_str(), "AYŞE NUR O'NEIL-KAYA");
    }

    #[test]
    fn test_truncates_to_four_tokens() {
        let name = clean("AHMET CAN EMRE BURAK YILMAZ").unwrap();
        assert_eq!(name.as_str(), "AHMET CAN EMRE BURAK");
        assert_eq!(name.tokens().count(), 4);
    }

    #[test]
    fn test_rejects_single_token() {
        assert!(clean("MEHMET").is_none());
        assert!(clean("MEHMET 12345").is_none());
    }

    #[test]
    fn test_empty_and_missing_input() {
        assert!(clean("").is_none());
        assert!(clean("   ").is_none());
        assert!(clean_person_name(None).is_none());
        assert_eq!(
            clean_person_name(Some("ali veli")).map(|n| n.to_string()),
            Some("ALI VELI".to_string())
        );
    }

    proptest! {
        #[test]
        fn cleaned_names_respect_token_bounds_and_alphabet(input in "\\PC{0,60}") {
            if let Some(name) = clean(&input) {
                let count = name.tokens().count();
                prop_assert!((MIN_NAME_TOKENS..=MAX_NAME_TOKENS).contains(&count));
                prop_assert!(name.as_str().chars().all(is_name_char));
            }
        }

        #[test]
        fn cleaning_a_clean_name_is_stable(input in "[a-zA-ZçğıöşüÇĞİÖŞÜ ]{0,40}") {
            if let Some(name) = clean(&input) {
                prop_assert_eq!(clean(name.as_str()), Some(name));
            }
        }
    }
}
