use crate::models::{MatchResult, NationalIdNumber, PersonName, TraceEvent, TraceStage};
use log::{debug, info};
use rapidfuzz::distance::indel;
use std::collections::BTreeSet;

pub const DEFAULT_MIN_NAME_SIMILARITY: u8 = 80;

/// Decides whether two documents carry the same name and national ID.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    pub min_name_similarity: u8,
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher {
            min_name_similarity: DEFAULT_MIN_NAME_SIMILARITY,
        }
    }
}

impl Matcher {
    pub fn new(min_name_similarity: u8) -> Self {
        Matcher {
            min_name_similarity,
        }
    }

    /// Missing names compare as empty strings. The IDs must both be present
    /// and equal; whether either passes its checksum does not matter here.
    pub fn compare(
        &self,
        name_a: Option<&PersonName>,
        name_b: Option<&PersonName>,
        id_a: Option<&NationalIdNumber>,
        id_b: Option<&NationalIdNumber>,
    ) -> MatchResult {
        self.compare_with_trace(name_a, name_b, id_a, id_b).0
    }

    pub fn compare_with_trace(
        &self,
        name_a: Option<&PersonName>,
        name_b: Option<&PersonName>,
        id_a: Option<&NationalIdNumber>,
        id_b: Option<&NationalIdNumber>,
    ) -> (MatchResult, Vec<TraceEvent>) {
        debug!("Comparing names {:?} / {:?}, ids {:?} / {:?}", name_a, name_b, id_a, id_b);

        let name_similarity = token_set_ratio(
            name_a.map_or("", PersonName::as_str),
            name_b.map_or("", PersonName::as_str),
        );
        let id_match = matches!((id_a, id_b), (Some(a), Some(b)) if a == b);
        let is_valid = name_similarity >= self.min_name_similarity && id_match;

        info!(
            "Match result: name similarity {}, id match {}, valid {}",
            name_similarity, id_match, is_valid
        );

        let trace = vec![
            TraceEvent::new(
                TraceStage::Match,
                format!(
                    "name similarity {} (threshold {})",
                    name_similarity, self.min_name_similarity
                ),
            ),
            TraceEvent::new(
                TraceStage::Match,
                match (id_a, id_b) {
                    (Some(_), Some(_)) if id_match => "ids equal".to_string(),
                    (Some(a), Some(b)) => format!("ids differ: {} / {}", a, b),
                    _ => "id missing on at least one document".to_string(),
                },
            ),
        ];

        (
            MatchResult {
                name_similarity,
                id_match,
                is_valid,
            },
            trace,
        )
    }
}

/// Indel similarity in 0..=100, truncated toward zero.
fn ratio(a: &str, b: &str) -> u8 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100;
    }
    let distance = indel::distance(a.chars(), b.chars());
    (100 * (total - distance) / total) as u8
}

fn joined(tokens: &BTreeSet<&str>) -> String {
    tokens.iter().copied().collect::<Vec<_>>().join(" ")
}

/// Order- and duplicate-insensitive fuzzy similarity of two token strings.
///
/// Shared tokens are sorted into an intersection string; each side's leftover
/// tokens are appended to it, and the best of the three pairwise ratios wins.
/// Either side empty scores 0; one token set containing the other scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let shared: BTreeSet<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: BTreeSet<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: BTreeSet<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100;
    }

    let sect = joined(&shared);
    let with = |rest: &BTreeSet<&str>| {
        if sect.is_empty() {
            joined(rest)
        } else {
            format!("{} {}", sect, joined(rest))
        }
    };
    let combined_a = with(&only_a);
    let combined_b = with(&only_b);

    let mut best = ratio(&combined_a, &combined_b);
    if !sect.is_empty() {
        best = best
            .max(ratio(&sect, &combined_a))
            .max(ratio(&sect, &combined_b));
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::name_cleaner::clean;
    use proptest::prelude::*;

    fn name(s: &str) -> PersonName {
        clean(s).unwrap()
    }

    fn id(s: &str) -> NationalIdNumber {
        NationalIdNumber::parse(s).unwrap()
    }

    #[test]
    fn test_token_set_ratio_ignores_order_and_duplicates() {
        assert_eq!(token_set_ratio("MEHMET YILMAZ", "YILMAZ MEHMET"), 100);
        assert_eq!(token_set_ratio("MEHMET YILMAZ", "MEHMET MEHMET YILMAZ"), 100);
    }

    #[test]
    fn test_token_set_ratio_subset_is_full_match() {
        assert_eq!(token_set_ratio("ALİ CAN KARACA", "ALİ KARACA"), 100);
    }

    #[test]
    fn test_token_set_ratio_empty_sides() {
        assert_eq!(token_set_ratio("", "MEHMET YILMAZ"), 0);
        assert_eq!(token_set_ratio("MEHMET YILMAZ", ""), 0);
        assert_eq!(token_set_ratio("", ""), 0);
    }

    #[test]
    fn test_token_set_ratio_partial_overlap() {
        // 26 chars in total, indel distance 4: 100 * 22 / 26
        assert_eq!(token_set_ratio("MEHMET YILMAZ", "MEHMET YILDIZ"), 84);
        assert!(token_set_ratio("AHMET KAYA", "MEHMET YILMAZ") < 80);
    }

    #[test]
    fn test_ratio_basics() {
        assert_eq!(ratio("ABC", "ABC"), 100);
        assert_eq!(ratio("ABC", "XYZ"), 0);
        assert_eq!(ratio("ABCD", "ABCE"), 75);
        // Counted in characters, not UTF-8 bytes: LCS "KR" over 10 chars.
        assert_eq!(ratio("ŞÜKRÜ", "SUKRU"), 40);
    }

    #[test]
    fn test_compare_valid() {
        let result = Matcher::default().compare(
            Some(&name("MEHMET YILMAZ")),
            Some(&name("MEHMET YILMAZ")),
            Some(&id("12345678901")),
            Some(&id("12345678901")),
        );
        assert_eq!(
            result,
            MatchResult {
                name_similarity: 100,
                id_match: true,
                is_valid: true
            }
        );
    }

    #[test]
    fn test_compare_id_mismatch() {
        let result = Matcher::default().compare(
            Some(&name("MEHMET YILMAZ")),
            Some(&name("MEHMET YILMAZ")),
            Some(&id("12345678901")),
            Some(&id("10987654321")),
        );
        assert_eq!(result.name_similarity, 100);
        assert!(!result.id_match);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_compare_missing_values() {
        let result = Matcher::default().compare(None, Some(&name("MEHMET YILMAZ")), None, None);
        assert_eq!(result.name_similarity, 0);
        assert!(!result.id_match);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_compare_threshold_is_inclusive() {
        let result = Matcher::new(84).compare(
            Some(&name("MEHMET YILMAZ")),
            Some(&name("MEHMET YILDIZ")),
            Some(&id("12345678950")),
            Some(&id("12345678950")),
        );
        assert_eq!(result.name_similarity, 84);
        assert!(result.is_valid);
        assert!(!Matcher::new(85)
            .compare(
                Some(&name("MEHMET YILMAZ")),
                Some(&name("MEHMET YILDIZ")),
                Some(&id("12345678950")),
                Some(&id("12345678950")),
            )
            .is_valid);
    }

    #[test]
    fn test_compare_with_trace_reports_match_stage() {
        let (result, trace) = Matcher::default().compare_with_trace(
            Some(&name("MEHMET YILMAZ")),
            Some(&name("MEHMET YILMAZ")),
            Some(&id("12345678901")),
            Some(&id("10987654321")),
        );
        assert!(!result.is_valid);
        assert!(trace.iter().all(|event| event.stage == TraceStage::Match));
        assert!(trace.iter().any(|event| event.detail == "name similarity 100 (threshold 80)"));
        assert!(trace
            .iter()
            .any(|event| event.detail == "ids differ: 12345678901 / 10987654321"));
    }

    proptest! {
        #[test]
        fn verdict_is_the_conjunction_of_sub_scores(
            a in "[A-Z]{2,6} [A-Z]{2,6}( [A-Z]{2,6})?",
            b in "[A-Z]{2,6} [A-Z]{2,6}( [A-Z]{2,6})?",
            same_id in any::<bool>(),
            threshold in 0u8..=100
        ) {
            let first = id("12345678950");
            let second = if same_id { id("12345678950") } else { id("10000000146") };
            let result = Matcher::new(threshold).compare(
                clean(&a).as_ref(),
                clean(&b).as_ref(),
                Some(&first),
                Some(&second),
            );
            prop_assert_eq!(result.id_match, same_id);
            prop_assert_eq!(
                result.is_valid,
                result.name_similarity >= threshold && result.id_match
            );
            prop_assert!(result.name_similarity <= 100);
        }

        #[test]
        fn token_set_ratio_is_symmetric(
            a in "[A-Z]{1,5}( [A-Z]{1,5}){0,3}",
            b in "[A-Z]{1,5}( [A-Z]{1,5}){0,3}"
        ) {
            prop_assert_eq!(token_set_ratio(&a, &b), token_set_ratio(&b, &a));
        }
    }
}
