// Canonical form for recognized text before any field is looked up.

use unicode_normalization::UnicodeNormalization;

/// Glyphs the recognizer is known to confuse on Turkish documents.
pub const MISREAD_SUBSTITUTIONS: &[(char, char)] = &[('Ø', 'Ö'), ('€', 'E')];

/// NFC-composes `raw` and fixes known misreads. Composition runs again after
/// the substitutions so a replaced base letter followed by a combining mark
/// ends up composed, which keeps the function idempotent.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let substituted: String = raw
        .nfc()
        .map(|c| {
            MISREAD_SUBSTITUTIONS
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect();

    substituted.nfc().collect()
}
