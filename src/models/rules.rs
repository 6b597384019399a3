use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Which field a label anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    GivenName,
    Surname,
    FullName,
}

/// How the lines following a label are searched when the label line itself
/// carries no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// Collect every accepted line in the window, stopping early once an
    /// accepted line has at least `stop_words` words.
    Accumulate { window: usize, stop_words: usize },
    /// Take the first accepted line in the window.
    FirstMatch { window: usize },
}

impl Lookahead {
    pub fn window(&self) -> usize {
        match *self {
            Lookahead::Accumulate { window, .. } | Lookahead::FirstMatch { window } => window,
        }
    }
}

/// Shape a lookahead line must have to count as a value.
#[derive(Debug, Clone)]
pub struct LineFilter {
    pub min_words: usize,
    pub max_words: Option<usize>,
    pub max_chars: Option<usize>,
    pub reject_parentheses: bool,
    /// Substrings that mark a line as layout boilerplate.
    pub exclusions: &'static [&'static str],
    /// Whole-line values that are boilerplate.
    pub artifacts: &'static [&'static str],
}

impl LineFilter {
    /// `line` is expected trimmed, normalized and upper-cased.
    pub fn accepts(&self, line: &str) -> bool {
        if line.is_empty() || line.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        let words = line.split_whitespace().count();
        if words < self.min_words || self.max_words.map_or(false, |max| words > max) {
            return false;
        }
        if self.max_chars.map_or(false, |max| line.chars().count() > max) {
            return false;
        }
        if self.reject_parentheses && (line.contains('(') || line.contains(')')) {
            return false;
        }
        if self.exclusions.iter().any(|word| line.contains(word)) {
            return false;
        }
        !self.artifacts.contains(&line)
    }
}

/// One row of the label table: how to spot the label, how to read a value on
/// the same line, and how to look for it on the following lines.
#[derive(Debug)]
pub struct LabelRule {
    pub kind: LabelKind,
    pub label: Regex,
    /// Lines matching this carry a more specific label and are not ours.
    pub excluded_by: Option<Regex>,
    /// Same-line value in capture group 1.
    pub capture: Regex,
    /// Same-line values rejected as boilerplate.
    pub artifacts: &'static [&'static str],
    pub lookahead: Lookahead,
    pub filter: LineFilter,
    /// A value found by this rule ends the whole scan.
    pub short_circuit: bool,
}

impl LabelRule {
    pub fn matches(&self, line: &str) -> bool {
        self.label.is_match(line)
            && !self
                .excluded_by
                .as_ref()
                .map_or(false, |other| other.is_match(line))
    }

    /// Alphabetic run after the label on the same line, if any.
    pub fn same_line_value(&self, line: &str) -> Option<String> {
        let captured = self.capture.captures(line)?.get(1)?.as_str().trim();
        if captured.is_empty() || self.artifacts.contains(&captured) {
            return None;
        }
        Some(captured.to_string())
    }
}

const GIVEN_LABEL: &str = r"\bAD[Iİ]\b";
const SURNAME_LABEL: &str = r"\bSOYAD[Iİ]?\b";
// Tolerates the common "SOVAD" misread and a glued or hyphenated form.
const FULL_NAME_LABEL: &str = r"\bAD[Iİ]?[\s\-]*SO[YV]AD[Iİ]?\b";
const VALUE_RUN: &str = r"\s*[:\-]?\s*([A-ZÇĞİÖŞÜ ]+)";

pub const GIVEN_NAME_EXCLUSIONS: &[&str] = &[
    "GIVEN", "NAME", "SURNAME", "SOYAD", "TARIHI", "TARİHİ", "DOĞUM", "BIRTH", "CINSIYETI",
    "CİNSİYETİ", "DATE", "GENDER", "ANKARA",
];

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("label pattern compiles")
}

lazy_static! {
    /// Ordered label table: given name, surname, combined full name.
    pub static ref LABEL_RULES: Vec<LabelRule> = vec![
        LabelRule {
            kind: LabelKind::GivenName,
            label: pattern(GIVEN_LABEL),
            excluded_by: Some(pattern(SURNAME_LABEL)),
            capture: pattern(&format!("{}{}", GIVEN_LABEL, VALUE_RUN)),
            artifacts: &["GIVEN", "GIVEN NAME", "GIVEN NAMES", "NAME", "NAMES"],
            lookahead: Lookahead::Accumulate { window: 3, stop_words: 2 },
            filter: LineFilter {
                min_words: 1,
                max_words: Some(2),
                max_chars: Some(10),
                reject_parentheses: true,
                exclusions: GIVEN_NAME_EXCLUSIONS,
                artifacts: &[],
            },
            short_circuit: false,
        },
        LabelRule {
            kind: LabelKind::Surname,
            label: pattern(SURNAME_LABEL),
            excluded_by: Some(pattern(FULL_NAME_LABEL)),
            capture: pattern(&format!("{}{}", SURNAME_LABEL, VALUE_RUN)),
            artifacts: &["SURNAME"],
            lookahead: Lookahead::FirstMatch { window: 3 },
            filter: LineFilter {
                min_words: 1,
                max_words: Some(3),
                max_chars: None,
                reject_parentheses: false,
                exclusions: &[],
                artifacts: &["SURNAME"],
            },
            short_circuit: false,
        },
        LabelRule {
            kind: LabelKind::FullName,
            label: pattern(FULL_NAME_LABEL),
            excluded_by: None,
            capture: pattern(&format!("{}{}", FULL_NAME_LABEL, VALUE_RUN)),
            artifacts: &[],
            lookahead: Lookahead::FirstMatch { window: 1 },
            filter: LineFilter {
                min_words: 2,
                max_words: None,
                max_chars: None,
                reject_parentheses: false,
                exclusions: &[],
                artifacts: &[],
            },
            short_circuit: true,
        },
    ];
}

/// The rule whose label `line` carries, if any.
pub fn classify(line: &str) -> Option<&'static LabelRule> {
    LABEL_RULES.iter().find(|rule| rule.matches(line))
}
