use serde::{Deserialize, Serialize};
use std::fmt;

/// One line reported by the recognition engine, in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub text: String,
    /// Engine-reported confidence in [0, 1]; never recomputed here.
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl RawLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        RawLine {
            text: text.into(),
            confidence,
        }
    }
}

/// Canonical person name: uppercase, 2 to 4 tokens of Turkish letters,
/// hyphens and apostrophes. Only the name cleaner builds these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    pub(crate) fn from_tokens(tokens: &[&str]) -> Self {
        PersonName(tokens.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ')
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Eleven ASCII digits with a non-zero first digit. Having this shape says
/// nothing about the checksum; see `validation::national_id::check_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NationalIdNumber(String);

impl NationalIdNumber {
    pub const LEN: usize = 11;

    /// Accepts only the bare 11-digit shape, without searching or trimming.
    pub fn parse(candidate: &str) -> Option<Self> {
        let bytes = candidate.as_bytes();
        let shaped = bytes.len() == Self::LEN
            && bytes.iter().all(u8::is_ascii_digit)
            && bytes[0] != b'0';
        shaped.then(|| NationalIdNumber(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalIdNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields pulled from one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedFields {
    pub name: Option<PersonName>,
    pub id: Option<NationalIdNumber>,
    /// Mean of the per-line recognition confidences.
    pub confidence: f32,
}

impl ExtractedFields {
    pub fn empty() -> Self {
        ExtractedFields {
            name: None,
            id: None,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub name_similarity: u8,
    pub id_match: bool,
    /// Always `id_match && name_similarity >= threshold`.
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStage {
    Normalize,
    NameBlock,
    NameClean,
    NationalId,
    Checksum,
    Match,
}

/// Diagnostic record attached to a stage's result instead of global output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub stage: TraceStage,
    pub detail: String,
}

impl TraceEvent {
    pub fn new(stage: TraceStage, detail: impl Into<String>) -> Self {
        TraceEvent {
            stage,
            detail: detail.into(),
        }
    }
}

/// Result of running the field extractor over one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentExtraction {
    pub fields: ExtractedFields,
    pub trace: Vec<TraceEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScores {
    pub name_similarity: u8,
    pub tckn_match: bool,
    /// Higher of the two documents' confidences.
    pub ocr_confidence_hint: f32,
}

/// Checksum validity of each extracted id, `None` when no id was found.
/// Reported for diagnostics; the verdict never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecksumFlags {
    pub document_a: Option<bool>,
    pub document_b: Option<bool>,
}

/// What the surrounding API layer receives for one validation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub message: String,
    pub scores: MatchScores,
    /// Identity card.
    pub document_a: ExtractedFields,
    /// Signed form.
    pub document_b: ExtractedFields,
    pub checksum: ChecksumFlags,
    /// Extraction, checksum and match events, in pipeline order. Kept out of
    /// the API payload.
    #[serde(skip)]
    pub trace: Vec<TraceEvent>,
}
