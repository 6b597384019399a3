use crate::config::Settings;
use crate::models::{
    ChecksumFlags, ExtractedFields, MatchScores, RawLine, TraceEvent, TraceStage, ValidationReport,
};
use crate::processing::document;
use crate::processing::ocr::{is_line_file, read_lines_file, TextRecognizer};
use crate::processing::upload::check_upload;
use crate::utils::IdentityError;
use crate::validation::national_id::{check_id, IdCheck};
use crate::validation::Matcher;
use log::{info, warn};
use std::fs;
use std::path::Path;

pub const CONSISTENT_MESSAGE: &str = "Ad-Soyad ve TCKN tutarlı.";
pub const MISMATCH_MESSAGE: &str = "Eşleşme başarısız. Lütfen belgeleri kontrol edin.";

/// Cross-checks an identity card (document A) against a signed form
/// (document B).
pub struct IdentityValidator {
    settings: Settings,
    matcher: Matcher,
}

fn checksum_flag(label: &str, fields: &ExtractedFields, trace: &mut Vec<TraceEvent>) -> Option<bool> {
    fields.id.as_ref().map(|id| {
        let check = check_id(id.as_str());
        if let IdCheck::Invalid(reason) = check {
            warn!("{} id {} fails the checksum: {:?}", label, id, reason);
        }
        trace.push(TraceEvent::new(
            TraceStage::Checksum,
            format!("{}: id {} {:?}", label, id, check),
        ));
        check.is_valid()
    })
}

fn labelled(label: &str, events: Vec<TraceEvent>) -> impl Iterator<Item = TraceEvent> + '_ {
    events
        .into_iter()
        .map(move |event| TraceEvent::new(event.stage, format!("{}: {}", label, event.detail)))
}

impl IdentityValidator {
    pub fn new(settings: Settings) -> Self {
        let matcher = Matcher::new(settings.min_name_similarity);
        IdentityValidator { settings, matcher }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extracts both documents and compares them. Never fails; missing
    /// fields simply lower the verdict.
    pub fn validate_lines(&self, id_lines: &[RawLine], form_lines: &[RawLine]) -> ValidationReport {
        let extraction_a = document::extract_with_trace(id_lines);
        let extraction_b = document::extract_with_trace(form_lines);
        let document_a = extraction_a.fields;
        let document_b = extraction_b.fields;
        info!(
            "Identity card: name {:?}, id {:?}; form: name {:?}, id {:?}",
            document_a.name, document_a.id, document_b.name, document_b.id
        );

        let mut trace: Vec<TraceEvent> = labelled("identity card", extraction_a.trace)
            .chain(labelled("form", extraction_b.trace))
            .collect();

        // Diagnostic only; a bad checksum never rejects the pair.
        let checksum = ChecksumFlags {
            document_a: checksum_flag("identity card", &document_a, &mut trace),
            document_b: checksum_flag("form", &document_b, &mut trace),
        };

        let (result, match_trace) = self.matcher.compare_with_trace(
            document_a.name.as_ref(),
            document_b.name.as_ref(),
            document_a.id.as_ref(),
            document_b.id.as_ref(),
        );
        trace.extend(match_trace);

        let message = if result.is_valid {
            CONSISTENT_MESSAGE
        } else {
            MISMATCH_MESSAGE
        };

        ValidationReport {
            is_valid: result.is_valid,
            message: message.to_string(),
            scores: MatchScores {
                name_similarity: result.name_similarity,
                tckn_match: result.id_match,
                ocr_confidence_hint: document_a.confidence.max(document_b.confidence),
            },
            document_a,
            document_b,
            checksum,
            trace,
        }
    }

    /// Loads one document's lines. Line files (`.json`, `.txt`, `.tsv`) are
    /// read as-is; anything else must pass the upload checks and goes through
    /// `recognizer`. A recognizer failure degrades to no lines.
    pub fn load_lines(
        &self,
        path: &Path,
        recognizer: Option<&dyn TextRecognizer>,
    ) -> Result<Vec<RawLine>, IdentityError> {
        if is_line_file(path) {
            return read_lines_file(path);
        }

        check_upload(path, &self.settings)?;
        let recognizer = recognizer.ok_or_else(|| IdentityError::RecognizerUnavailable(path.to_path_buf()))?;
        let image = fs::read(path).map_err(|e| IdentityError::io(path, e))?;

        match recognizer.recognize(&image) {
            Ok(lines) => Ok(lines),
            Err(err) => {
                warn!("Recognition failed for {:?}: {}", path, err);
                Ok(Vec::new())
            }
        }
    }

    pub fn validate_files(
        &self,
        id_path: &Path,
        form_path: &Path,
        recognizer: Option<&dyn TextRecognizer>,
    ) -> Result<ValidationReport, IdentityError> {
        let id_lines = self.load_lines(id_path, recognizer)?;
        let form_lines = self.load_lines(form_path, recognizer)?;
        Ok(self.validate_lines(&id_lines, &form_lines))
    }
}

impl Default for IdentityValidator {
    fn default() -> Self {
        IdentityValidator::new(Settings::default())
    }
}
