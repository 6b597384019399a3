use crate::models::RawLine;
use crate::processing::upload::extension_of;
use crate::utils::IdentityError;
use std::fs;
use std::path::Path;

#[cfg(feature = "tesseract")]
use tesseract::Tesseract;

/// Turns document image bytes into recognized lines in reading order.
/// Implementations report only text and confidence, never geometry.
pub trait TextRecognizer {
    fn recognize(&self, image: &[u8]) -> Result<Vec<RawLine>, IdentityError>;
}

/// Extensions read as already-recognized line files rather than images.
pub const LINE_FILE_EXTENSIONS: &[&str] = &[".json", ".txt", ".tsv"];

pub fn is_line_file(path: &Path) -> bool {
    LINE_FILE_EXTENSIONS.contains(&extension_of(path).as_str())
}

fn check_confidence(line: usize, confidence: f32) -> Result<(), IdentityError> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(IdentityError::LineFile {
            line,
            message: format!("confidence {} outside 0..=1", confidence),
        })
    }
}

/// Parses plain recognized text: one line per row, optionally followed by a
/// tab and the line's confidence (1.0 when absent). A row whose last tab is
/// not followed by a number is all text. Blank rows are skipped.
pub fn parse_lines(text: &str) -> Result<Vec<RawLine>, IdentityError> {
    let mut lines = Vec::new();
    for (index, row) in text.lines().enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let scored = row
            .rsplit_once('\t')
            .and_then(|(text, confidence)| Some((text, confidence.trim().parse::<f32>().ok()?)));
        let line = match scored {
            Some((text, confidence)) => {
                check_confidence(index + 1, confidence)?;
                RawLine::new(text.trim(), confidence)
            }
            None => RawLine::new(row.trim(), 1.0),
        };
        lines.push(line);
    }
    Ok(lines)
}

/// Reads a `.json` array of `{text, confidence}` objects or a plain text
/// line file (see `parse_lines`).
pub fn read_lines_file(path: &Path) -> Result<Vec<RawLine>, IdentityError> {
    let content = fs::read_to_string(path).map_err(|e| IdentityError::io(path, e))?;
    if extension_of(path) == ".json" {
        let lines: Vec<RawLine> = serde_json::from_str(&content)?;
        for (index, line) in lines.iter().enumerate() {
            check_confidence(index + 1, line.confidence)?;
        }
        Ok(lines)
    } else {
        parse_lines(&content)
    }
}

/// Tesseract-backed recognizer. The image is converted to grayscale and
/// handed to Tesseract through a temporary file; every output line gets the
/// page's mean confidence since Tesseract's text API does not expose
/// per-line scores.
#[cfg(feature = "tesseract")]
pub struct TesseractRecognizer {
    languages: String,
}

#[cfg(feature = "tesseract")]
impl TesseractRecognizer {
    pub fn new(languages: impl Into<String>) -> Self {
        TesseractRecognizer {
            languages: languages.into(),
        }
    }
}

#[cfg(feature = "tesseract")]
impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &[u8]) -> Result<Vec<RawLine>, IdentityError> {
        let gray = image::load_from_memory(image)
            .map_err(|e| IdentityError::Recognition(format!("Failed to decode image: {}", e)))?
            .grayscale();

        let temp_file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .map_err(|e| IdentityError::Recognition(format!("Failed to create temp file: {}", e)))?;
        gray.save(temp_file.path())
            .map_err(|e| IdentityError::Recognition(format!("Failed to write temp file: {}", e)))?;

        let image_path_str = temp_file
            .path()
            .to_str()
            .ok_or_else(|| IdentityError::Recognition("Failed to convert path to string".to_string()))?;

        let mut tess = Tesseract::new(None, Some(&self.languages))
            .map_err(|e| IdentityError::Recognition(format!("Tesseract init error: {}", e)))?
            .set_image(image_path_str)
            .map_err(|e| IdentityError::Recognition(format!("Tesseract set image error: {}", e)))?;

        let text = tess
            .get_text()
            .map_err(|e| IdentityError::Recognition(format!("Tesseract error: {}", e)))?;
        let confidence = (tess.mean_text_conf() as f32 / 100.0).clamp(0.0, 1.0);

        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| RawLine::new(line, confidence))
            .collect())
    }
}
