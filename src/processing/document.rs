use crate::models::{DocumentExtraction, ExtractedFields, RawLine, TraceEvent, TraceStage};
use crate::processing::extractors::extract_name_block;
use crate::processing::name_cleaner;
use crate::processing::normalize::normalize;
use crate::validation::national_id::extract_id;
use log::{debug, info, warn};

/// Mean of the per-line confidences, 0.0 for no lines.
pub fn mean_confidence(lines: &[RawLine]) -> f32 {
    if lines.is_empty() {
        return 0.0;
    }
    let total: f64 = lines.iter().map(|line| f64::from(line.confidence)).sum();
    (total / lines.len() as f64) as f32
}

/// Pulls the name and national ID out of one document's recognized lines.
/// Degrades to empty fields instead of failing.
pub fn extract_with_trace(lines: &[RawLine]) -> DocumentExtraction {
    let raw = lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let text = normalize(&raw);
    let mut trace = vec![TraceEvent::new(
        TraceStage::Normalize,
        format!("{} lines, {} characters", lines.len(), text.chars().count()),
    )];

    if text.is_empty() {
        warn!("Recognition returned no text");
        trace.push(TraceEvent::new(TraceStage::Normalize, "empty text, extraction skipped"));
        return DocumentExtraction {
            fields: ExtractedFields::empty(),
            trace,
        };
    }

    let block = extract_name_block(&text);
    info!("Name block: {:?}", block.value);
    trace.extend(block.trace.iter().cloned());

    let name = name_cleaner::clean(block.as_str());
    debug!("Cleaned name: {:?}", name);
    trace.push(TraceEvent::new(
        TraceStage::NameClean,
        match &name {
            Some(name) => format!("name {}", name),
            None => "no name".to_string(),
        },
    ));

    let id = extract_id(&text);
    trace.push(TraceEvent::new(
        TraceStage::NationalId,
        match &id {
            Some(id) => format!("id {}", id),
            None => "no id".to_string(),
        },
    ));

    DocumentExtraction {
        fields: ExtractedFields {
            name,
            id,
            confidence: mean_confidence(lines),
        },
        trace,
    }
}

pub fn extract(lines: &[RawLine]) -> ExtractedFields {
    extract_with_trace(lines).fields
}
