// Label-anchored name extraction over normalized, line-oriented OCR text.
//
// Identity cards print "ADI" / "SOYADI" labels with the values on the lines
// below; forms print a single "AD SOYAD" label with the value on the same or
// the next line. The rules themselves live in `models::rules`.

use crate::models::rules::{classify, LabelKind, LabelRule, Lookahead};
use crate::models::{TraceEvent, TraceStage};
use crate::processing::name_cleaner;
use crate::processing::normalize::normalize;
use log::debug;
use serde::Serialize;

/// Where a name block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    /// Combined "AD SOYAD" label, 0-based line of the label.
    FullNameLabel { line: usize },
    /// Separate given-name and surname labels.
    SplitLabels,
}

/// Candidate name string; empty when nothing was found.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NameBlock {
    pub value: String,
    pub source: Option<NameSource>,
    #[serde(skip)]
    pub trace: Vec<TraceEvent>,
}

impl NameBlock {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

fn prepare(line: &str) -> String {
    normalize(line.trim()).to_uppercase()
}

/// Runs a rule's lookahead over the lines after `label_index`. A line that
/// carries a label of its own closes the window.
fn look_ahead(rule: &LabelRule, lines: &[&str], label_index: usize) -> Option<String> {
    let window = rule.lookahead.window();
    let mut parts: Vec<String> = Vec::new();

    for raw in lines.iter().skip(label_index + 1).take(window) {
        let line = prepare(raw);
        if classify(&line).is_some() {
            break;
        }
        if !rule.filter.accepts(&line) {
            continue;
        }
        let words = line.split_whitespace().count();
        parts.push(line);
        match rule.lookahead {
            Lookahead::FirstMatch { .. } => break,
            Lookahead::Accumulate { stop_words, .. } if words >= stop_words => break,
            Lookahead::Accumulate { .. } => {}
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn cleaned_or_empty(candidate: &str) -> String {
    name_cleaner::clean(candidate)
        .map(|name| name.as_str().to_string())
        .unwrap_or_default()
}

/// Finds the person's name in `text` by label rules, first label in document
/// order winning. A combined full-name label ends the scan immediately unless
/// a given name or surname was already captured above it.
pub fn extract_name_block(text: &str) -> NameBlock {
    let lines: Vec<&str> = text.lines().collect();
    let mut given: Option<String> = None;
    let mut surname: Option<String> = None;
    let mut trace = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = prepare(raw);
        let Some(rule) = classify(&line) else {
            continue;
        };

        match rule.kind {
            LabelKind::FullName => {
                if given.is_some() || surname.is_some() {
                    trace.push(TraceEvent::new(
                        TraceStage::NameBlock,
                        format!("line {}: full-name label ignored, split labels came first", i),
                    ));
                    continue;
                }
                let found = match rule.same_line_value(&line) {
                    Some(value) => Some(value),
                    // The next line keeps its original case; the cleaner upper-cases.
                    None => lines.get(i + 1).and_then(|next| {
                        let next = normalize(next.trim());
                        rule.filter.accepts(&next.to_uppercase()).then_some(next)
                    }),
                };
                if let Some(value) = found {
                    debug!("Full-name label on line {}: {}", i, value);
                    trace.push(TraceEvent::new(
                        TraceStage::NameBlock,
                        format!("line {}: full-name label value {:?}", i, value),
                    ));
                    return NameBlock {
                        value: cleaned_or_empty(&value),
                        source: Some(NameSource::FullNameLabel { line: i }),
                        trace,
                    };
                }
            }
            LabelKind::GivenName | LabelKind::Surname => {
                let slot = if rule.kind == LabelKind::GivenName {
                    &mut given
                } else {
                    &mut surname
                };
                if slot.is_some() {
                    continue;
                }
                let value = rule
                    .same_line_value(&line)
                    .or_else(|| look_ahead(rule, &lines, i));
                if let Some(value) = value {
                    debug!("{:?} label on line {}: {}", rule.kind, i, value);
                    trace.push(TraceEvent::new(
                        TraceStage::NameBlock,
                        format!("line {}: {:?} {:?}", i, rule.kind, value),
                    ));
                    *slot = Some(value);
                }
            }
        }
    }

    let full_name = format!(
        "{} {}",
        given.as_deref().unwrap_or(""),
        surname.as_deref().unwrap_or("")
    );
    let full_name = full_name.trim();

    if full_name.split_whitespace().count() < 2 {
        trace.push(TraceEvent::new(TraceStage::NameBlock, "no name block found"));
        return NameBlock {
            trace,
            ..NameBlock::default()
        };
    }

    NameBlock {
        value: cleaned_or_empty(full_name),
        source: Some(NameSource::SplitLabels),
        trace,
    }
}
