use super::context::resolve_stacked_name;
use super::normalize::normalize_whitespace;
use super::patterns::LinePatterns;
use super::record::{Label, is_usable_name};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawName {
    Inline(String),
    Stacked(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHit {
    pub page_number: usize,
    pub label: Label,
    pub document_number: String,
    pub entity_document_number: Option<String>,
    pub name: RawName,
}

#[derive(Debug)]
pub struct DocumentScanner<'a> {
    patterns: &'a LinePatterns,
    context_window: usize,
    current_entity_number: Option<String>,
}

impl<'a> DocumentScanner<'a> {
    pub fn new(patterns: &'a LinePatterns, context_window: usize) -> Self {
        Self {
            patterns,
            context_window,
            current_entity_number: None,
        }
    }

    pub fn scan_page(&mut self, page_number: usize, lines: &[String]) -> Vec<ScanHit> {
        // a page opens a new report block; an earlier page's CNPJ is never reused
        self.current_entity_number = None;
        let mut hits = Vec::new();

        for (index, raw_line) in lines.iter().enumerate() {
            let Some(matched) = self.patterns.match_line(raw_line) else {
                continue;
            };

            let label = Label::from_marker(matched.label);
            if label == Label::DocumentNumber {
                self.current_entity_number = Some(matched.number.to_string());
            }

            let trailing = matched
                .trailing
                .map(normalize_whitespace)
                .filter(|text| !text.is_empty());

            let name = match trailing {
                Some(text) if is_usable_name(&text) || !label.expects_stacked_name() => {
                    RawName::Inline(text)
                }
                _ if label.expects_stacked_name() => {
                    resolve_stacked_name(lines, index, self.context_window)
                        .map_or(RawName::NotFound, RawName::Stacked)
                }
                _ => continue,
            };

            hits.push(ScanHit {
                page_number,
                label,
                document_number: matched.number.to_string(),
                entity_document_number: self.current_entity_number.clone(),
                name,
            });
        }

        hits
    }
}
