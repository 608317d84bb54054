use serde::Serialize;

use super::config::RetentionPolicy;
use super::normalize::{char_len, format_name, is_date, is_numeric_noise, normalize_whitespace};
use super::scanner::{RawName, ScanHit};

pub const NAME_NOT_FOUND: &str = "Não encontrado";
pub const ENTITY_UNIDENTIFIED: &str = "Não identificado";

const MIN_NAME_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    ResponsibleParty,
    DocumentNumber,
    PersonalId,
    Taxpayer,
    Unlabeled,
}

impl Label {
    pub fn from_marker(marker: Option<&str>) -> Self {
        let Some(marker) = marker else {
            return Label::Unlabeled;
        };

        let lowered = marker.to_lowercase();
        if lowered.contains("respons") {
            Label::ResponsibleParty
        } else if lowered.contains("contribuinte") {
            Label::Taxpayer
        } else if lowered.contains("cnpj") {
            Label::DocumentNumber
        } else if lowered.contains("cpf") {
            Label::PersonalId
        } else {
            Label::Unlabeled
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::ResponsibleParty => "responsible-party",
            Label::DocumentNumber => "document-number",
            Label::PersonalId => "personal-id",
            Label::Taxpayer => "taxpayer",
            Label::Unlabeled => "unlabeled",
        }
    }

    pub fn expects_stacked_name(self) -> bool {
        matches!(self, Label::ResponsibleParty | Label::Taxpayer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CandidateRecord {
    pub source_document: String,
    pub page_number: usize,
    pub label: Label,
    pub document_number: String,
    pub entity_document_number: Option<String>,
    pub entity_name: Option<String>,
    pub extracted_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl CandidateRecord {
    pub fn entity_name_or_sentinel(&self) -> &str {
        self.entity_name.as_deref().unwrap_or(ENTITY_UNIDENTIFIED)
    }
}

#[derive(Debug)]
pub struct RecordBuilder<'a> {
    source_document: &'a str,
    entity_name: Option<&'a str>,
    retention: RetentionPolicy,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(
        source_document: &'a str,
        entity_name: Option<&'a str>,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            source_document,
            entity_name,
            retention,
        }
    }

    pub fn build(&self, hit: ScanHit) -> Option<CandidateRecord> {
        let extracted_name = match hit.name {
            RawName::NotFound => NAME_NOT_FOUND.to_string(),
            RawName::Inline(raw) | RawName::Stacked(raw) => {
                let name = format_name(&normalize_whitespace(&raw));
                if self.retention == RetentionPolicy::Filtered && !is_usable_name(&name) {
                    return None;
                }
                name
            }
        };

        Some(CandidateRecord {
            source_document: self.source_document.to_string(),
            page_number: hit.page_number,
            label: hit.label,
            document_number: hit.document_number,
            entity_document_number: hit.entity_document_number,
            entity_name: self.entity_name.map(ToOwned::to_owned),
            extracted_name,
            score: None,
        })
    }
}

pub fn is_usable_name(name: &str) -> bool {
    char_len(name) >= MIN_NAME_CHARS && !is_numeric_noise(name) && !is_date(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(label: Label, name: RawName) -> ScanHit {
        ScanHit {
            page_number: 2,
            label,
            document_number: "123.456.789-00".to_string(),
            entity_document_number: Some("00.000.000/0000-00".to_string()),
            name,
        }
    }

    #[test]
    fn label_classifies_markers_case_insensitively() {
        assert_eq!(Label::from_marker(Some("RESPONSÁVEL")), Label::ResponsibleParty);
        assert_eq!(Label::from_marker(Some("Responsavel")), Label::ResponsibleParty);
        assert_eq!(Label::from_marker(Some("cnpj")), Label::DocumentNumber);
        assert_eq!(Label::from_marker(Some("CPF")), Label::PersonalId);
        assert_eq!(Label::from_marker(Some("Contribuinte")), Label::Taxpayer);
        assert_eq!(Label::from_marker(None), Label::Unlabeled);
    }

    #[test]
    fn builder_formats_name_and_attaches_document_context() {
        let builder =
            RecordBuilder::new("relatorio.pdf", Some("Prefeitura de Exemplo"), RetentionPolicy::Filtered);
        let record = builder
            .build(hit(
                Label::ResponsibleParty,
                RawName::Inline("  MARIA   DE\nSOUZA ".to_string()),
            ))
            .expect("valid name should build");

        assert_eq!(record.source_document, "relatorio.pdf");
        assert_eq!(record.page_number, 2);
        assert_eq!(record.extracted_name, "Maria de Souza");
        assert_eq!(record.entity_name.as_deref(), Some("Prefeitura de Exemplo"));
        assert_eq!(record.entity_document_number.as_deref(), Some("00.000.000/0000-00"));
        assert!(record.score.is_none());
    }

    #[test]
    fn filtered_policy_rejects_degenerate_names() {
        let builder = RecordBuilder::new("a.pdf", None, RetentionPolicy::Filtered);

        for raw in ["", "Ana", "15/03/2020", "123 - 45", "   "] {
            let built = builder.build(hit(Label::Unlabeled, RawName::Inline(raw.to_string())));
            assert!(built.is_none(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn usable_names_need_letters_and_length() {
        assert!(is_usable_name("Maria da Silva"));
        assert!(is_usable_name("Ana P"));
        assert!(!is_usable_name("12"));
        assert!(!is_usable_name("Ana"));
        assert!(!is_usable_name("01/02/2023"));
        assert!(!is_usable_name("123.456"));
    }

    #[test]
    fn raw_policy_keeps_degenerate_names() {
        let builder = RecordBuilder::new("a.pdf", None, RetentionPolicy::Raw);
        let record = builder
            .build(hit(Label::Unlabeled, RawName::Inline("15/03/2020".to_string())))
            .expect("raw policy keeps everything");

        assert_eq!(record.extracted_name, "15/03/2020");
        assert_eq!(record.entity_name_or_sentinel(), ENTITY_UNIDENTIFIED);
    }

    #[test]
    fn not_found_sentinel_passes_through_unformatted() {
        let builder = RecordBuilder::new("a.pdf", None, RetentionPolicy::Filtered);
        let record = builder
            .build(hit(Label::ResponsibleParty, RawName::NotFound))
            .expect("sentinel record should build");

        assert_eq!(record.extracted_name, NAME_NOT_FOUND);
    }
}
