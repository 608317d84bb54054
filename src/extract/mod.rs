pub mod config;
mod context;
mod cover;
mod normalize;
mod patterns;
mod ranker;
pub mod record;
mod scanner;

use anyhow::Result;
use serde::Serialize;

pub use config::{
    DedupKey, ExtractionConfig, MatchMode, NumberShape, OrgPenaltyPolicy, RetentionPolicy,
    ScoreWeights,
};
pub use record::CandidateRecord;

use cover::detect_entity_name;
use patterns::LinePatterns;
use ranker::{Ranker, drop_exact_duplicates};
use record::RecordBuilder;
use scanner::DocumentScanner;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentExtraction {
    pub entity_name: Option<String>,
    pub page_count: usize,
    pub records: Vec<CandidateRecord>,
}

#[derive(Debug)]
pub struct Extractor {
    config: ExtractionConfig,
    patterns: LinePatterns,
    ranker: Ranker,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let patterns = LinePatterns::new(config.match_mode, config.number_shape)?;
        let ranker = Ranker::new(config.weights, config.org_penalty);

        Ok(Self {
            config,
            patterns,
            ranker,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn extract_document(&self, source_document: &str, pages: &[Vec<String>]) -> DocumentExtraction {
        let entity_name = detect_entity_name(&self.patterns, pages.first().map(Vec::as_slice));
        let builder = RecordBuilder::new(
            source_document,
            entity_name.as_deref(),
            self.config.retention,
        );
        let mut scanner = DocumentScanner::new(&self.patterns, self.config.context_window);

        let mut records = Vec::new();
        for (page_index, lines) in pages.iter().enumerate() {
            records.extend(
                scanner
                    .scan_page(page_index + 1, lines)
                    .into_iter()
                    .filter_map(|hit| builder.build(hit)),
            );
        }

        DocumentExtraction {
            entity_name,
            page_count: pages.len(),
            records,
        }
    }

    // tie-breaking depends on the combined scan order of the whole batch
    pub fn finalize(&self, records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
        match self.config.dedup_key {
            Some(key) => self.ranker.rank_and_select(records, key),
            None => drop_exact_duplicates(records),
        }
    }
}

pub fn page_lines(page_text: &str) -> Vec<String> {
    page_text.lines().map(|line| line.trim_end().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::record::Label;
    use super::*;

    fn page(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    fn extractor(config: ExtractionConfig) -> Extractor {
        Extractor::new(config).expect("extractor should build")
    }

    #[test]
    fn responsible_line_becomes_record_with_formatted_name() {
        let extractor = extractor(ExtractionConfig::default());
        let pages = vec![page(&["Responsável: 123.456.789-00 - MARIA DE SOUZA"])];

        let extraction = extractor.extract_document("relatorio.pdf", &pages);
        assert_eq!(extraction.records.len(), 1);

        let record = &extraction.records[0];
        assert_eq!(record.document_number, "123.456.789-00");
        assert_eq!(record.label, Label::ResponsibleParty);
        assert_eq!(record.extracted_name, "Maria de Souza");
        assert_eq!(record.page_number, 1);
    }

    #[test]
    fn cover_entity_is_attached_to_records_on_later_pages() {
        let extractor = extractor(ExtractionConfig::default());
        let pages = vec![
            page(&[
                "RELATÓRIO DE RESTRIÇÕES",
                "CNPJ: 00.000.000/0000-00 - PREFEITURA MUNICIPAL DE EXEMPLO",
            ]),
            page(&["Responsável: 123.456.789-00", "", "ANA PAULA FERREIRA"]),
            page(&["Responsável: 987.654.321-00 - Carlos Souza"]),
        ];

        let extraction = extractor.extract_document("relatorio.pdf", &pages);
        assert_eq!(
            extraction.entity_name.as_deref(),
            Some("Prefeitura Municipal de Exemplo")
        );
        assert_eq!(extraction.page_count, 3);
        assert_eq!(extraction.records.len(), 3);
        assert!(extraction.records.iter().all(|record| {
            record.entity_name.as_deref() == Some("Prefeitura Municipal de Exemplo")
        }));

        assert_eq!(
            extraction.records[0].entity_document_number.as_deref(),
            Some("00.000.000/0000-00")
        );

        let stacked = &extraction.records[1];
        assert_eq!(stacked.page_number, 2);
        assert_eq!(stacked.extracted_name, "Ana Paula Ferreira");
        assert!(stacked.entity_document_number.is_none());
    }

    #[test]
    fn unusable_inline_responsible_name_is_replaced_by_the_line_below() {
        let extractor = extractor(ExtractionConfig::default());
        let pages = vec![page(&["Responsável: 123.456.789-00 - 12", "MARIA DA SILVA"])];

        let records = extractor.extract_document("a.pdf", &pages).records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_number, "123.456.789-00");
        assert_eq!(records[0].extracted_name, "Maria da Silva");
    }

    #[test]
    fn all_caps_short_first_name_is_name_cased() {
        let extractor = extractor(ExtractionConfig::default());
        let pages = vec![page(&["Responsável: 123.456.789-00 - ANA PAULA"])];

        let records = extractor.extract_document("a.pdf", &pages).records;
        assert_eq!(records[0].extracted_name, "Ana Paula");
    }

    #[test]
    fn empty_document_yields_no_records() {
        let extractor = extractor(ExtractionConfig::default());

        let extraction = extractor.extract_document("vazio.pdf", &[]);
        assert!(extraction.records.is_empty());
        assert!(extraction.entity_name.is_none());

        let extraction = extractor.extract_document("vazio.pdf", &[Vec::new(), Vec::new()]);
        assert!(extraction.records.is_empty());
        assert!(extractor.finalize(extraction.records).is_empty());
    }

    #[test]
    fn date_trailer_is_rejected_when_filtering_and_ranked_low_when_raw() {
        let pages = vec![page(&[
            "12.345.678/0001-99 - 15/03/2020",
            "Contribuinte: 12.345.678/0001-99 - JOSE DA SILVA",
        ])];

        let filtered = extractor(ExtractionConfig {
            match_mode: MatchMode::DocumentNumberOnly,
            ..ExtractionConfig::default()
        });
        let records = filtered.extract_document("a.pdf", &pages).records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].extracted_name, "Jose da Silva");

        let raw = extractor(ExtractionConfig {
            match_mode: MatchMode::DocumentNumberOnly,
            retention: RetentionPolicy::Raw,
            ..ExtractionConfig::default()
        });
        let records = raw.extract_document("a.pdf", &pages).records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].extracted_name, "15/03/2020");

        let selected = raw.finalize(records);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].extracted_name, "Jose da Silva");
        assert_eq!(selected[0].score, Some(50 + 5));
    }

    #[test]
    fn document_key_selects_single_responsible_party_across_pages() {
        let extractor = extractor(ExtractionConfig {
            match_mode: MatchMode::DocumentNumberOnly,
            retention: RetentionPolicy::Raw,
            dedup_key: Some(DedupKey::Document),
            ..ExtractionConfig::default()
        });
        let pages = vec![
            page(&["12.345.678/0001-99 - Page 3"]),
            page(&["Responsável: 123.456.789-00 - Ana Paula"]),
        ];

        let records = extractor.extract_document("a.pdf", &pages).records;
        let selected = extractor.finalize(records);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].extracted_name, "Ana Paula");
        assert_eq!(selected[0].page_number, 2);
    }

    #[test]
    fn disabled_dedup_only_drops_exact_duplicates() {
        let extractor = extractor(ExtractionConfig {
            dedup_key: None,
            ..ExtractionConfig::default()
        });
        let pages = vec![page(&[
            "Responsável: 123.456.789-00 - Ana Paula",
            "Responsável: 123.456.789-00 - Ana Paula",
            "Responsável: 123.456.789-00 - Bia Souza",
        ])];

        let records = extractor.extract_document("a.pdf", &pages).records;
        assert_eq!(records.len(), 3);

        let kept = extractor.finalize(records);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|record| record.score.is_none()));
    }

    #[test]
    fn page_lines_splits_and_trims_line_ends() {
        assert_eq!(
            page_lines("CNPJ: 1  \r\nNome\n\n  JOSE  "),
            vec!["CNPJ: 1", "Nome", "", "  JOSE"]
        );
        assert!(page_lines("").is_empty());
    }
}
