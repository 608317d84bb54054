use std::collections::{HashMap, HashSet};

use super::config::{DedupKey, OrgPenaltyPolicy, ScoreWeights};
use super::normalize::{char_len, contains_date, contains_pagination_marker};
use super::record::{CandidateRecord, Label};

const DOCUMENT_MARKER: &str = "cnpj";
const ORGANIZATION_MARKERS: &[&str] = &["prefeitura", "município", "municipio", "secretaria"];

impl DedupKey {
    fn group_key(self, record: &CandidateRecord) -> (String, Option<String>) {
        match self {
            DedupKey::Document => (record.source_document.clone(), None),
            DedupKey::DocumentAndNumber => (
                record.source_document.clone(),
                Some(record.document_number.clone()),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    weights: ScoreWeights,
    org_penalty: OrgPenaltyPolicy,
}

impl Ranker {
    pub fn new(weights: ScoreWeights, org_penalty: OrgPenaltyPolicy) -> Self {
        Self {
            weights,
            org_penalty,
        }
    }

    pub fn score(&self, record: &CandidateRecord) -> i64 {
        let weights = &self.weights;
        let name = record.extracted_name.to_lowercase();
        let mut score = 0;

        match record.label {
            Label::ResponsibleParty => score += weights.responsible_party_label,
            Label::Taxpayer => score += weights.taxpayer_label,
            _ => {}
        }

        if contains_date(&name) || contains_pagination_marker(&name) {
            score += weights.date_or_pagination;
        }

        if name.contains(DOCUMENT_MARKER) {
            score += weights.document_marker_in_name;
        }

        let org_exempt =
            self.org_penalty == OrgPenaltyPolicy::ExemptTaxpayer && record.label == Label::Taxpayer;
        if !org_exempt && ORGANIZATION_MARKERS.iter().any(|marker| name.contains(marker)) {
            score += weights.organization_marker;
        }

        if let Some(entity) = record.entity_name.as_deref().map(str::to_lowercase) {
            if !entity.is_empty() && name.contains(&entity) {
                score += weights.entity_name_in_name;
            }
        }

        if char_len(&record.extracted_name) > weights.long_name_min_chars {
            score += weights.long_name_bonus;
        }

        score
    }

    // ties go to the record seen first; groups keep first-appearance order
    pub fn rank_and_select(
        &self,
        records: Vec<CandidateRecord>,
        key: DedupKey,
    ) -> Vec<CandidateRecord> {
        let mut selected: Vec<CandidateRecord> = Vec::new();
        let mut slots: HashMap<(String, Option<String>), usize> = HashMap::new();

        for mut record in records {
            let score = self.score(&record);
            record.score = Some(score);

            let group = key.group_key(&record);
            match slots.get(&group) {
                Some(&slot) => {
                    if selected[slot].score.is_some_and(|best| score > best) {
                        selected[slot] = record;
                    }
                }
                None => {
                    slots.insert(group, selected.len());
                    selected.push(record);
                }
            }
        }

        selected
    }
}

pub fn drop_exact_duplicates(records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
